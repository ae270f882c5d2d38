//! Intent envelope construction.
//!
//! Every inbound intent is wrapped in a flat JSON envelope before it is
//! published. The envelope carries identifying metadata (`event_uuid`,
//! `transaction_uuid`), routing metadata (`service_owner`, `operation`,
//! `sub_operation`), and a callback binding telling the orchestrator where
//! to report back. The caller-supplied intent fields are merged in last, so
//! on a key collision the caller's value wins unless strict mode is on.

use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Envelope keys the builder sets before merging the intent payload.
pub const RESERVED_KEYS: [&str; 6] = [
    "event_uuid",
    "transaction_uuid",
    "service_owner",
    "operation",
    "sub_operation",
    "callback",
];

/// `sub_operation` value stamped on every freshly created envelope.
pub const SUB_OPERATION_NEW_INTENT: &str = "new_intent";

/// An intent field collided with a reserved envelope key (strict mode only).
#[derive(Debug, thiserror::Error)]
#[error("intent field '{0}' collides with a reserved envelope key")]
pub struct ReservedKeyError(pub String);

/// Generate a transaction identifier: a v4 UUID rendered as 32 lowercase
/// hex characters with no separators.
pub fn new_transaction_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Derive the per-tenant inbound topic name.
pub fn topic_for(service_owner: &str) -> String {
    format!("issm-in-{service_owner}")
}

/// Build the envelope for an intent submitted on behalf of `service_owner`.
///
/// Returns the envelope and the generated transaction identifier. The
/// `transaction_uuid` field always equals `event_uuid` at creation time;
/// the two names are kept for wire compatibility.
///
/// With `strict` off this cannot fail. With `strict` on, an intent key that
/// matches one of [`RESERVED_KEYS`] is rejected instead of overwriting the
/// structural field.
pub fn build_envelope(
    service_owner: &str,
    operation: &str,
    intent: &Map<String, Value>,
    strict: bool,
) -> Result<(Map<String, Value>, String), ReservedKeyError> {
    if strict {
        if let Some(key) = intent.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(ReservedKeyError(key.clone()));
        }
    }

    let event_uuid = new_transaction_id();

    let mut envelope = Map::new();
    envelope.insert("event_uuid".to_string(), json!(event_uuid));
    envelope.insert("transaction_uuid".to_string(), json!(event_uuid));
    envelope.insert("service_owner".to_string(), json!(service_owner));
    envelope.insert("operation".to_string(), json!(operation));
    envelope.insert(
        "sub_operation".to_string(),
        json!(SUB_OPERATION_NEW_INTENT),
    );
    envelope.insert(
        "callback".to_string(),
        json!({ "type": "kafka", "kafka_topic": service_owner }),
    );

    // Intent fields last: the caller's value wins on collision.
    for (key, value) in intent {
        envelope.insert(key.clone(), value.clone());
    }

    Ok((envelope, event_uuid))
}
