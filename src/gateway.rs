//! The gateway façade: one method per externally visible operation.

use crate::argo::{self, WorkflowClient, WorkflowError};
use crate::bus::{BusError, IntentBus};
use crate::envelope::{self, ReservedKeyError};
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    ReservedKey(#[from] ReservedKeyError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Composes the envelope builder, the bus, and the workflow query client.
///
/// Constructed once at startup and injected into the HTTP layer as shared
/// state; holds no mutable state of its own.
#[derive(Clone)]
pub struct Gateway {
    bus: Arc<dyn IntentBus>,
    workflows: WorkflowClient,
    strict_intent_keys: bool,
}

impl Gateway {
    pub fn new(bus: Arc<dyn IntentBus>, workflows: WorkflowClient, strict_intent_keys: bool) -> Self {
        Self {
            bus,
            workflows,
            strict_intent_keys,
        }
    }

    /// Wrap `intent` in an envelope and publish it to the tenant's inbound
    /// topic. Fire-and-forget once the broker acknowledges: there is no
    /// compensating action on later failures downstream.
    pub async fn instantiate(
        &self,
        service_owner: &str,
        operation: &str,
        intent: &Map<String, Value>,
    ) -> Result<Value, GatewayError> {
        let (envelope, transaction_uuid) =
            envelope::build_envelope(service_owner, operation, intent, self.strict_intent_keys)?;
        let topic = envelope::topic_for(service_owner);
        let payload = serde_json::to_vec(&envelope)?;

        tracing::info!(
            %service_owner,
            %operation,
            %transaction_uuid,
            %topic,
            "publishing intent"
        );

        self.bus.publish(&topic, payload).await?;

        Ok(json!({ "transaction_uuid": transaction_uuid }))
    }

    /// Relay the tenant's submitted business workflows from the Argo server.
    pub async fn get_workflows(&self, service_owner: &str) -> Result<Value, GatewayError> {
        Ok(self.workflows.list_workflows(service_owner).await?)
    }

    /// Deep link for viewing a transaction's workflow. No network call.
    pub fn workflow_ref(
        &self,
        argo_url: &str,
        service_owner: &str,
        transaction_uuid: &str,
    ) -> Value {
        tracing::debug!(%service_owner, %transaction_uuid, "building workflow deep link");
        argo::workflow_ref(argo_url, transaction_uuid)
    }
}
