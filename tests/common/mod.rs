use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;

use issm_gateway::argo::WorkflowClient;
use issm_gateway::bus::{BusError, BusResult, InMemoryBus, IntentBus};
use issm_gateway::gateway::Gateway;
use issm_gateway::routes;

/// Discard port; nothing listens there, so upstream calls fail fast.
pub const UNREACHABLE_ARGO: &str = "127.0.0.1:9";

/// Build the router under test with an explicit bus, Argo address, and
/// strict-mode flag.
pub fn app_with(bus: Arc<dyn IntentBus>, argo_server: &str, strict: bool) -> Router {
    let workflows = WorkflowClient::new(argo_server.to_string(), Duration::from_secs(2))
        .expect("failed to build workflow client");
    routes::router(Gateway::new(bus, workflows, strict))
}

/// Router with an in-memory bus and an unreachable Argo server.
pub fn app(bus: &InMemoryBus) -> Router {
    app_with(Arc::new(bus.clone()), UNREACHABLE_ARGO, false)
}

/// Read response body as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Bus double whose every publish fails with a fixed broker-side error.
pub enum FailingBus {
    Timeout,
    Broker,
}

#[async_trait]
impl IntentBus for FailingBus {
    async fn publish(&self, topic: &str, _payload: Vec<u8>) -> BusResult<()> {
        match self {
            FailingBus::Timeout => Err(BusError::PublishTimeout {
                topic: topic.to_string(),
                message: "Message production error: MessageTimedOut (Local: Message timed out)"
                    .to_string(),
            }),
            FailingBus::Broker => Err(BusError::Broker {
                topic: topic.to_string(),
                message:
                    "Message production error: BrokerTransportFailure (Local: Broker transport failure)"
                        .to_string(),
            }),
        }
    }
}
