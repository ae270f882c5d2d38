use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};

use crate::argo::WorkflowError;
use crate::error::ErrorResponse;
use crate::gateway::{Gateway, GatewayError};

type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn router(gateway: Gateway) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/instantiate/{service_owner}", post(instantiate))
        .route("/get_workflows/{service_owner}", get(get_workflows))
        .route(
            "/get_workflow_ref/{service_owner}/{transaction_uuid}",
            post(get_workflow_ref),
        )
        .with_state(gateway)
}

/// Decode a request body into an intent mapping.
///
/// An absent or unparseable body degrades to an empty mapping; a body that
/// decodes to a non-object JSON value is a client error.
fn message_payload(body: &Bytes) -> Result<Map<String, Value>, RouteError> {
    if body.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("message payload is not a dictionary")),
        )),
        Err(_) => Ok(Map::new()),
    }
}

async fn hello() -> &'static str {
    "Greetings from the ISSM intent gateway!"
}

/// POST /instantiate/{service_owner} - publish an intent on the tenant's behalf
async fn instantiate(
    State(gateway): State<Gateway>,
    Path(service_owner): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    tracing::info!(%service_owner, "received intent instantiate request");

    let intent = message_payload(&body)?;

    match gateway.instantiate(&service_owner, "submit", &intent).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(GatewayError::ReservedKey(err)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string())),
        )),
        Err(err) => {
            tracing::error!(%service_owner, error = %err, "intent publish failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(&err)),
            ))
        }
    }
}

/// GET /get_workflows/{service_owner} - relay workflow status from Argo
async fn get_workflows(
    State(gateway): State<Gateway>,
    Path(service_owner): Path<String>,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    match gateway.get_workflows(&service_owner).await {
        Ok(workflows) => Ok((StatusCode::OK, Json(workflows))),
        // An upstream HTTP-level failure passes through with its status.
        Err(GatewayError::Workflow(WorkflowError::Status { status, message })) => {
            tracing::warn!(%service_owner, status, "workflow service returned an error");
            let code =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Err((code, Json(ErrorResponse::new(message))))
        }
        Err(err) => {
            tracing::error!(%service_owner, error = %err, "workflow query failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(&err)),
            ))
        }
    }
}

/// POST /get_workflow_ref/{service_owner}/{transaction_uuid} - build a deep link
async fn get_workflow_ref(
    State(gateway): State<Gateway>,
    Path((service_owner, transaction_uuid)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), RouteError> {
    let value = message_payload(&body)?;
    let argo_url = value
        .get("argo-server-url")
        .and_then(Value::as_str)
        .unwrap_or("");

    let reference = gateway.workflow_ref(argo_url, &service_owner, &transaction_uuid);
    Ok((StatusCode::OK, Json(reference)))
}
