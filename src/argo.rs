//! Read-only client for the Argo workflow service.

use serde_json::{json, Value};
use std::time::Duration;

/// Field projection applied to every workflow list query.
const WORKFLOW_FIELDS: &str = "items.metadata.name,items.metadata.creationTimestamp,\
items.metadata.labels.transaction_uuid,items.status.phase";

/// Label selector limiting results to submitted business workflows.
const SUBMITTED_SELECTOR: &str = "listOptions.labelSelector=operation=submit";

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow service timed out: {0}")]
    Timeout(String),

    #[error("workflow service unreachable: {0}")]
    Transport(String),

    #[error("workflow service returned status {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    argo_server: String,
}

impl WorkflowClient {
    /// `argo_server` is the base `host:port` of the Argo API server.
    pub fn new(argo_server: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, argo_server })
    }

    fn workflows_url(&self, service_owner: &str) -> String {
        format!(
            "http://{}/api/v1/workflows/domain-{}?fields={}&{}",
            self.argo_server, service_owner, WORKFLOW_FIELDS, SUBMITTED_SELECTOR
        )
    }

    /// List business workflows for the tenant's namespace.
    ///
    /// The upstream response body is relayed as-is; no schema validation is
    /// performed here.
    pub async fn list_workflows(&self, service_owner: &str) -> Result<Value, WorkflowError> {
        let url = self.workflows_url(service_owner);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.map_err(classify)?;
            return Err(WorkflowError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> WorkflowError {
    if err.is_timeout() {
        WorkflowError::Timeout(err.to_string())
    } else {
        WorkflowError::Transport(err.to_string())
    }
}

/// Build the user-facing deep link for a transaction's workflow view.
///
/// Pure string construction; `argo_url` is used verbatim and nothing is
/// fetched. Transactions span namespaces, so the link filters by label only.
pub fn workflow_ref(argo_url: &str, transaction_uuid: &str) -> Value {
    json!({
        "ref": format!("http://{argo_url}/workflows/?label=transaction_uuid={transaction_uuid}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflows_url_scopes_namespace_and_filters() {
        let client =
            WorkflowClient::new("argo:2746".to_string(), Duration::from_secs(1)).unwrap();
        let url = client.workflows_url("tenantA");

        assert!(url.starts_with("http://argo:2746/api/v1/workflows/domain-tenantA?"));
        assert!(url.contains("fields=items.metadata.name,items.metadata.creationTimestamp,"));
        assert!(url.contains("items.metadata.labels.transaction_uuid,items.status.phase"));
        assert!(url.ends_with("&listOptions.labelSelector=operation=submit"));
    }

    #[test]
    fn workflow_ref_builds_label_filtered_link() {
        let reference = workflow_ref("argo.example.com", "abc123");
        assert_eq!(
            reference,
            json!({ "ref": "http://argo.example.com/workflows/?label=transaction_uuid=abc123" })
        );
    }

    #[test]
    fn workflow_ref_uses_caller_url_verbatim() {
        let reference = workflow_ref("", "abc123");
        assert_eq!(
            reference["ref"],
            json!("http:///workflows/?label=transaction_uuid=abc123")
        );
    }
}
