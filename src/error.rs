use serde::Serialize;

/// JSON error body returned by every failing route.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Wire shape for uncaught failures: `Internal error. <message>`.
    pub fn internal(err: &impl std::fmt::Display) -> Self {
        Self {
            error: format!("Internal error. {err}"),
        }
    }
}
