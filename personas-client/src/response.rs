//! Normalized response shape shared by every backend call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status used when no HTTP response was received at all.
pub const NETWORK_FAILURE_STATUS: u16 = 0;

pub const NETWORK_FAILURE_MESSAGE: &str = "Error de red o solicitud interrumpida.";
pub const GENERIC_ERROR_MESSAGE: &str = "Ocurrió un error";

/// Transport outcome of one call to the `/personas` resource.
///
/// `status` is the HTTP status, or [`NETWORK_FAILURE_STATUS`] if the host was
/// unreachable. Error payload fields (`message`, `error`, `statusCode`) are
/// folded in when the backend supplied them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// A response whose payload is passed through unchanged.
    pub fn success(status: u16, data: Option<T>) -> Self {
        Self {
            status,
            data,
            message: None,
            error: None,
            status_code: None,
        }
    }

    /// An error response, folding in whatever the backend body carried.
    pub fn failure(status: u16, body: Option<&Value>) -> Self {
        let text = |key: &str| {
            body.and_then(|b| b.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let status_code = body
            .and_then(|b| b.get("statusCode"))
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok());
        Self {
            status,
            data: None,
            message: text("message"),
            error: text("error"),
            status_code,
        }
    }

    /// No response was received (unreachable host, reset, aborted task).
    pub fn network_failure() -> Self {
        Self {
            status: NETWORK_FAILURE_STATUS,
            data: None,
            message: Some(NETWORK_FAILURE_MESSAGE.to_string()),
            error: None,
            status_code: None,
        }
    }

    pub fn is_network_failure(&self) -> bool {
        self.status == NETWORK_FAILURE_STATUS
    }

    /// Backend-supplied text: `message`, else `error`.
    pub fn backend_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }

    /// Backend-supplied text, or [`GENERIC_ERROR_MESSAGE`].
    pub fn message_or_default(&self) -> &str {
        self.backend_message().unwrap_or(GENERIC_ERROR_MESSAGE)
    }

    /// Convert the payload, keeping status and message fields.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            status_code: self.status_code,
        }
    }
}
