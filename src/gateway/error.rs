//! Error types for the remote gateways

use thiserror::Error;

/// Errors that can occur when talking to the auth service or workflow backend
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request did not complete within the client-side timeout
    #[error("Request timed out after {seconds}s")]
    Timeout {
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The server could not be reached at all
    #[error("Cannot reach {url}. Check your connection")]
    Unreachable {
        /// URL that was attempted
        url: String,
    },

    /// Non-success HTTP status
    #[error("Server error ({status}): {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The backend understood the request and refused it
    #[error("{0}")]
    Rejected(String),

    /// The response did not have the expected shape
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    /// HTTP request failed for another reason
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    /// Check if this error is recoverable (user can retry)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GatewayError::Json(_))
    }

    /// Short category used in log lines and notices
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::Unreachable { .. } => "unreachable",
            GatewayError::Http { .. } => "http",
            GatewayError::Rejected(_) => "rejected",
            GatewayError::UnexpectedResponse(_) | GatewayError::Json(_) => "unexpected",
            GatewayError::Request(_) => "request",
        }
    }
}
