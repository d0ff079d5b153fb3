//! Render error types.

use serde_json::Value;
use thiserror::Error;

/// Failures talking to the external rendering service.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No renderer endpoint is configured.
    #[error("rendering service is not configured")]
    Unconfigured,

    /// The service answered with a non-success status.
    #[error("rendering service returned {status}: {message}")]
    Rejected {
        /// Status code returned by the service.
        status: u16,
        /// Message extracted from the response body.
        message: String,
        /// Response body, parsed as JSON when possible.
        details: Option<Value>,
    },

    /// Timeout, connection failure, or an unreadable response.
    #[error("rendering service transport failure: {0}")]
    Transport(String),
}

impl RenderError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}
