//! Conversion error taxonomy shared by the core pipeline and the API layer.

use serde_json::Value;
use thiserror::Error;

/// Every way a conversion attempt or an upload-grant request can fail.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Request failed schema or range validation. Raised before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body exceeds the inline size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Proposal does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The referenced upload was never written or has been swept.
    #[error("Payload expired: {0}")]
    ExpiredPayload(String),

    /// The uploaded object could not be downloaded or decompressed.
    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),

    /// A required backend (storage, renderer) is not configured.
    #[error("Not configured: {0}")]
    Unconfigured(String),

    /// The rendering service answered with a non-success status.
    #[error("Renderer rejected request ({status}): {message}")]
    Upstream {
        /// Status code returned by the rendering service.
        status: u16,
        /// Message extracted from the service's response.
        message: String,
        /// Response body as returned by the service.
        details: Option<Value>,
    },

    /// The rendering service could not be reached or answered garbage.
    #[error("Renderer unreachable: {0}")]
    Transport(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConversionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge(_) => 413,
            Self::ExpiredPayload(_) => 410,
            Self::Upstream { status, .. } => *status,
            Self::Transport(_) => 502,
            Self::CorruptPayload(_) | Self::Unconfigured(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::ExpiredPayload(_) => "PAYLOAD_EXPIRED",
            Self::CorruptPayload(_) => "PAYLOAD_CORRUPT",
            Self::Unconfigured(_) => "NOT_CONFIGURED",
            Self::Upstream { .. } => "RENDERER_REJECTED",
            Self::Transport(_) => "RENDERER_UNREACHABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Short human-readable cause, without the kind prefix.
    ///
    /// This is what gets recorded on the proposal's conversion status.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::PayloadTooLarge(msg)
            | Self::ExpiredPayload(msg)
            | Self::CorruptPayload(msg)
            | Self::Unconfigured(msg)
            | Self::Transport(msg)
            | Self::Internal(msg) => msg,
            Self::Upstream { message, .. } => message,
        }
    }

    /// Upstream detail payload, if the renderer supplied one.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Upstream { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unconfigured-backend error.
    #[must_use]
    pub fn unconfigured(msg: impl Into<String>) -> Self {
        Self::Unconfigured(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
