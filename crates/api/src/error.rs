//! Error responses.
//!
//! Every failure leaves the API as `{error, code, details?}` with the status
//! the conversion error maps to.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use folio_shared::ConversionError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable cause.
    pub error: String,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Upstream detail payload, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// A [`ConversionError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ConversionError);

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self(ConversionError::PayloadTooLarge(format!(
                "{}; request an upload URL and send the payload by storage path",
                rejection.body_text()
            )));
        }
        Self(ConversionError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(ConversionError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Upstream statuses are mirrored; anything unrepresentable becomes a 502.
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        let body = ErrorBody {
            error: self.0.message().to_string(),
            code: self.0.error_code(),
            details: self.0.details().cloned(),
        };
        (status, Json(body)).into_response()
    }
}
