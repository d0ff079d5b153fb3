//! HTTP client for the external HTML-to-PDF rendering service.

use std::collections::BTreeMap;
use std::future::Future;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::RenderError;
use crate::conversion::CssInput;
use folio_shared::RendererConfig;

/// Longest plain-text error body carried into an error message.
const MAX_ERROR_TEXT: usize = 500;

/// Body sent to the rendering service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Document HTML. Absent when `raw_data` carries the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Stylesheet(s) applied on top of the HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<CssInput>,
    /// Renderer options, passed through untouched.
    pub options: BTreeMap<String, Value>,
    /// Encoding hint for `raw_data`, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Pre-encoded document body, interpreted by the service per `encoding`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<String>,
    /// Ask the service for diagnostics.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub debug: bool,
}

/// A service that turns HTML into PDF bytes.
pub trait Renderer: Send + Sync {
    /// Issue exactly one render call. Implementations never retry.
    fn render(
        &self,
        request: &RenderRequest,
    ) -> impl Future<Output = Result<Bytes, RenderError>> + Send;
}

/// Renderer backed by an HTTP endpoint.
///
/// No timeout is applied beyond reqwest's defaults.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl RenderClient {
    /// Create a client from configuration. A missing URL yields a client whose
    /// every call fails as unconfigured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RendererConfig) -> Result<Self, RenderError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RenderError::transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.url.clone().filter(|url| !url.trim().is_empty()),
            api_key: config.api_key.clone(),
        })
    }

    /// Whether a renderer endpoint is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl Renderer for RenderClient {
    async fn render(&self, request: &RenderRequest) -> Result<Bytes, RenderError> {
        let endpoint = self.endpoint.as_deref().ok_or(RenderError::Unconfigured)?;

        let mut builder = self.http.post(endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("json"));
            let body = response.bytes().await.unwrap_or_default();
            return Err(rejection(status, is_json, &body));
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(RenderError::transport(
                "rendering service returned an empty document",
            ));
        }

        debug!(bytes = pdf.len(), "Rendering service returned document");
        Ok(pdf)
    }
}

/// Build a rejection from a non-success response, keeping the body verbatim.
fn rejection(status: StatusCode, is_json: bool, body: &[u8]) -> RenderError {
    let parsed = serde_json::from_slice::<Value>(body)
        .ok()
        .filter(|v| is_json || v.is_object());

    let (message, details) = match parsed {
        Some(json) => {
            let message = ["message", "error", "detail"]
                .iter()
                .find_map(|field| json.get(field).and_then(Value::as_str))
                .map_or_else(|| fallback_reason(status), str::to_string);
            (message, Some(json))
        }
        None => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                (fallback_reason(status), None)
            } else {
                let message = text.chars().take(MAX_ERROR_TEXT).collect();
                (message, Some(Value::String(text)))
            }
        }
    };

    RenderError::Rejected {
        status: status.as_u16(),
        message,
        details,
    }
}

fn fallback_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("rendering failed")
        .to_string()
}
