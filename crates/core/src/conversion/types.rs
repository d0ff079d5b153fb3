//! Conversion types and data structures.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_shared::ConversionError;

/// Stylesheet input: a single block or an ordered list applied in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssInput {
    /// One stylesheet.
    Single(String),
    /// Several stylesheets, in application order.
    Many(Vec<String>),
}

/// Where the document content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Inline HTML.
    Html(String),
    /// Inline pre-encoded body, decoded by the rendering service.
    Raw {
        /// Encoded document.
        data: String,
        /// Encoding hint for `data`.
        encoding: Option<String>,
    },
    /// Gzipped HTML previously uploaded to object storage.
    Stored {
        /// Storage key from the upload grant.
        path: String,
    },
}

/// Content a renderer can consume directly. Has no storage variant, so a
/// resolved payload cannot be relayed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineContent {
    /// HTML text.
    Html(String),
    /// Pre-encoded body with its encoding hint.
    Raw {
        /// Encoded document.
        data: String,
        /// Encoding hint for `data`.
        encoding: Option<String>,
    },
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Document content.
    pub source: PayloadSource,
    /// Stylesheet(s).
    pub css: Option<CssInput>,
    /// Renderer options, passed through untouched.
    pub options: BTreeMap<String, Value>,
    /// Requested output filename, not yet sanitized.
    pub filename: String,
    /// Ask the renderer for diagnostics.
    pub debug: bool,
}

impl ConversionRequest {
    /// Storage key this request will consume, if any.
    #[must_use]
    pub fn storage_path(&self) -> Option<&str> {
        match &self.source {
            PayloadSource::Stored { path } => Some(path),
            _ => None,
        }
    }
}

/// A conversion request whose content is fully inline.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPayload {
    /// Document content.
    pub content: InlineContent,
    /// Stylesheet(s).
    pub css: Option<CssInput>,
    /// Renderer options.
    pub options: BTreeMap<String, Value>,
    /// Requested output filename, not yet sanitized.
    pub filename: String,
    /// Ask the renderer for diagnostics.
    pub debug: bool,
}

impl ResolvedPayload {
    /// Build from a request whose source is already inline.
    ///
    /// Returns the request back unchanged if it still references storage.
    pub fn from_inline(request: ConversionRequest) -> Result<Self, ConversionRequest> {
        let content = match request.source {
            PayloadSource::Html(html) => InlineContent::Html(html),
            PayloadSource::Raw { data, encoding } => InlineContent::Raw { data, encoding },
            PayloadSource::Stored { .. } => return Err(request),
        };
        Ok(Self {
            content,
            css: request.css,
            options: request.options,
            filename: request.filename,
            debug: request.debug,
        })
    }

    /// Size of the inline content in bytes.
    #[must_use]
    pub fn content_len(&self) -> usize {
        match &self.content {
            InlineContent::Html(html) => html.len(),
            InlineContent::Raw { data, .. } => data.len(),
        }
    }
}

/// Default output name when the caller supplies none.
pub const DEFAULT_FILENAME: &str = "proposal";

/// Request body for `POST /proposals/{id}/pdf`, before validation.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequestBody {
    /// Inline HTML.
    #[garde(skip)]
    #[serde(default)]
    pub html: Option<String>,
    /// Stylesheet(s).
    #[garde(skip)]
    #[serde(default)]
    pub css: Option<CssInput>,
    /// Renderer options.
    #[garde(skip)]
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
    /// Output filename.
    #[garde(length(max = 255))]
    #[serde(default)]
    pub filename: Option<String>,
    /// Storage key from an upload grant.
    #[garde(length(min = 1, max = 1024))]
    #[serde(default)]
    pub storage_path: Option<String>,
    /// Inline pre-encoded body.
    #[garde(skip)]
    #[serde(default)]
    pub raw_data: Option<String>,
    /// Encoding hint for `raw_data`.
    #[garde(length(max = 64))]
    #[serde(default)]
    pub encoding: Option<String>,
    /// Ask the renderer for diagnostics.
    #[garde(skip)]
    #[serde(default)]
    pub debug: bool,
}

impl TryFrom<ConversionRequestBody> for ConversionRequest {
    type Error = ConversionError;

    fn try_from(body: ConversionRequestBody) -> Result<Self, Self::Error> {
        body.validate()
            .map_err(|report| ConversionError::validation(report.to_string()))?;

        let source = match (body.html, body.raw_data, body.storage_path) {
            (Some(html), None, None) => PayloadSource::Html(html),
            (None, Some(data), None) => PayloadSource::Raw {
                data,
                encoding: body.encoding,
            },
            (None, None, Some(path)) => PayloadSource::Stored { path },
            (None, None, None) => {
                return Err(ConversionError::validation(
                    "one of html, rawData, or storagePath is required",
                ));
            }
            _ => {
                return Err(ConversionError::validation(
                    "only one of html, rawData, or storagePath may be given",
                ));
            }
        };

        Ok(Self {
            source,
            css: body.css,
            options: body.options,
            filename: body
                .filename
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            debug: body.debug,
        })
    }
}

/// Request body for `POST /proposals/{id}/pdf/upload-url`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequestBody {
    /// Size of the compressed payload the client will upload.
    #[garde(skip)]
    pub content_length: u64,
    /// MIME type the client will upload with.
    #[garde(length(min = 1, max = 255))]
    #[serde(default)]
    pub content_type: Option<String>,
}

/// A single-use, expiring capability to write one object.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadGrant {
    /// Presigned URL. Never logged.
    pub upload_url: String,
    /// HTTP method to use with the URL.
    pub upload_method: String,
    /// Headers the upload must carry for the signature to match.
    pub upload_headers: HashMap<String, String>,
    /// Key to reference in the conversion request.
    pub storage_path: String,
    /// When the capability lapses.
    pub expires_at: DateTime<Utc>,
    /// Largest accepted upload in bytes.
    pub max_bytes: u64,
}

/// A rendered PDF.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// PDF bytes.
    pub bytes: Bytes,
    /// Sanitized filename ending in `.pdf`.
    pub filename: String,
}
