//! Conversion adapter: one call to the rendering service per attempt.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::types::{ConversionResult, DEFAULT_FILENAME, InlineContent, ResolvedPayload};
use crate::render::{RenderError, RenderRequest, Renderer};
use folio_shared::ConversionError;

/// Longest sanitized stem, before the `.pdf` suffix.
const MAX_FILENAME_STEM: usize = 100;

impl From<RenderError> for ConversionError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Unconfigured => {
                Self::Unconfigured("rendering service is not configured".to_string())
            }
            RenderError::Rejected {
                status,
                message,
                details,
            } => Self::Upstream {
                status,
                message,
                details,
            },
            RenderError::Transport(msg) => Self::Transport(msg),
        }
    }
}

/// Forwards inline payloads to a [`Renderer`].
pub struct ConversionAdapter<R: Renderer> {
    renderer: Arc<R>,
}

impl<R: Renderer> ConversionAdapter<R> {
    /// Create an adapter over a renderer.
    #[must_use]
    pub fn new(renderer: Arc<R>) -> Self {
        Self { renderer }
    }

    /// Render a resolved payload into a PDF.
    ///
    /// Makes exactly one renderer call; there is no retry.
    ///
    /// # Errors
    ///
    /// - `Upstream` carrying the renderer's own status and body on rejection
    /// - `Transport` (502) if the renderer could not be reached
    /// - `Unconfigured` if no renderer endpoint is set
    pub async fn convert(
        &self,
        payload: &ResolvedPayload,
    ) -> Result<ConversionResult, ConversionError> {
        let request = render_request(payload);

        if payload.debug {
            debug!(
                content_bytes = payload.content_len(),
                option_count = payload.options.len(),
                has_css = payload.css.is_some(),
                "Sending payload to rendering service"
            );
        }

        let bytes = self.renderer.render(&request).await.map_err(|e| {
            warn!(error = %e, "Rendering failed");
            ConversionError::from(e)
        })?;

        let filename = sanitize_filename(&payload.filename);
        info!(filename = %filename, pdf_bytes = bytes.len(), "PDF rendered");

        Ok(ConversionResult { bytes, filename })
    }
}

fn render_request(payload: &ResolvedPayload) -> RenderRequest {
    let (html, raw_data, encoding) = match &payload.content {
        InlineContent::Html(html) => (Some(html.clone()), None, None),
        InlineContent::Raw { data, encoding } => (None, Some(data.clone()), encoding.clone()),
    };

    RenderRequest {
        html,
        css: payload.css.clone(),
        options: payload.options.clone(),
        encoding,
        raw_data,
        debug: payload.debug,
    }
}

/// Turn a caller-supplied name into a safe attachment filename ending in `.pdf`.
///
/// A trailing `.pdf` is stripped before sanitizing so it is never doubled.
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, leading and trailing dots
/// and underscores are trimmed, and the stem is capped at 100 characters.
/// An empty result falls back to `proposal.pdf`.
#[must_use]
pub fn sanitize_filename(raw: &str) -> String {
    let trimmed = raw.trim();
    let stem = if trimmed.len() >= 4 && trimmed.is_char_boundary(trimmed.len() - 4) {
        let (head, tail) = trimmed.split_at(trimmed.len() - 4);
        if tail.eq_ignore_ascii_case(".pdf") {
            head
        } else {
            trimmed
        }
    } else {
        trimmed
    };

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned: String = cleaned
        .trim_matches(|c| c == '.' || c == '_')
        .chars()
        .take(MAX_FILENAME_STEM)
        .collect();

    if cleaned.is_empty() {
        format!("{DEFAULT_FILENAME}.pdf")
    } else {
        format!("{cleaned}.pdf")
    }
}
