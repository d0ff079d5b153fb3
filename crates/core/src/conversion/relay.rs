//! Payload relay: turns a storage reference into inline content.

use std::sync::Arc;

use tracing::{debug, warn};

use super::types::{ConversionRequest, InlineContent, ResolvedPayload};
use crate::codec;
use crate::storage::{ObjectStore, StorageError};
use folio_shared::ConversionError;

/// Resolves conversion requests into fully inline payloads.
pub struct PayloadRelay<S: ObjectStore> {
    store: Option<Arc<S>>,
}

impl<S: ObjectStore> PayloadRelay<S> {
    /// Create a relay. A `None` store rejects storage-referenced requests as
    /// unconfigured and passes inline requests through.
    #[must_use]
    pub fn new(store: Option<Arc<S>>) -> Self {
        Self { store }
    }

    /// Resolve a request into inline content.
    ///
    /// Inline requests pass through unchanged. A storage reference is checked,
    /// downloaded, and gunzipped; the result carries the decompressed HTML and
    /// no reference, raw data, or encoding hint. Does not delete the object.
    ///
    /// # Errors
    ///
    /// - `ExpiredPayload` if the referenced object does not exist or is
    ///   removed before it can be downloaded
    /// - `CorruptPayload` if the download fails or the content is not valid gzip
    /// - `Unconfigured` if storage is not configured
    pub async fn resolve_payload(
        &self,
        request: ConversionRequest,
    ) -> Result<ResolvedPayload, ConversionError> {
        let request = match ResolvedPayload::from_inline(request) {
            Ok(inline) => return Ok(inline),
            Err(stored) => stored,
        };

        let Some(path) = request.storage_path().map(str::to_string) else {
            return Err(ConversionError::internal("payload source is neither inline nor stored"));
        };

        let Some(store) = &self.store else {
            return Err(ConversionError::unconfigured("file storage is not configured"));
        };

        let exists = store.exists(&path).await.map_err(|e| {
            warn!(storage_path = %path, error = %e, "Existence check failed");
            ConversionError::internal(format!("storage existence check failed: {e}"))
        })?;
        if !exists {
            return Err(expired(&path));
        }

        // The object can be swept between the existence check and the download.
        let compressed = store.read(&path).await.map_err(|e| match e {
            StorageError::NotFound { .. } => {
                warn!(storage_path = %path, "Payload vanished before download");
                expired(&path)
            }
            e => {
                warn!(storage_path = %path, error = %e, "Payload download failed");
                ConversionError::CorruptPayload(format!(
                    "failed to download uploaded payload: {e}"
                ))
            }
        })?;

        let html = codec::decompress(&compressed).map_err(|e| {
            warn!(storage_path = %path, error = %e, "Payload decompression failed");
            ConversionError::CorruptPayload(format!("uploaded payload is not valid gzip: {e}"))
        })?;

        debug!(
            storage_path = %path,
            compressed_bytes = compressed.len(),
            html_bytes = html.len(),
            "Payload relayed from storage"
        );

        Ok(ResolvedPayload {
            content: InlineContent::Html(html),
            css: request.css,
            options: request.options,
            filename: request.filename,
            debug: request.debug,
        })
    }
}

fn expired(path: &str) -> ConversionError {
    ConversionError::ExpiredPayload(format!(
        "uploaded payload '{path}' not found; the upload window may have lapsed, request a new upload URL"
    ))
}
