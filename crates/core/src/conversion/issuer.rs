//! Upload grant issuance.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use super::types::UploadGrant;
use crate::storage::{ObjectStore, StorageConfig};
use folio_shared::{ConversionError, MAX_UPLOAD_BYTES_LIMIT};

/// Content type assumed when the client declares none.
pub const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "application/gzip";

/// Mints single-use write capabilities for offloaded payloads.
pub struct UploadGrantIssuer<S: ObjectStore> {
    store: Option<Arc<S>>,
    max_bytes: u64,
    ttl: Duration,
}

impl<S: ObjectStore> UploadGrantIssuer<S> {
    /// Create an issuer with the default 25 MB / 5 minute limits.
    ///
    /// A `None` store makes every grant fail as unconfigured.
    #[must_use]
    pub fn new(store: Option<Arc<S>>) -> Self {
        Self {
            store,
            max_bytes: StorageConfig::DEFAULT_MAX_UPLOAD_BYTES,
            ttl: Duration::from_secs(StorageConfig::DEFAULT_UPLOAD_TTL),
        }
    }

    /// Override the size limit and capability lifetime.
    ///
    /// The size limit never exceeds 25 MB, whatever is asked for.
    #[must_use]
    pub fn with_limits(mut self, max_bytes: u64, ttl: Duration) -> Self {
        self.max_bytes = max_bytes.min(MAX_UPLOAD_BYTES_LIMIT);
        self.ttl = ttl;
        self
    }

    /// Build a storage key namespaced by proposal, time, and a random token.
    ///
    /// Format: `proposals/{proposal_id}/pdf/{unix_millis}-{token}.html.gz`
    #[must_use]
    pub fn generate_storage_path(proposal_id: Uuid) -> String {
        format!(
            "proposals/{}/pdf/{}-{}.html.gz",
            proposal_id,
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        )
    }

    /// Issue a write capability for one new object.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `content_length` is outside
    /// `[1, max_bytes]`, or an unconfigured error if storage is missing or
    /// cannot presign.
    pub async fn issue_upload_grant(
        &self,
        proposal_id: Uuid,
        content_length: u64,
        content_type: Option<&str>,
    ) -> Result<UploadGrant, ConversionError> {
        if content_length == 0 || content_length > self.max_bytes {
            return Err(ConversionError::validation(format!(
                "contentLength must be between 1 and {} bytes, got {content_length}",
                self.max_bytes
            )));
        }

        let Some(store) = &self.store else {
            error!(proposal_id = %proposal_id, "Upload requested but storage is not configured");
            return Err(ConversionError::unconfigured("file storage is not configured"));
        };

        let content_type = content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_UPLOAD_CONTENT_TYPE);
        let storage_path = Self::generate_storage_path(proposal_id);

        let presigned = store
            .presign_upload(&storage_path, content_type, self.ttl)
            .await
            .map_err(|e| {
                error!(proposal_id = %proposal_id, error = %e, "Failed to presign upload");
                ConversionError::unconfigured(format!("storage cannot issue upload URLs: {e}"))
            })?;

        info!(
            proposal_id = %proposal_id,
            storage_path = %storage_path,
            content_length,
            "Upload grant issued"
        );

        Ok(UploadGrant {
            upload_url: presigned.url,
            upload_method: presigned.method,
            upload_headers: presigned.headers,
            storage_path,
            expires_at: presigned.expires_at,
            max_bytes: self.max_bytes,
        })
    }
}
