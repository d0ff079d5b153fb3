//! Storage configuration types.

use folio_shared::{MAX_UPLOAD_BYTES_LIMIT, StorageProvider, StorageSettings};

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum compressed upload size in bytes.
    pub max_upload_bytes: u64,
    /// Presigned upload URL TTL in seconds (default: 300 = 5 minutes).
    pub presign_upload_ttl_secs: u64,
}

impl StorageConfig {
    /// Default max upload size: 25MB.
    pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_BYTES_LIMIT;
    /// Default upload TTL: 5 minutes.
    pub const DEFAULT_UPLOAD_TTL: u64 = 300;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
            presign_upload_ttl_secs: Self::DEFAULT_UPLOAD_TTL,
        }
    }

    /// Set maximum upload size.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, size: u64) -> Self {
        self.max_upload_bytes = size;
        self
    }

    /// Set presigned upload URL TTL.
    #[must_use]
    pub fn with_upload_ttl(mut self, secs: u64) -> Self {
        self.presign_upload_ttl_secs = secs;
        self
    }
}

impl From<StorageSettings> for StorageConfig {
    fn from(settings: StorageSettings) -> Self {
        Self::new(settings.provider)
            .with_max_upload_bytes(settings.max_upload_bytes)
            .with_upload_ttl(settings.upload_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.max_upload_bytes, 25_000_000);
        assert_eq!(config.presign_upload_ttl_secs, 300);
    }

    #[test]
    fn test_storage_config_from_settings() {
        let settings = StorageSettings {
            provider: StorageProvider::Memory,
            max_upload_bytes: 1024,
            upload_ttl_secs: 60,
        };
        let config = StorageConfig::from(settings);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.presign_upload_ttl_secs, 60);
        assert_eq!(config.provider.name(), "memory");
    }
}
