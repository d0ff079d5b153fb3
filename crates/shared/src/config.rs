//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage for offloaded payloads. Absent means uploads are disabled.
    #[serde(default)]
    pub storage: Option<StorageSettings>,
    /// External HTML-to-PDF rendering service.
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory store (tests only, cannot presign)
    Memory,
}

impl StorageProvider {
    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Hard ceiling on a single compressed upload, in bytes.
pub const MAX_UPLOAD_BYTES_LIMIT: u64 = 25_000_000;

/// Object storage settings for offloaded conversion payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend to talk to.
    pub provider: StorageProvider,
    /// Largest compressed upload a grant allows, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Lifetime of an upload grant in seconds.
    #[serde(default = "default_upload_ttl_secs")]
    pub upload_ttl_secs: u64,
}

fn default_max_upload_bytes() -> u64 {
    MAX_UPLOAD_BYTES_LIMIT
}

impl StorageSettings {
    /// Checks the upload limit lies in `[1, MAX_UPLOAD_BYTES_LIMIT]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending value.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.max_upload_bytes == 0 || self.max_upload_bytes > MAX_UPLOAD_BYTES_LIMIT {
            return Err(config::ConfigError::Message(format!(
                "storage.max_upload_bytes must be between 1 and {MAX_UPLOAD_BYTES_LIMIT}, got {}",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }
}

fn default_upload_ttl_secs() -> u64 {
    300 // 5 minutes
}

/// External rendering service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RendererConfig {
    /// Endpoint that accepts a render request and answers with PDF bytes.
    #[serde(default)]
    pub url: Option<String>,
    /// Optional bearer token sent with every render request.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let app: Self = config.try_deserialize()?;
        if let Some(storage) = &app.storage {
            storage.validate()?;
        }
        Ok(app)
    }
}
