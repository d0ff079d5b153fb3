//! Shared configuration and error types for Folio.
//!
//! This crate provides common pieces used across all other crates:
//! - Configuration management (server, database, storage, renderer)
//! - The conversion error taxonomy and its HTTP status mapping

pub mod config;
pub mod error;

pub use config::{
    AppConfig, MAX_UPLOAD_BYTES_LIMIT, RendererConfig, StorageProvider, StorageSettings,
};
pub use error::ConversionError;
