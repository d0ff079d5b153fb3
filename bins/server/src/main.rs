//! Folio API Server
//!
//! Main entry point for the proposal PDF conversion service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::{AppState, create_router};
use folio_core::render::RenderClient;
use folio_core::storage::{StorageConfig, StorageService};
use folio_db::connect;
use folio_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Object storage is optional; without it only inline payloads convert
    let storage = match config.storage.clone() {
        Some(settings) => {
            let service = StorageService::from_config(StorageConfig::from(settings))?;
            info!(
                provider = service.provider_name(),
                max_upload_bytes = service.config().max_upload_bytes,
                "Storage service configured"
            );
            Some(Arc::new(service))
        }
        None => {
            warn!("Storage not configured, offloaded uploads are disabled");
            None
        }
    };

    let renderer = RenderClient::new(&config.renderer)?;
    if renderer.is_configured() {
        info!("Rendering service configured");
    } else {
        warn!("Rendering service not configured, conversions will fail");
    }

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        storage,
        renderer: Arc::new(renderer),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
