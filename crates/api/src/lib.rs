//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for proposal PDF conversion
//! - Mapping from conversion errors to JSON error bodies

pub mod error;
pub mod routes;

use axum::Router;
use folio_core::render::RenderClient;
use folio_core::storage::StorageService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use axum::http::header;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Object storage for offloaded payloads (optional).
    pub storage: Option<Arc<StorageService>>,
    /// Client for the external rendering service.
    pub renderer: Arc<RenderClient>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        // Wraps the trace layer so request traces never print credentials.
        .layer(redact_credentials())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

fn redact_credentials() -> SetSensitiveRequestHeadersLayer {
    SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use std::convert::Infallible;
    use tower::{Layer, ServiceExt, service_fn};

    #[tokio::test]
    async fn test_authorization_header_is_marked_sensitive() {
        let service = redact_credentials().layer(service_fn(|req: Request<Body>| async move {
            let sensitive = req.headers()[header::AUTHORIZATION].is_sensitive();
            Ok::<_, Infallible>(Response::new(Body::from(sensitive.to_string())))
        }));

        let response = service
            .oneshot(
                Request::builder()
                    .header(header::AUTHORIZATION, "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&bytes[..], b"true");
    }
}
