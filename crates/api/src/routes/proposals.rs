//! Proposal PDF conversion routes.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use garde::Validate;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, error::ApiError};
use folio_core::conversion::{
    ConversionPipeline, ConversionRequest, ConversionRequestBody, ConversionResult,
    UploadGrantIssuer, UploadUrlRequestBody,
};
use folio_core::proposal::{ProposalConversionStatus, ProposalStore, ProposalStoreError};
use folio_core::storage::StorageService;
use folio_db::ProposalRepository;
use folio_shared::ConversionError;

/// Creates the proposal PDF routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/proposals/{id}/pdf/upload-url", post(request_upload_url))
        .route("/proposals/{id}/pdf", post(convert_to_pdf))
        .route("/proposals/{id}/pdf/status", get(conversion_status))
}

/// Response for the status endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStatusResponse {
    /// Proposal ID.
    pub proposal_id: Uuid,
    /// Outcome of the last attempt, `null` if never attempted.
    pub pdf_status: Option<ProposalConversionStatus>,
}

fn upload_issuer(state: &AppState) -> UploadGrantIssuer<StorageService> {
    let issuer = UploadGrantIssuer::new(state.storage.clone());
    match &state.storage {
        Some(storage) => {
            let config = storage.config();
            issuer.with_limits(
                config.max_upload_bytes,
                Duration::from_secs(config.presign_upload_ttl_secs),
            )
        }
        None => issuer,
    }
}

fn proposals(state: &AppState) -> Arc<ProposalRepository> {
    Arc::new(ProposalRepository::new((*state.db).clone()))
}

/// POST `/proposals/{id}/pdf/upload-url`
/// Issue a presigned upload URL for an offloaded, gzipped payload.
async fn request_upload_url(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UploadUrlRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(proposal_id) = id?;
    let Json(body) = payload?;
    body.validate()
        .map_err(|report| ConversionError::validation(report.to_string()))?;

    let grant = upload_issuer(&state)
        .issue_upload_grant(proposal_id, body.content_length, body.content_type.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(grant)))
}

/// POST `/proposals/{id}/pdf`
/// Convert inline or offloaded HTML into a PDF download.
///
/// The attempt runs on its own task so that a dropped client connection does
/// not interrupt status recording or cleanup.
async fn convert_to_pdf(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ConversionRequestBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(proposal_id) = id?;
    let Json(body) = payload?;
    let request = ConversionRequest::try_from(body)?;

    info!(
        proposal_id = %proposal_id,
        offloaded = request.storage_path().is_some(),
        "Conversion requested"
    );

    let pipeline = ConversionPipeline::new(
        state.storage.clone(),
        Arc::clone(&state.renderer),
        proposals(&state),
    );
    let result = tokio::spawn(async move { pipeline.run(proposal_id, request).await })
        .await
        .map_err(|e| {
            error!(proposal_id = %proposal_id, error = %e, "Conversion task aborted");
            ConversionError::internal("conversion task aborted")
        })??;

    Ok(pdf_response(result))
}

/// GET `/proposals/{id}/pdf/status`
/// Read the outcome of the last conversion attempt.
async fn conversion_status(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ConversionStatusResponse>, ApiError> {
    let Path(proposal_id) = id?;

    let pdf_status = proposals(&state)
        .conversion_status(proposal_id)
        .await
        .map_err(|e| match e {
            ProposalStoreError::NotFound(_) => {
                ConversionError::NotFound(format!("proposal {proposal_id} not found"))
            }
            ProposalStoreError::Repository(msg) => {
                error!(proposal_id = %proposal_id, error = %msg, "Failed to read conversion status");
                ConversionError::internal(msg)
            }
        })?;

    Ok(Json(ConversionStatusResponse {
        proposal_id,
        pdf_status,
    }))
}

fn pdf_response(result: ConversionResult) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", result.filename);
    let mut response = (StatusCode::OK, result.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    // Sanitized filenames are plain ASCII, so this only fails on a bug upstream.
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}
