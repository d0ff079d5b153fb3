//! End-to-end conversion attempt.
//!
//! ```text
//! Received ─► PayloadResolved ─► Converted ───────┐
//!    │                 │                          ├─► StatusRecorded ─► CleanupAttempted ─► Responded
//!    │                 └──────► ConversionFailed ─┘                          ▲
//!    └─► PayloadResolutionFailed ────────────────────────────────────────────┘
//! ```
//!
//! Payload resolution failures are terminal for status purposes: nothing is
//! recorded, but the uploaded object is still removed.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::adapter::ConversionAdapter;
use super::cleanup::TemporaryObject;
use super::recorder::StatusRecorder;
use super::relay::PayloadRelay;
use super::types::{ConversionRequest, ConversionResult};
use crate::proposal::{ConversionState, ProposalStore};
use crate::render::Renderer;
use crate::storage::ObjectStore;
use folio_shared::ConversionError;

/// Wires relay, adapter, recorder, and cleanup into one attempt.
pub struct ConversionPipeline<S, R, P>
where
    S: ObjectStore + 'static,
    R: Renderer,
    P: ProposalStore,
{
    store: Option<Arc<S>>,
    relay: PayloadRelay<S>,
    adapter: ConversionAdapter<R>,
    recorder: StatusRecorder<P>,
    proposals: Arc<P>,
}

impl<S, R, P> ConversionPipeline<S, R, P>
where
    S: ObjectStore + 'static,
    R: Renderer,
    P: ProposalStore,
{
    /// Create a pipeline. A `None` store disables the storage path.
    #[must_use]
    pub fn new(store: Option<Arc<S>>, renderer: Arc<R>, proposals: Arc<P>) -> Self {
        Self {
            relay: PayloadRelay::new(store.clone()),
            store,
            adapter: ConversionAdapter::new(renderer),
            recorder: StatusRecorder::new(Arc::clone(&proposals)),
            proposals,
        }
    }

    /// Run one conversion attempt for a proposal.
    ///
    /// Any uploaded object named by the request is removed before this
    /// returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// `NotFound` if the proposal does not exist, otherwise whatever the relay
    /// or adapter raised.
    #[instrument(skip(self, request))]
    pub async fn run(
        &self,
        proposal_id: Uuid,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let lease = match (&self.store, request.storage_path()) {
            (Some(store), Some(path)) => Some(TemporaryObject::acquire(Arc::clone(store), path)),
            _ => None,
        };

        let outcome = self.attempt(proposal_id, request).await;

        if let Some(lease) = lease {
            lease.discard().await;
        }

        outcome
    }

    async fn attempt(
        &self,
        proposal_id: Uuid,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        self.ensure_proposal(proposal_id).await?;

        let payload = self.relay.resolve_payload(request).await.map_err(|e| {
            warn!(error = %e, "Payload resolution failed");
            e
        })?;

        match self.adapter.convert(&payload).await {
            Ok(result) => {
                self.recorder
                    .record_status(proposal_id, ConversionState::Ready, None)
                    .await;
                info!(filename = %result.filename, "Conversion succeeded");
                Ok(result)
            }
            Err(e) => {
                self.recorder
                    .record_status(
                        proposal_id,
                        ConversionState::Error,
                        Some(e.message().to_string()),
                    )
                    .await;
                warn!(error = %e, status = e.status_code(), "Conversion failed");
                Err(e)
            }
        }
    }

    async fn ensure_proposal(&self, proposal_id: Uuid) -> Result<(), ConversionError> {
        let exists = self.proposals.exists(proposal_id).await.map_err(|e| {
            warn!(error = %e, "Proposal lookup failed");
            ConversionError::internal(e.to_string())
        })?;

        if exists {
            Ok(())
        } else {
            Err(ConversionError::NotFound(format!(
                "proposal {proposal_id} not found"
            )))
        }
    }
}
