//! Status recorder: writes the outcome of an attempt onto the proposal.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::proposal::{ConversionState, ProposalStore};

/// Records conversion outcomes. Never fails the caller.
pub struct StatusRecorder<P: ProposalStore> {
    proposals: Arc<P>,
}

impl<P: ProposalStore> StatusRecorder<P> {
    /// Create a recorder over a proposal store.
    #[must_use]
    pub fn new(proposals: Arc<P>) -> Self {
        Self { proposals }
    }

    /// Merge `{status, lastAttemptAt, error}` into the proposal.
    ///
    /// Concurrent attempts race and the last write wins. Write failures are
    /// logged and swallowed so they never change the response.
    pub async fn record_status(
        &self,
        proposal_id: Uuid,
        status: ConversionState,
        error: Option<String>,
    ) {
        let error = match status {
            ConversionState::Ready => None,
            ConversionState::Error => error,
        };

        match self
            .proposals
            .merge_conversion_status(proposal_id, status, error)
            .await
        {
            Ok(()) => {
                debug!(proposal_id = %proposal_id, status = status.as_str(), "Conversion status recorded");
            }
            Err(e) => {
                error!(
                    proposal_id = %proposal_id,
                    status = status.as_str(),
                    error = %e,
                    "Failed to record conversion status"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::fakes::MemoryProposals;

    #[tokio::test]
    async fn test_record_ready_clears_error() {
        let id = Uuid::new_v4();
        let proposals = Arc::new(MemoryProposals::new().with_proposal(id));
        let recorder = StatusRecorder::new(proposals.clone());

        recorder
            .record_status(id, ConversionState::Error, Some("bad css".into()))
            .await;
        recorder
            .record_status(id, ConversionState::Ready, Some("ignored".into()))
            .await;

        let status = proposals.status(id).unwrap();
        assert_eq!(status.status, ConversionState::Ready);
        assert_eq!(status.error, None);
        assert_eq!(proposals.writes(), 2);
    }

    #[tokio::test]
    async fn test_record_error_keeps_message() {
        let id = Uuid::new_v4();
        let proposals = Arc::new(MemoryProposals::new().with_proposal(id));
        StatusRecorder::new(proposals.clone())
            .record_status(id, ConversionState::Error, Some("bad css".into()))
            .await;

        let status = proposals.status(id).unwrap();
        assert_eq!(status.status, ConversionState::Error);
        assert_eq!(status.error.as_deref(), Some("bad css"));
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let id = Uuid::new_v4();
        let proposals = Arc::new(MemoryProposals::new().failing_writes().with_proposal(id));

        StatusRecorder::new(proposals.clone())
            .record_status(id, ConversionState::Ready, None)
            .await;

        assert_eq!(proposals.writes(), 1);
        assert!(proposals.status(id).is_none());
    }

    #[tokio::test]
    async fn test_missing_proposal_is_swallowed() {
        let proposals = Arc::new(MemoryProposals::new());
        StatusRecorder::new(proposals.clone())
            .record_status(Uuid::new_v4(), ConversionState::Ready, None)
            .await;
        assert_eq!(proposals.writes(), 1);
    }
}
