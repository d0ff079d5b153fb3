//! Proposal conversion-status persistence seam.
//!
//! The proposal record itself (CRUD, snapshots) is owned elsewhere. This
//! module only knows how to check that a proposal exists and how to merge the
//! conversion-status field into it.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Outcome of the last conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionState {
    /// The last attempt produced a PDF.
    Ready,
    /// The last attempt failed.
    Error,
}

impl ConversionState {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ready" => Some(Self::Ready),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Conversion status embedded in a proposal record. Last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalConversionStatus {
    /// Outcome of the last attempt.
    pub status: ConversionState,
    /// Server-assigned time of the last attempt.
    pub last_attempt_at: DateTime<Utc>,
    /// Failure cause, `None` when ready.
    pub error: Option<String>,
}

/// Proposal store errors.
#[derive(Debug, Error)]
pub enum ProposalStoreError {
    /// Proposal does not exist.
    #[error("proposal not found: {0}")]
    NotFound(Uuid),

    /// Store operation failed.
    #[error("proposal store error: {0}")]
    Repository(String),
}

impl ProposalStoreError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

/// Store trait for proposal conversion status.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ProposalStore: Send + Sync {
    /// Check whether a proposal exists.
    fn exists(
        &self,
        proposal_id: Uuid,
    ) -> impl Future<Output = Result<bool, ProposalStoreError>> + Send;

    /// Overwrite the conversion-status field in place, stamping it with the
    /// store's own clock. Must not rewrite any other part of the record.
    /// Fails with [`ProposalStoreError::NotFound`] if no such proposal exists.
    fn merge_conversion_status(
        &self,
        proposal_id: Uuid,
        status: ConversionState,
        error: Option<String>,
    ) -> impl Future<Output = Result<(), ProposalStoreError>> + Send;

    /// Read the conversion-status field. `Ok(None)` means never attempted;
    /// a missing proposal is [`ProposalStoreError::NotFound`].
    fn conversion_status(
        &self,
        proposal_id: Uuid,
    ) -> impl Future<Output = Result<Option<ProposalConversionStatus>, ProposalStoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_state_round_trip() {
        for state in [ConversionState::Ready, ConversionState::Error] {
            assert_eq!(ConversionState::parse(state.as_str()), Some(state));
        }
        assert_eq!(ConversionState::parse("pending"), None);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let status = ProposalConversionStatus {
            status: ConversionState::Error,
            last_attempt_at: DateTime::parse_from_rfc3339("2026-01-08T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            error: Some("bad css".to_string()),
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["lastAttemptAt"], "2026-01-08T10:00:00Z");
        assert_eq!(value["error"], "bad css");
    }
}
