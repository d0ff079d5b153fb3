//! Proposal repository for the conversion-status field.
//!
//! Implements the core `ProposalStore` trait using SeaORM. Status writes are a
//! single column-targeted `UPDATE` stamped with the database clock, so
//! concurrent attempts order themselves and the last write wins.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::proposals;
use folio_core::proposal::{
    ConversionState, ProposalConversionStatus, ProposalStore, ProposalStoreError,
};

/// Proposal repository implementation.
#[derive(Debug, Clone)]
pub struct ProposalRepository {
    db: DatabaseConnection,
}

impl ProposalRepository {
    /// Create a new proposal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ProposalStore for ProposalRepository {
    async fn exists(&self, proposal_id: Uuid) -> Result<bool, ProposalStoreError> {
        let count = proposals::Entity::find_by_id(proposal_id)
            .count(&self.db)
            .await
            .map_err(|e| ProposalStoreError::repository(e.to_string()))?;

        Ok(count > 0)
    }

    async fn merge_conversion_status(
        &self,
        proposal_id: Uuid,
        status: ConversionState,
        error: Option<String>,
    ) -> Result<(), ProposalStoreError> {
        let result = proposals::Entity::update_many()
            .col_expr(proposals::Column::PdfStatus, Expr::value(status.as_str()))
            .col_expr(
                proposals::Column::PdfLastAttemptAt,
                Expr::current_timestamp().into(),
            )
            .col_expr(proposals::Column::PdfError, Expr::value(error))
            .filter(proposals::Column::Id.eq(proposal_id))
            .exec(&self.db)
            .await
            .map_err(|e| ProposalStoreError::repository(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(ProposalStoreError::NotFound(proposal_id));
        }

        Ok(())
    }

    async fn conversion_status(
        &self,
        proposal_id: Uuid,
    ) -> Result<Option<ProposalConversionStatus>, ProposalStoreError> {
        let model = proposals::Entity::find_by_id(proposal_id)
            .one(&self.db)
            .await
            .map_err(|e| ProposalStoreError::repository(e.to_string()))?
            .ok_or(ProposalStoreError::NotFound(proposal_id))?;

        Ok(to_domain(&model))
    }
}

/// Read the embedded status. A row never converted, or with an unknown status
/// value, has no status.
fn to_domain(model: &proposals::Model) -> Option<ProposalConversionStatus> {
    let status = ConversionState::parse(model.pdf_status.as_deref()?)?;
    let last_attempt_at = model.pdf_last_attempt_at?.with_timezone(&Utc);

    Some(ProposalConversionStatus {
        status,
        last_attempt_at,
        error: model.pdf_error.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn model(status: Option<&str>, at: Option<&str>, error: Option<&str>) -> proposals::Model {
        let created = DateTime::parse_from_rfc3339("2026-10-01T09:00:00+00:00").unwrap();
        proposals::Model {
            id: Uuid::new_v4(),
            title: "Rooftop survey".to_string(),
            pdf_status: status.map(str::to_string),
            pdf_last_attempt_at: at.map(|s| DateTime::<FixedOffset>::parse_from_rfc3339(s).unwrap()),
            pdf_error: error.map(str::to_string),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_to_domain_never_attempted() {
        assert!(to_domain(&model(None, None, None)).is_none());
    }

    #[test]
    fn test_to_domain_error_status() {
        let status = to_domain(&model(
            Some("error"),
            Some("2026-10-18T12:00:00+02:00"),
            Some("bad css"),
        ))
        .unwrap();

        assert_eq!(status.status, ConversionState::Error);
        assert_eq!(status.error.as_deref(), Some("bad css"));
        assert_eq!(
            status.last_attempt_at,
            DateTime::parse_from_rfc3339("2026-10-18T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
        );
    }

    #[test]
    fn test_to_domain_unknown_status_is_ignored() {
        assert!(to_domain(&model(Some("pending"), Some("2026-10-18T12:00:00Z"), None)).is_none());
    }
}
