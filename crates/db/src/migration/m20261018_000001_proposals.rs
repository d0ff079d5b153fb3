//! Proposals migration.
//!
//! Creates the proposals table with its embedded PDF conversion status.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(PROPOSALS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS proposals CASCADE;")
            .await?;
        Ok(())
    }
}

const PROPOSALS_SQL: &str = r"
-- Proposals; the pdf_* columns hold the outcome of the last conversion attempt
CREATE TABLE proposals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(255) NOT NULL,
    pdf_status VARCHAR(16),
    pdf_last_attempt_at TIMESTAMPTZ,
    pdf_error TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_pdf_status CHECK (pdf_status IS NULL OR pdf_status IN ('ready', 'error')),
    CONSTRAINT chk_pdf_error_only_on_failure CHECK (pdf_status = 'error' OR pdf_error IS NULL)
);

-- Index for operators looking for failed conversions
CREATE INDEX idx_proposals_pdf_failed ON proposals(pdf_last_attempt_at DESC) WHERE pdf_status = 'error';
";
