//! Table definitions for the object store.
//!
//! Applied idempotently at startup. Attachment records reference their
//! space with `ON DELETE CASCADE`, so removing a space removes its records
//! in the same statement; backing files are removed by the lifecycle layer.

use sqlx::PgPool;
use tracing::info;

use smartspace_core::{Error, Result};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS space (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    space_type      TEXT NOT NULL,
    mode            TEXT NOT NULL,
    created_at_utc  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS space_block (
    id              UUID PRIMARY KEY,
    space_id        UUID NOT NULL REFERENCES space(id) ON DELETE CASCADE,
    title           TEXT NOT NULL,
    kind            TEXT NOT NULL,
    details         TEXT NOT NULL DEFAULT '',
    created_at_utc  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS space_attachment (
    id                  UUID PRIMARY KEY,
    space_id            UUID NOT NULL REFERENCES space(id) ON DELETE CASCADE,
    original_file_name  TEXT NOT NULL,
    stored_file_name    TEXT NOT NULL UNIQUE,
    language_code       TEXT,
    added_at_utc        TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_space_block_space ON space_block(space_id);
CREATE INDEX IF NOT EXISTS idx_space_attachment_space ON space_attachment(space_id, added_at_utc DESC);
"#;

/// Create tables and indexes if they do not exist.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(Error::Database)?;
    info!(
        subsystem = "database",
        component = "schema",
        op = "migrate",
        "Schema up to date"
    );
    Ok(())
}
