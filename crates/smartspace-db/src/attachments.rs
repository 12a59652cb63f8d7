//! Attachment record repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use smartspace_core::{Attachment, AttachmentRepository, Error, NewAttachment, Result};

/// PostgreSQL implementation of AttachmentRepository.
pub struct PgAttachmentRepository {
    pool: Pool<Postgres>,
}

impl PgAttachmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn attachment_from_row(r: &PgRow) -> Attachment {
    Attachment {
        id: r.get("id"),
        space_id: r.get("space_id"),
        original_file_name: r.get("original_file_name"),
        stored_file_name: r.get("stored_file_name"),
        language_code: r.get("language_code"),
        added_at: r.get("added_at_utc"),
    }
}

/// Foreign key violations mean the owning space is gone.
fn map_insert_error(err: sqlx::Error, space_id: Uuid) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return Error::SpaceNotFound(space_id);
        }
        if db_err.is_unique_violation() {
            return Error::InvalidInput(format!(
                "stored file name already in use: {}",
                db_err.message()
            ));
        }
    }
    Error::Database(err)
}

#[async_trait]
impl AttachmentRepository for PgAttachmentRepository {
    async fn insert(&self, new: NewAttachment) -> Result<Attachment> {
        let attachment = new.into_attachment();

        sqlx::query(
            "INSERT INTO space_attachment
                (id, space_id, original_file_name, stored_file_name, language_code, added_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(attachment.id)
        .bind(attachment.space_id)
        .bind(&attachment.original_file_name)
        .bind(&attachment.stored_file_name)
        .bind(&attachment.language_code)
        .bind(attachment.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, attachment.space_id))?;

        debug!(
            subsystem = "database",
            component = "attachments",
            op = "insert",
            attachment_id = %attachment.id,
            space_id = %attachment.space_id,
            stored_file_name = %attachment.stored_file_name,
            "Attachment record inserted"
        );
        Ok(attachment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Attachment>> {
        let row = sqlx::query(
            "SELECT id, space_id, original_file_name, stored_file_name, language_code, added_at_utc
             FROM space_attachment WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(attachment_from_row))
    }

    async fn list_for_space(&self, space_id: Uuid) -> Result<Vec<Attachment>> {
        let rows = sqlx::query(
            "SELECT id, space_id, original_file_name, stored_file_name, language_code, added_at_utc
             FROM space_attachment WHERE space_id = $1
             ORDER BY added_at_utc DESC, id DESC",
        )
        .bind(space_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(attachment_from_row).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM space_attachment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
