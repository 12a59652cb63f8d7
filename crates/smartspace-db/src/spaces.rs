//! Space repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use smartspace_core::{
    CreateSpaceRequest, Error, Result, Space, SpaceBlock, SpaceMode, SpaceRepository, SpaceType,
};

/// PostgreSQL implementation of SpaceRepository.
pub struct PgSpaceRepository {
    pool: Pool<Postgres>,
}

impl PgSpaceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn space_from_row(r: &PgRow) -> Result<Space> {
    let space_type: String = r.get("space_type");
    let mode: String = r.get("mode");
    Ok(Space {
        id: r.get("id"),
        name: r.get("name"),
        space_type: space_type
            .parse::<SpaceType>()
            .map_err(Error::Serialization)?,
        mode: mode.parse::<SpaceMode>().map_err(Error::Serialization)?,
        created_at: r.get("created_at_utc"),
    })
}

fn block_from_row(r: &PgRow) -> SpaceBlock {
    SpaceBlock {
        id: r.get("id"),
        space_id: r.get("space_id"),
        title: r.get("title"),
        kind: r.get("kind"),
        details: r.get("details"),
        created_at: r.get("created_at_utc"),
    }
}

#[async_trait]
impl SpaceRepository for PgSpaceRepository {
    async fn create(&self, req: CreateSpaceRequest) -> Result<Space> {
        let space = Space {
            id: Uuid::now_v7(),
            name: req.name,
            space_type: req.space_type,
            mode: req.mode,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO space (id, name, space_type, mode, created_at_utc)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(space.id)
        .bind(&space.name)
        .bind(space.space_type.as_str())
        .bind(space.mode.as_str())
        .bind(space.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(space)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Space>> {
        let row = sqlx::query(
            "SELECT id, name, space_type, mode, created_at_utc FROM space WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(space_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Space>> {
        let rows = sqlx::query(
            "SELECT id, name, space_type, mode, created_at_utc FROM space
             ORDER BY created_at_utc DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(space_from_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM space WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::SpaceNotFound(id));
        }
        Ok(())
    }

    async fn add_block(
        &self,
        space_id: Uuid,
        title: &str,
        kind: &str,
        details: &str,
    ) -> Result<SpaceBlock> {
        let row = sqlx::query(
            "INSERT INTO space_block (id, space_id, title, kind, details, created_at_utc)
             SELECT $1, s.id, $3, $4, $5, $6 FROM space s WHERE s.id = $2
             RETURNING id, space_id, title, kind, details, created_at_utc",
        )
        .bind(Uuid::now_v7())
        .bind(space_id)
        .bind(title)
        .bind(kind)
        .bind(details)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(block_from_row)
            .ok_or(Error::SpaceNotFound(space_id))
    }

    async fn list_blocks(&self, space_id: Uuid) -> Result<Vec<SpaceBlock>> {
        let rows = sqlx::query(
            "SELECT id, space_id, title, kind, details, created_at_utc FROM space_block
             WHERE space_id = $1 ORDER BY created_at_utc, id",
        )
        .bind(space_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(block_from_row).collect())
    }
}
