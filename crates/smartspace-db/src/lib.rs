//! # smartspace-db
//!
//! Persistence for SmartSpace.
//!
//! This crate provides:
//! - Connection pool management and schema setup
//! - PostgreSQL repositories for spaces, blocks, and attachment records
//! - An in-memory store implementing the same traits
//! - The on-disk attachment directory and stored-file naming
//!
//! ## Example
//!
//! ```rust,ignore
//! use smartspace_db::{Database, SpaceRepository, CreateSpaceRequest};
//!
//! let db = Database::connect("postgres://localhost/smartspace").await?;
//! db.migrate().await?;
//! let space = db.spaces.create(CreateSpaceRequest {
//!     name: "Biology".to_string(),
//!     space_type: Default::default(),
//!     mode: Default::default(),
//! }).await?;
//! ```

pub mod attachment_storage;
pub mod attachments;
pub mod memory;
pub mod pool;
pub mod schema;
pub mod spaces;

// Re-export core types
pub use smartspace_core::*;

pub use attachment_storage::{AttachmentStorage, StoredNameKind};
pub use attachments::PgAttachmentRepository;
pub use memory::MemoryStore;
pub use pool::{open_pool, PoolConfig, PoolStatus};
pub use spaces::PgSpaceRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Space and block repository.
    pub spaces: PgSpaceRepository,
    /// Attachment record repository.
    pub attachments: PgAttachmentRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            spaces: PgSpaceRepository::new(pool.clone()),
            attachments: PgAttachmentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = open_pool(url, PoolConfig::default()).await?;
        Ok(Self::new(pool))
    }

    /// Connect with explicit pool settings.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = open_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Current pool occupancy.
    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus::of(&self.pool)
    }

    /// Apply the schema.
    pub async fn migrate(&self) -> Result<()> {
        schema::migrate(&self.pool).await
    }
}
