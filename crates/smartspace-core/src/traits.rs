//! Repository and collaborator traits.
//!
//! The object store, document parsers, and language identifier are
//! external collaborators; the ingestion pipeline only depends on these
//! contracts.

use std::path::Path;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{Attachment, CreateSpaceRequest, NewAttachment, Result, Space, SpaceBlock};

// =============================================================================
// OBJECT STORE
// =============================================================================

/// Repository for spaces and their blocks.
#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Insert a new space.
    async fn create(&self, req: CreateSpaceRequest) -> Result<Space>;

    /// Get a space by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Space>>;

    /// List all live spaces, newest first.
    async fn list(&self) -> Result<Vec<Space>>;

    /// Delete a space. Cascades to its blocks and attachment records;
    /// backing files are the caller's responsibility.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Add a block to a space.
    async fn add_block(
        &self,
        space_id: Uuid,
        title: &str,
        kind: &str,
        details: &str,
    ) -> Result<SpaceBlock>;

    /// List a space's blocks, oldest first.
    async fn list_blocks(&self, space_id: Uuid) -> Result<Vec<SpaceBlock>>;
}

/// Repository for attachment records.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Insert a record owned by `new.space_id`.
    async fn insert(&self, new: NewAttachment) -> Result<Attachment>;

    /// Get an attachment by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Attachment>>;

    /// List a space's attachments, newest first.
    async fn list_for_space(&self, space_id: Uuid) -> Result<Vec<Attachment>>;

    /// Delete an attachment record. Missing records are not an error.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// DOCUMENT PARSERS
// =============================================================================

/// Page-oriented PDF text access.
#[async_trait]
pub trait PdfReader: Send + Sync {
    /// Open the document and return its page count. Fails for unreadable files.
    async fn page_count(&self, path: &Path) -> Result<usize>;

    /// Plain text of one page (0-based). `None` when the page has no text layer.
    async fn page_text(&self, path: &Path, index: usize) -> Result<Option<String>>;

    /// Check if the reader's external dependencies are available.
    async fn health_check(&self) -> Result<bool>;

    /// Human-readable name of this reader.
    fn name(&self) -> &str;
}

/// Whole-document plain text access for word-processor files.
#[async_trait]
pub trait WordDocumentReader: Send + Sync {
    /// Full plain-text rendering of the document.
    async fn plain_text(&self, path: &Path) -> Result<String>;

    /// Check if the reader's external dependencies are available.
    async fn health_check(&self) -> Result<bool>;

    /// Human-readable name of this reader.
    fn name(&self) -> &str;
}

// =============================================================================
// LANGUAGE IDENTIFICATION
// =============================================================================

/// Best-guess language identification. A pure function of the sample.
pub trait LanguageIdentifier: Send + Sync {
    /// ISO 639-1 tag of the dominant language, or `None` when undetermined.
    fn identify(&self, sample: &str) -> Option<String>;
}
