//! # smartspace-ingest
//!
//! Attachment ingestion for SmartSpace.
//!
//! This crate provides:
//! - Content-family classification of caller-supplied files
//! - Bounded text sampling for plain text, PDF, and word documents
//! - A language gate admitting only the supported language
//! - The import orchestrator with per-item isolation and rollback
//! - Attachment and space deletion with best-effort file cleanup
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use smartspace_db::MemoryStore;
//! use smartspace_ingest::{IngestConfig, SmartSpace, SourceFile};
//!
//! let store = Arc::new(MemoryStore::new());
//! let app = SmartSpace::new(&IngestConfig::new("/tmp/smartspace"), store.clone(), store);
//!
//! let space = app.spaces.create("Biology", Default::default(), Default::default()).await?;
//! let report = app
//!     .importer
//!     .import_files(space.id, vec![SourceFile::new("cells.pdf")])
//!     .await?;
//! if let Some(message) = report.first_error_message() {
//!     eprintln!("{}", message);
//! }
//! ```

pub mod access;
pub mod adapters;
pub mod app;
pub mod classify;
pub mod config;
pub mod importer;
pub mod language;
pub mod lifecycle;
pub mod sampler;
pub mod spaces;

// Re-export core types
pub use smartspace_core::*;

pub use access::{AccessGuard, NoopAccess, ScopedAccess};
pub use adapters::{OfficeConvertAdapter, PdfTextAdapter, TextNativeAdapter};
pub use app::{Collaborators, SmartSpace};
pub use classify::{classify, classify_file, family_for_mime, SourceFile};
pub use config::IngestConfig;
pub use importer::{ImportReport, Importer, ItemReport};
pub use language::{LanguageGate, WhatlangIdentifier};
pub use lifecycle::{AttachmentLifecycle, DeletionIssue, DeletionReport};
pub use sampler::TextSampler;
pub use spaces::{normalize_space_name, SpaceService};
