//! # smartspace-core
//!
//! Core types, traits, and abstractions for SmartSpace.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the storage and ingestion crates depend on.
//!
//! Structured log fields used across crates: `subsystem`, `component`, `op`,
//! `space_id`, `attachment_id`, `stored_file_name`, `content_family`,
//! `language`, `duration_ms`, `error`.

pub mod defaults;
pub mod error;
pub mod file_types;
pub mod models;
pub mod text;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_types::{
    is_generic_mime, is_text_like_mime, is_valid_mime_type, mime_from_extension,
    sanitize_filename, sniff_content_type, DOCX_MIME,
};
pub use models::*;
pub use text::{fold_name, names_equivalent};
pub use traits::*;
