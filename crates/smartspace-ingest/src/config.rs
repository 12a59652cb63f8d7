//! Ingestion pipeline configuration.

use std::path::PathBuf;

use smartspace_core::defaults::{
    CLASSIFY_SNIFF_BYTES, EXTRACTION_CMD_TIMEOUT_SECS, MAX_PDF_PAGES, SAMPLE_CAP,
    SUPPORTED_LANGUAGE,
};
use smartspace_db::AttachmentStorage;

/// Settings for one ingestion pipeline instance.
///
/// The data root is injected; attachments live in its `Attachments`
/// subdirectory.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Per-user data root.
    pub data_root: PathBuf,
    /// Sample cap (bytes for plain text, characters for documents).
    pub sample_cap: usize,
    /// Maximum PDF pages consulted per sample.
    pub max_pdf_pages: usize,
    /// The single admitted ISO 639-1 tag.
    pub supported_language: String,
    /// Leading bytes read from a source for type sniffing.
    pub classify_sniff_bytes: usize,
    /// Timeout for each external document-conversion command.
    pub cmd_timeout_secs: u64,
}

impl IngestConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            sample_cap: SAMPLE_CAP,
            max_pdf_pages: MAX_PDF_PAGES,
            supported_language: SUPPORTED_LANGUAGE.to_string(),
            classify_sniff_bytes: CLASSIFY_SNIFF_BYTES,
            cmd_timeout_secs: EXTRACTION_CMD_TIMEOUT_SECS,
        }
    }

    pub fn with_cmd_timeout_secs(mut self, secs: u64) -> Self {
        self.cmd_timeout_secs = secs.max(1);
        self
    }

    /// Attachment directory manager rooted under the data root.
    pub fn storage(&self) -> AttachmentStorage {
        AttachmentStorage::under_data_root(&self.data_root)
    }
}
