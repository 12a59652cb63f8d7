//! Ingestion orchestrator.
//!
//! Each item runs `classify → copy → sample → gate → record` and ends
//! admitted, rejected, or failed. A rejected or failed item never leaves a
//! file behind in the attachment directory, and an item's outcome never
//! affects the items after it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use smartspace_core::defaults::PASTED_ORIGINAL_NAME;
use smartspace_core::{
    Attachment, AttachmentRepository, ContentFamily, Error, NewAttachment, Result,
    SpaceRepository,
};
use smartspace_db::{AttachmentStorage, StoredNameKind};

use crate::access::{AccessGuard, NoopAccess, ScopedAccess};
use crate::classify::{classify_file, SourceFile};
use crate::config::IngestConfig;
use crate::language::LanguageGate;
use crate::sampler::TextSampler;

// =============================================================================
// IMPORT REPORT
// =============================================================================

/// Outcome of one source in a batch.
#[derive(Debug)]
pub struct ItemReport {
    pub source: PathBuf,
    pub original_file_name: String,
    pub outcome: Result<Attachment>,
}

impl ItemReport {
    pub fn is_admitted(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn is_rejected(&self) -> bool {
        matches!(&self.outcome, Err(e) if e.is_rejection())
    }
}

/// Per-item outcomes of a batch import, in input order.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub items: Vec<ItemReport>,
}

impl ImportReport {
    pub fn admitted(&self) -> Vec<&Attachment> {
        self.items
            .iter()
            .filter_map(|item| item.outcome.as_ref().ok())
            .collect()
    }

    pub fn rejected(&self) -> Vec<&ItemReport> {
        self.items.iter().filter(|item| item.is_rejected()).collect()
    }

    pub fn failed(&self) -> Vec<&ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(&item.outcome, Err(e) if !e.is_rejection()))
            .collect()
    }

    /// User-facing message for the first unsuccessful item, if any.
    pub fn first_error_message(&self) -> Option<String> {
        self.items
            .iter()
            .find_map(|item| item.outcome.as_ref().err())
            .map(Error::user_message)
    }

    pub fn all_admitted(&self) -> bool {
        self.items.iter().all(ItemReport::is_admitted)
    }
}

// =============================================================================
// IMPORTER
// =============================================================================

/// Drives file and pasted-text imports into a space.
pub struct Importer {
    spaces: Arc<dyn SpaceRepository>,
    attachments: Arc<dyn AttachmentRepository>,
    storage: AttachmentStorage,
    sampler: TextSampler,
    gate: LanguageGate,
    access: Arc<dyn ScopedAccess>,
    sniff_bytes: usize,
}

impl Importer {
    pub fn new(
        config: &IngestConfig,
        spaces: Arc<dyn SpaceRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        sampler: TextSampler,
        gate: LanguageGate,
    ) -> Self {
        Self {
            spaces,
            attachments,
            storage: config.storage(),
            sampler,
            gate,
            access: Arc::new(NoopAccess),
            sniff_bytes: config.classify_sniff_bytes,
        }
    }

    /// Use a host hook for per-file read permission.
    pub fn with_scoped_access(mut self, access: Arc<dyn ScopedAccess>) -> Self {
        self.access = access;
        self
    }

    pub fn storage(&self) -> &AttachmentStorage {
        &self.storage
    }

    async fn require_space(&self, space_id: Uuid) -> Result<()> {
        match self.spaces.get(space_id).await? {
            Some(_) => Ok(()),
            None => Err(Error::SpaceNotFound(space_id)),
        }
    }

    /// Import files into a space.
    ///
    /// Fails as a whole only when the space is missing or the attachment
    /// directory cannot be prepared. Everything else is reported per item.
    pub async fn import_files(
        &self,
        space_id: Uuid,
        sources: Vec<SourceFile>,
    ) -> Result<ImportReport> {
        let start = Instant::now();
        self.require_space(space_id).await?;
        self.storage.ensure_directory().await?;

        let mut report = ImportReport::default();
        for source in sources {
            let original_file_name = source.original_file_name();
            let outcome = self.import_one(space_id, &source, &original_file_name).await;
            match &outcome {
                Ok(attachment) => info!(
                    subsystem = "ingest",
                    component = "importer",
                    op = "import_file",
                    space_id = %space_id,
                    attachment_id = %attachment.id,
                    stored_file_name = %attachment.stored_file_name,
                    "Attachment admitted"
                ),
                Err(e) if e.is_rejection() => info!(
                    subsystem = "ingest",
                    component = "importer",
                    op = "import_file",
                    space_id = %space_id,
                    original_file_name = %original_file_name,
                    error = %e,
                    "Attachment rejected"
                ),
                Err(e) => warn!(
                    subsystem = "ingest",
                    component = "importer",
                    op = "import_file",
                    space_id = %space_id,
                    original_file_name = %original_file_name,
                    error = %e,
                    "Attachment import failed"
                ),
            }
            report.items.push(ItemReport {
                source: source.path,
                original_file_name,
                outcome,
            });
        }

        debug!(
            subsystem = "ingest",
            component = "importer",
            op = "import_files",
            space_id = %space_id,
            total = report.items.len(),
            admitted = report.admitted().len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch import finished"
        );
        Ok(report)
    }

    async fn import_one(
        &self,
        space_id: Uuid,
        source: &SourceFile,
        original_file_name: &str,
    ) -> Result<Attachment> {
        let _access = AccessGuard::acquire(self.access.as_ref(), &source.path);

        let family = classify_file(source, self.sniff_bytes).await;
        if family == ContentFamily::Unsupported {
            return Err(Error::UnsupportedContainer(original_file_name.to_string()));
        }

        let stored_file_name =
            AttachmentStorage::stored_name_for(StoredNameKind::Imported(original_file_name));
        self.storage
            .copy_from(&source.path, &stored_file_name)
            .await?;

        let result = self
            .admit_stored(space_id, family, original_file_name, &stored_file_name)
            .await;
        if result.is_err() {
            self.discard(&stored_file_name).await;
        }
        result
    }

    /// Sample and gate the copied file, then record it.
    async fn admit_stored(
        &self,
        space_id: Uuid,
        family: ContentFamily,
        original_file_name: &str,
        stored_file_name: &str,
    ) -> Result<Attachment> {
        let destination = self.storage.path_for(stored_file_name);
        let sample = self
            .sampler
            .sample(family, &destination)
            .await
            .ok_or_else(|| Error::ExtractionFailed(original_file_name.to_string()))?;
        let language = self.gate.admit(&sample)?;

        self.attachments
            .insert(NewAttachment {
                space_id,
                original_file_name: original_file_name.to_string(),
                stored_file_name: stored_file_name.to_string(),
                language_code: Some(language),
            })
            .await
    }

    /// Remove a file written for an item that did not make it in.
    async fn discard(&self, stored_file_name: &str) {
        if let Err(e) = self.storage.remove(stored_file_name).await {
            warn!(
                subsystem = "ingest",
                component = "importer",
                stored_file_name,
                error = %e,
                "Failed to remove file of rejected item"
            );
        }
    }

    /// Save pasted text as an attachment.
    ///
    /// Empty or whitespace-only input is refused before any disk access.
    /// The trimmed text is gated directly and written only once admitted.
    pub async fn import_pasted_text(&self, space_id: Uuid, text: &str) -> Result<Attachment> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyText);
        }
        self.require_space(space_id).await?;
        self.storage.ensure_directory().await?;

        let language = self.gate.admit(trimmed)?;

        let stored_file_name = AttachmentStorage::stored_name_for(StoredNameKind::Pasted);
        self.storage
            .write_atomic(&stored_file_name, trimmed.as_bytes())
            .await?;

        let inserted = self
            .attachments
            .insert(NewAttachment {
                space_id,
                original_file_name: PASTED_ORIGINAL_NAME.to_string(),
                stored_file_name: stored_file_name.clone(),
                language_code: Some(language),
            })
            .await;

        match inserted {
            Ok(attachment) => {
                info!(
                    subsystem = "ingest",
                    component = "importer",
                    op = "import_pasted_text",
                    space_id = %space_id,
                    attachment_id = %attachment.id,
                    stored_file_name = %attachment.stored_file_name,
                    "Pasted text saved"
                );
                Ok(attachment)
            }
            Err(e) => {
                self.discard(&stored_file_name).await;
                Err(e)
            }
        }
    }

    /// Save a paste buffer, clearing it only when the save succeeds.
    pub async fn save_pasted_buffer(
        &self,
        space_id: Uuid,
        buffer: &mut String,
    ) -> Result<Attachment> {
        let attachment = self.import_pasted_text(space_id, buffer).await?;
        buffer.clear();
        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(outcome: Result<Attachment>) -> ItemReport {
        ItemReport {
            source: PathBuf::from("/tmp/x.txt"),
            original_file_name: "x.txt".to_string(),
            outcome,
        }
    }

    fn attachment() -> Attachment {
        NewAttachment {
            space_id: Uuid::now_v7(),
            original_file_name: "x.txt".to_string(),
            stored_file_name: "A-x.txt".to_string(),
            language_code: Some("en".to_string()),
        }
        .into_attachment()
    }

    #[test]
    fn test_report_partitions_outcomes() {
        let report = ImportReport {
            items: vec![
                item(Ok(attachment())),
                item(Err(Error::LanguageUnsupported(Some("es".to_string())))),
                item(Err(Error::Copy("disk full".to_string()))),
                item(Err(Error::UnsupportedContainer("x.bin".to_string()))),
            ],
        };

        assert_eq!(report.admitted().len(), 1);
        assert_eq!(report.rejected().len(), 2);
        assert_eq!(report.failed().len(), 1);
        assert!(!report.all_admitted());
    }

    #[test]
    fn test_first_error_message_uses_user_text() {
        let report = ImportReport {
            items: vec![
                item(Ok(attachment())),
                item(Err(Error::ExtractionFailed("scan.pdf".to_string()))),
                item(Err(Error::Copy("disk full".to_string()))),
            ],
        };
        assert_eq!(
            report.first_error_message().as_deref(),
            Some(smartspace_core::error::LANGUAGE_UNSUPPORTED_MESSAGE)
        );
    }

    #[test]
    fn test_clean_report_has_no_message() {
        let report = ImportReport {
            items: vec![item(Ok(attachment()))],
        };
        assert!(report.first_error_message().is_none());
        assert!(report.all_admitted());
    }
}
