//! Attachment and space deletion.
//!
//! Files go first, records second. A file that cannot be removed is
//! reported in the [`DeletionReport`] but never keeps its record alive.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use smartspace_core::{Attachment, AttachmentRepository, Error, Result, SpaceRepository};
use smartspace_db::AttachmentStorage;

/// A step of a deletion that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionIssue {
    pub attachment_id: Uuid,
    pub stored_file_name: String,
    pub message: String,
}

/// What a deletion removed and what it could not.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub records_removed: usize,
    /// Backing files that could not be removed. Their records are gone.
    pub file_errors: Vec<DeletionIssue>,
    /// Records the store refused to delete.
    pub record_errors: Vec<DeletionIssue>,
}

impl DeletionReport {
    pub fn is_clean(&self) -> bool {
        self.file_errors.is_empty() && self.record_errors.is_empty()
    }

    fn merge(&mut self, other: DeletionReport) {
        self.records_removed += other.records_removed;
        self.file_errors.extend(other.file_errors);
        self.record_errors.extend(other.record_errors);
    }
}

fn issue(attachment: &Attachment, err: &Error) -> DeletionIssue {
    DeletionIssue {
        attachment_id: attachment.id,
        stored_file_name: attachment.stored_file_name.clone(),
        message: err.to_string(),
    }
}

/// Removes attachments and spaces together with their stored files.
pub struct AttachmentLifecycle {
    spaces: Arc<dyn SpaceRepository>,
    attachments: Arc<dyn AttachmentRepository>,
    storage: AttachmentStorage,
}

impl AttachmentLifecycle {
    pub fn new(
        spaces: Arc<dyn SpaceRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        storage: AttachmentStorage,
    ) -> Self {
        Self {
            spaces,
            attachments,
            storage,
        }
    }

    /// Best-effort file removal; absent files count as removed.
    async fn remove_file(&self, attachment: &Attachment) -> Option<DeletionIssue> {
        match self.storage.remove(&attachment.stored_file_name).await {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    subsystem = "lifecycle",
                    component = "attachments",
                    op = "remove_file",
                    attachment_id = %attachment.id,
                    stored_file_name = %attachment.stored_file_name,
                    error = %e,
                    "Failed to remove stored file"
                );
                Some(issue(attachment, &e))
            }
        }
    }

    /// Delete one attachment: its file (best effort), then its record.
    ///
    /// Only a record deletion failure is an error.
    pub async fn delete_one(&self, attachment: &Attachment) -> Result<DeletionReport> {
        let mut report = DeletionReport::default();
        if let Some(file_issue) = self.remove_file(attachment).await {
            report.file_errors.push(file_issue);
        }

        self.attachments.delete(attachment.id).await?;
        report.records_removed = 1;

        info!(
            subsystem = "lifecycle",
            component = "attachments",
            op = "delete",
            attachment_id = %attachment.id,
            space_id = %attachment.space_id,
            "Attachment deleted"
        );
        Ok(report)
    }

    /// Delete by identifier.
    pub async fn delete_by_id(&self, attachment_id: Uuid) -> Result<DeletionReport> {
        let attachment = self
            .attachments
            .get(attachment_id)
            .await?
            .ok_or(Error::AttachmentNotFound(attachment_id))?;
        self.delete_one(&attachment).await
    }

    /// Delete each attachment independently.
    pub async fn delete_many(&self, attachments: &[Attachment]) -> DeletionReport {
        let mut report = DeletionReport::default();
        for attachment in attachments {
            match self.delete_one(attachment).await {
                Ok(one) => report.merge(one),
                Err(e) => {
                    warn!(
                        subsystem = "lifecycle",
                        component = "attachments",
                        op = "delete",
                        attachment_id = %attachment.id,
                        error = %e,
                        "Failed to delete attachment record"
                    );
                    report.record_errors.push(issue(attachment, &e));
                }
            }
        }
        report
    }

    /// Resolve and delete each identifier independently.
    ///
    /// Unknown identifiers and failed lookups land in `record_errors`;
    /// the remaining attachments are still deleted.
    pub async fn delete_many_by_id(&self, attachment_ids: &[Uuid]) -> DeletionReport {
        let mut report = DeletionReport::default();
        let mut found = Vec::with_capacity(attachment_ids.len());
        for &id in attachment_ids {
            let lookup = match self.attachments.get(id).await {
                Ok(Some(attachment)) => {
                    found.push(attachment);
                    continue;
                }
                Ok(None) => Error::AttachmentNotFound(id),
                Err(e) => e,
            };
            warn!(
                subsystem = "lifecycle",
                component = "attachments",
                op = "resolve",
                attachment_id = %id,
                error = %lookup,
                "Could not resolve attachment for deletion"
            );
            report.record_errors.push(DeletionIssue {
                attachment_id: id,
                stored_file_name: String::new(),
                message: lookup.to_string(),
            });
        }
        report.merge(self.delete_many(&found).await);
        report
    }

    /// Delete a space, every stored file it owns, and (by cascade) every
    /// attachment record and block.
    pub async fn delete_space(&self, space_id: Uuid) -> Result<DeletionReport> {
        if self.spaces.get(space_id).await?.is_none() {
            return Err(Error::SpaceNotFound(space_id));
        }
        let owned = self.attachments.list_for_space(space_id).await?;

        let mut report = DeletionReport::default();
        for attachment in &owned {
            if let Some(file_issue) = self.remove_file(attachment).await {
                report.file_errors.push(file_issue);
            }
        }

        self.spaces.delete(space_id).await?;
        report.records_removed = owned.len();

        info!(
            subsystem = "lifecycle",
            component = "spaces",
            op = "delete",
            space_id = %space_id,
            attachments = owned.len(),
            file_errors = report.file_errors.len(),
            "Space deleted"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartspace_core::{CreateSpaceRequest, NewAttachment};
    use smartspace_db::{MemoryStore, StoredNameKind};

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<MemoryStore>,
        storage: AttachmentStorage,
        lifecycle: AttachmentLifecycle,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = AttachmentStorage::under_data_root(dir.path());
        storage.ensure_directory().await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let lifecycle = AttachmentLifecycle::new(store.clone(), store.clone(), storage.clone());
        Fixture {
            _dir: dir,
            store,
            storage,
            lifecycle,
        }
    }

    async fn space(f: &Fixture) -> Uuid {
        SpaceRepository::create(
            f.store.as_ref(),
            CreateSpaceRequest {
                name: "Biology".to_string(),
                space_type: Default::default(),
                mode: Default::default(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn stored_attachment(f: &Fixture, space_id: Uuid, write_file: bool) -> Attachment {
        let stored = AttachmentStorage::stored_name_for(StoredNameKind::Imported("notes.txt"));
        if write_file {
            f.storage.write_atomic(&stored, b"hello").await.unwrap();
        }
        f.store
            .insert(NewAttachment {
                space_id,
                original_file_name: "notes.txt".to_string(),
                stored_file_name: stored,
                language_code: Some("en".to_string()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_delete_one_removes_file_and_record() {
        let f = fixture().await;
        let space_id = space(&f).await;
        let a = stored_attachment(&f, space_id, true).await;

        let report = f.lifecycle.delete_one(&a).await.unwrap();

        assert!(report.is_clean());
        assert!(!f.storage.exists(&a.stored_file_name).await.unwrap());
        assert!(AttachmentRepository::get(f.store.as_ref(), a.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_one_tolerates_missing_file() {
        let f = fixture().await;
        let space_id = space(&f).await;
        let a = stored_attachment(&f, space_id, false).await;

        let report = f.lifecycle.delete_one(&a).await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.records_removed, 1);
    }

    #[tokio::test]
    async fn test_unremovable_file_still_drops_record() {
        let f = fixture().await;
        let space_id = space(&f).await;
        let a = stored_attachment(&f, space_id, false).await;
        // A non-empty directory at the file's path cannot be removed as a file.
        let blocker = f.storage.path_for(&a.stored_file_name);
        std::fs::create_dir_all(blocker.join("inner")).unwrap();

        let report = f.lifecycle.delete_one(&a).await.unwrap();

        assert_eq!(report.file_errors.len(), 1);
        assert_eq!(report.file_errors[0].attachment_id, a.id);
        assert!(AttachmentRepository::get(f.store.as_ref(), a.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_many_is_independent() {
        let f = fixture().await;
        let space_id = space(&f).await;
        let a = stored_attachment(&f, space_id, true).await;
        let b = stored_attachment(&f, space_id, false).await;
        let c = stored_attachment(&f, space_id, true).await;

        let report = f.lifecycle.delete_many(&[a, b, c]).await;

        assert_eq!(report.records_removed, 3);
        assert!(report.is_clean());
        assert_eq!(f.store.attachment_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_many_by_id_continues_past_unknown() {
        let f = fixture().await;
        let space_id = space(&f).await;
        let a = stored_attachment(&f, space_id, true).await;
        let b = stored_attachment(&f, space_id, true).await;
        let unknown = Uuid::now_v7();

        let report = f.lifecycle.delete_many_by_id(&[unknown, a.id, b.id]).await;

        assert_eq!(report.records_removed, 2);
        assert_eq!(report.record_errors.len(), 1);
        assert_eq!(report.record_errors[0].attachment_id, unknown);
        assert!(report.file_errors.is_empty());
        assert_eq!(f.store.attachment_count().await, 0);
        assert!(!f.storage.exists(&a.stored_file_name).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_id_unknown() {
        let f = fixture().await;
        let err = f.lifecycle.delete_by_id(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, Error::AttachmentNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_space_with_missing_file() {
        let f = fixture().await;
        let space_id = space(&f).await;
        let kept = stored_attachment(&f, space_id, true).await;
        stored_attachment(&f, space_id, true).await;
        stored_attachment(&f, space_id, false).await;

        let report = f.lifecycle.delete_space(space_id).await.unwrap();

        assert_eq!(report.records_removed, 3);
        assert!(report.file_errors.is_empty());
        assert_eq!(f.store.attachment_count().await, 0);
        assert!(!f.storage.exists(&kept.stored_file_name).await.unwrap());
        assert!(SpaceRepository::get(f.store.as_ref(), space_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_space() {
        let f = fixture().await;
        let err = f.lifecycle.delete_space(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, Error::SpaceNotFound(_)));
    }
}
