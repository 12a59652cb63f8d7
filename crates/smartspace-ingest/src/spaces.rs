//! Space creation, validation, and listing.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use smartspace_core::defaults::SPACE_NAME_LIMIT;
use smartspace_core::text::truncate_chars;
use smartspace_core::{
    names_equivalent, CreateSpaceRequest, Error, Result, Space, SpaceBlock, SpaceMode,
    SpaceRepository, SpaceType,
};

use crate::lifecycle::{AttachmentLifecycle, DeletionReport};

/// Trim and bound a space name. Empty names are rejected.
pub fn normalize_space_name(name: &str) -> Result<String> {
    let trimmed = truncate_chars(name.trim(), SPACE_NAME_LIMIT).trim_end();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Space name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

pub struct SpaceService {
    spaces: Arc<dyn SpaceRepository>,
    lifecycle: Arc<AttachmentLifecycle>,
}

impl SpaceService {
    pub fn new(spaces: Arc<dyn SpaceRepository>, lifecycle: Arc<AttachmentLifecycle>) -> Self {
        Self { spaces, lifecycle }
    }

    /// Whether a live space already uses this name, ignoring case and diacritics.
    pub async fn is_duplicate_name(&self, name: &str) -> Result<bool> {
        let Ok(candidate) = normalize_space_name(name) else {
            return Ok(false);
        };
        Ok(self
            .spaces
            .list()
            .await?
            .iter()
            .any(|s| names_equivalent(&s.name, &candidate)))
    }

    pub async fn create(&self, name: &str, space_type: SpaceType, mode: SpaceMode) -> Result<Space> {
        let name = normalize_space_name(name)?;
        if self.is_duplicate_name(&name).await? {
            return Err(Error::DuplicateSpaceName(name));
        }

        let space = self
            .spaces
            .create(CreateSpaceRequest {
                name,
                space_type,
                mode,
            })
            .await?;

        info!(
            subsystem = "spaces",
            component = "service",
            op = "create",
            space_id = %space.id,
            space_type = space.space_type.as_str(),
            mode = space.mode.as_str(),
            "Space created"
        );
        Ok(space)
    }

    /// Live spaces, newest first.
    pub async fn list(&self) -> Result<Vec<Space>> {
        self.spaces.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Space> {
        self.spaces.get(id).await?.ok_or(Error::SpaceNotFound(id))
    }

    /// Delete a space with all its stored files and records.
    pub async fn delete(&self, id: Uuid) -> Result<DeletionReport> {
        self.lifecycle.delete_space(id).await
    }

    pub async fn add_block(
        &self,
        space_id: Uuid,
        title: &str,
        kind: &str,
        details: &str,
    ) -> Result<SpaceBlock> {
        self.spaces.add_block(space_id, title, kind, details).await
    }

    pub async fn blocks(&self, space_id: Uuid) -> Result<Vec<SpaceBlock>> {
        self.spaces.list_blocks(space_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartspace_db::{AttachmentStorage, MemoryStore};

    fn service() -> (tempfile::TempDir, SpaceService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let lifecycle = Arc::new(AttachmentLifecycle::new(
            store.clone(),
            store.clone(),
            AttachmentStorage::under_data_root(dir.path()),
        ));
        (dir, SpaceService::new(store, lifecycle))
    }

    #[test]
    fn test_normalize_space_name() {
        assert_eq!(normalize_space_name("  Biology  ").unwrap(), "Biology");
        assert!(matches!(
            normalize_space_name("   "),
            Err(Error::InvalidInput(_))
        ));
        let long = normalize_space_name("Abcdefghijklmnopqrstuvwxyz").unwrap();
        assert_eq!(long, "Abcdefghijklmnopqrstuvwx");
        // Cut lands after a space, which is then trimmed.
        assert_eq!(
            normalize_space_name("An extremely long space name").unwrap(),
            "An extremely long space"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_equivalent_names() {
        let (_dir, service) = service();
        service
            .create("Café Notes", SpaceType::Learning, SpaceMode::OnDevice)
            .await
            .unwrap();

        let err = service
            .create("  cafe NOTES ", SpaceType::Work, SpaceMode::OnDevice)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSpaceName(_)));
        assert!(service.is_duplicate_name("CAFÉ notes").await.unwrap());
        assert!(!service.is_duplicate_name("Café").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_get() {
        let (_dir, service) = service();
        let first = service
            .create("First", SpaceType::default(), SpaceMode::default())
            .await
            .unwrap();
        let second = service
            .create("Second", SpaceType::Personal, SpaceMode::PrivateCloudCompute)
            .await
            .unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert_eq!(service.get(first.id).await.unwrap().name, "First");
        assert!(matches!(
            service.get(Uuid::now_v7()).await.unwrap_err(),
            Error::SpaceNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_blocks_and_delete() {
        let (_dir, service) = service();
        let space = service
            .create("Physics", SpaceType::Learning, SpaceMode::OnDevice)
            .await
            .unwrap();
        service
            .add_block(space.id, "Kinematics", "note", "Chapter 2")
            .await
            .unwrap();
        assert_eq!(service.blocks(space.id).await.unwrap().len(), 1);

        let report = service.delete(space.id).await.unwrap();
        assert!(report.is_clean());
        assert!(service.list().await.unwrap().is_empty());
        assert!(service.blocks(space.id).await.unwrap().is_empty());
    }
}
