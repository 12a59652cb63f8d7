//! In-process object store.
//!
//! Implements both repository traits over a single lock so the
//! space → attachment ownership and cascade rules hold exactly as in the
//! PostgreSQL schema. Used by tests and by embedders without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use smartspace_core::{
    Attachment, AttachmentRepository, CreateSpaceRequest, Error, NewAttachment, Result, Space,
    SpaceBlock, SpaceRepository,
};

#[derive(Default)]
struct Inner {
    spaces: HashMap<Uuid, Space>,
    blocks: Vec<SpaceBlock>,
    attachments: HashMap<Uuid, Attachment>,
}

/// In-memory implementation of [`SpaceRepository`] and [`AttachmentRepository`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of attachment records across all spaces.
    pub async fn attachment_count(&self) -> usize {
        self.inner.read().await.attachments.len()
    }
}

#[async_trait]
impl SpaceRepository for MemoryStore {
    async fn create(&self, req: CreateSpaceRequest) -> Result<Space> {
        let space = Space {
            id: Uuid::now_v7(),
            name: req.name,
            space_type: req.space_type,
            mode: req.mode,
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .spaces
            .insert(space.id, space.clone());
        Ok(space)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Space>> {
        Ok(self.inner.read().await.spaces.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Space>> {
        let mut spaces: Vec<Space> = self.inner.read().await.spaces.values().cloned().collect();
        spaces.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(spaces)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.spaces.remove(&id).is_none() {
            return Err(Error::SpaceNotFound(id));
        }
        inner.blocks.retain(|b| b.space_id != id);
        inner.attachments.retain(|_, a| a.space_id != id);
        Ok(())
    }

    async fn add_block(
        &self,
        space_id: Uuid,
        title: &str,
        kind: &str,
        details: &str,
    ) -> Result<SpaceBlock> {
        let mut inner = self.inner.write().await;
        if !inner.spaces.contains_key(&space_id) {
            return Err(Error::SpaceNotFound(space_id));
        }
        let block = SpaceBlock {
            id: Uuid::now_v7(),
            space_id,
            title: title.to_string(),
            kind: kind.to_string(),
            details: details.to_string(),
            created_at: Utc::now(),
        };
        inner.blocks.push(block.clone());
        Ok(block)
    }

    async fn list_blocks(&self, space_id: Uuid) -> Result<Vec<SpaceBlock>> {
        Ok(self
            .inner
            .read()
            .await
            .blocks
            .iter()
            .filter(|b| b.space_id == space_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttachmentRepository for MemoryStore {
    async fn insert(&self, new: NewAttachment) -> Result<Attachment> {
        let mut inner = self.inner.write().await;
        if !inner.spaces.contains_key(&new.space_id) {
            return Err(Error::SpaceNotFound(new.space_id));
        }
        if inner
            .attachments
            .values()
            .any(|a| a.stored_file_name == new.stored_file_name)
        {
            return Err(Error::InvalidInput(format!(
                "stored file name already in use: {}",
                new.stored_file_name
            )));
        }
        let attachment = new.into_attachment();
        inner.attachments.insert(attachment.id, attachment.clone());
        Ok(attachment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Attachment>> {
        Ok(self.inner.read().await.attachments.get(&id).cloned())
    }

    async fn list_for_space(&self, space_id: Uuid) -> Result<Vec<Attachment>> {
        let mut attachments: Vec<Attachment> = self
            .inner
            .read()
            .await
            .attachments
            .values()
            .filter(|a| a.space_id == space_id)
            .cloned()
            .collect();
        attachments.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(b.id.cmp(&a.id)));
        Ok(attachments)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.inner.write().await.attachments.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartspace_core::{SpaceMode, SpaceType};

    fn space_request(name: &str) -> CreateSpaceRequest {
        CreateSpaceRequest {
            name: name.to_string(),
            space_type: SpaceType::Learning,
            mode: SpaceMode::OnDevice,
        }
    }

    fn new_attachment(space_id: Uuid, stored: &str) -> NewAttachment {
        NewAttachment {
            space_id,
            original_file_name: "notes.txt".to_string(),
            stored_file_name: stored.to_string(),
            language_code: Some("en".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_requires_owning_space() {
        let store = MemoryStore::new();
        let orphan = Uuid::now_v7();
        let err = AttachmentRepository::insert(&store, new_attachment(orphan, "A-notes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SpaceNotFound(id) if id == orphan));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_stored_name() {
        let store = MemoryStore::new();
        let space = SpaceRepository::create(&store, space_request("Biology")).await.unwrap();

        store.insert(new_attachment(space.id, "A-notes.txt")).await.unwrap();
        let err = store
            .insert(new_attachment(space.id, "A-notes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_space_cascades_to_attachments_and_blocks() {
        let store = MemoryStore::new();
        let space = SpaceRepository::create(&store, space_request("Biology")).await.unwrap();
        let other = SpaceRepository::create(&store, space_request("History")).await.unwrap();

        store.insert(new_attachment(space.id, "A-1.txt")).await.unwrap();
        store.insert(new_attachment(space.id, "A-2.txt")).await.unwrap();
        store.insert(new_attachment(other.id, "B-1.txt")).await.unwrap();
        store.add_block(space.id, "Cells", "note", "").await.unwrap();

        SpaceRepository::delete(&store, space.id).await.unwrap();

        assert!(store.list_for_space(space.id).await.unwrap().is_empty());
        assert!(store.list_blocks(space.id).await.unwrap().is_empty());
        assert_eq!(store.attachment_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_space() {
        let store = MemoryStore::new();
        let err = SpaceRepository::delete(&store, Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SpaceNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_spaces_newest_first() {
        let store = MemoryStore::new();
        let first = SpaceRepository::create(&store, space_request("First")).await.unwrap();
        let second = SpaceRepository::create(&store, space_request("Second")).await.unwrap();

        let spaces = SpaceRepository::list(&store).await.unwrap();
        assert_eq!(spaces.len(), 2);
        assert_eq!(spaces[0].id, second.id);
        assert_eq!(spaces[1].id, first.id);
    }

    #[tokio::test]
    async fn test_delete_attachment_missing_is_ok() {
        let store = MemoryStore::new();
        AttachmentRepository::delete(&store, Uuid::now_v7())
            .await
            .unwrap();
    }
}
