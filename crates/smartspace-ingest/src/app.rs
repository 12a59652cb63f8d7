//! Wiring of the pipeline components over one object store.

use std::sync::Arc;

use uuid::Uuid;

use smartspace_core::{
    Attachment, AttachmentRepository, LanguageIdentifier, PdfReader, Result, SpaceRepository,
    WordDocumentReader,
};
use smartspace_db::AttachmentStorage;

use crate::adapters::{OfficeConvertAdapter, PdfTextAdapter};
use crate::config::IngestConfig;
use crate::importer::Importer;
use crate::language::{LanguageGate, WhatlangIdentifier};
use crate::lifecycle::AttachmentLifecycle;
use crate::sampler::TextSampler;
use crate::spaces::SpaceService;

/// Document readers and language identifier used by the pipeline.
pub struct Collaborators {
    pub pdf: Arc<dyn PdfReader>,
    pub word: Arc<dyn WordDocumentReader>,
    pub identifier: Arc<dyn LanguageIdentifier>,
}

impl Collaborators {
    /// poppler-utils, pandoc, and whatlang.
    pub fn system(config: &IngestConfig) -> Self {
        Self {
            pdf: Arc::new(PdfTextAdapter::new(config.cmd_timeout_secs)),
            word: Arc::new(OfficeConvertAdapter::new(config.cmd_timeout_secs)),
            identifier: Arc::new(WhatlangIdentifier),
        }
    }
}

/// Spaces, imports, and deletions over shared repositories and storage.
pub struct SmartSpace {
    pub spaces: SpaceService,
    pub importer: Importer,
    pub lifecycle: Arc<AttachmentLifecycle>,
    attachments: Arc<dyn AttachmentRepository>,
    storage: AttachmentStorage,
}

impl SmartSpace {
    pub fn new(
        config: &IngestConfig,
        spaces: Arc<dyn SpaceRepository>,
        attachments: Arc<dyn AttachmentRepository>,
    ) -> Self {
        Self::with_collaborators(config, spaces, attachments, Collaborators::system(config))
    }

    pub fn with_collaborators(
        config: &IngestConfig,
        spaces: Arc<dyn SpaceRepository>,
        attachments: Arc<dyn AttachmentRepository>,
        collaborators: Collaborators,
    ) -> Self {
        let storage = config.storage();
        let lifecycle = Arc::new(AttachmentLifecycle::new(
            spaces.clone(),
            attachments.clone(),
            storage.clone(),
        ));
        let sampler = TextSampler::new(config, collaborators.pdf, collaborators.word);
        let gate = LanguageGate::new(collaborators.identifier, config.supported_language.clone());
        let importer = Importer::new(config, spaces.clone(), attachments.clone(), sampler, gate);

        Self {
            spaces: SpaceService::new(spaces, lifecycle.clone()),
            importer,
            lifecycle,
            attachments,
            storage,
        }
    }

    /// A space's attachments, newest first.
    pub async fn attachments(&self, space_id: Uuid) -> Result<Vec<Attachment>> {
        self.spaces.get(space_id).await?;
        self.attachments.list_for_space(space_id).await
    }

    pub fn storage(&self) -> &AttachmentStorage {
        &self.storage
    }
}
