//! On-disk attachment directory: stored-file naming, paths, and removal.
//!
//! All attachments live flat in one directory, keyed by their stored file
//! name. Stored names are a fresh random UUID followed by either the
//! source file's last path component or a fixed pasted-text suffix, so two
//! imports never map to the same path in practice.
//!
//! The directory carries a `CACHEDIR.TAG` marker so backup tools skip it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use smartspace_db::{AttachmentStorage, StoredNameKind};
//!
//! let storage = AttachmentStorage::under_data_root("/home/me/.local/share/smartspace");
//! storage.ensure_directory().await?;
//!
//! let stored = AttachmentStorage::stored_name_for(StoredNameKind::Imported("report.pdf"));
//! storage.copy_from(source_path, &stored).await?;
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use smartspace_core::defaults::{
    ATTACHMENTS_DIR_NAME, BACKUP_EXCLUSION_MARKER, BACKUP_EXCLUSION_MARKER_CONTENTS, PASTED_SUFFIX,
};
use smartspace_core::{sanitize_filename, Error, Result};

/// What a stored name is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredNameKind<'a> {
    /// A file import; carries the original file name or path.
    Imported(&'a str),
    /// Pasted text.
    Pasted,
}

/// The attachment directory and the operations on files inside it.
#[derive(Debug, Clone)]
pub struct AttachmentStorage {
    base_path: PathBuf,
}

impl AttachmentStorage {
    /// Use `directory` as the attachment directory itself.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            base_path: directory.into(),
        }
    }

    /// Use `<data_root>/Attachments` as the attachment directory.
    pub fn under_data_root(data_root: impl AsRef<Path>) -> Self {
        Self::new(data_root.as_ref().join(ATTACHMENTS_DIR_NAME))
    }

    /// The attachment directory.
    pub fn directory(&self) -> &Path {
        &self.base_path
    }

    /// Create the directory if absent and mark it excluded from backups.
    ///
    /// Idempotent. Any failure is reported as [`Error::Directory`].
    pub async fn ensure_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            warn!(
                subsystem = "storage",
                component = "attachment_storage",
                op = "ensure_directory",
                directory = %self.base_path.display(),
                error = %e,
                "create_dir_all failed"
            );
            Error::Directory(format!("create {}: {}", self.base_path.display(), e))
        })?;

        let marker = self.base_path.join(BACKUP_EXCLUSION_MARKER);
        let marker_present = fs::try_exists(&marker).await.map_err(|e| {
            Error::Directory(format!("stat {}: {}", marker.display(), e))
        })?;
        if !marker_present {
            fs::write(&marker, BACKUP_EXCLUSION_MARKER_CONTENTS)
                .await
                .map_err(|e| {
                    Error::Directory(format!(
                        "exclude {} from backup: {}",
                        self.base_path.display(),
                        e
                    ))
                })?;
            debug!(
                subsystem = "storage",
                component = "attachment_storage",
                directory = %self.base_path.display(),
                "Attachment directory marked as excluded from backup"
            );
        }

        Ok(())
    }

    /// Generate a collision-resistant stored name.
    ///
    /// `Imported("docs/Report.pdf")` → `"<uuid>-Report.pdf"`,
    /// `Pasted` → `"<uuid>-pasted.txt"`.
    pub fn stored_name_for(kind: StoredNameKind<'_>) -> String {
        let id = Uuid::new_v4().as_hyphenated().to_string().to_uppercase();
        match kind {
            StoredNameKind::Imported(original) => {
                format!("{}-{}", id, sanitize_filename(original))
            }
            StoredNameKind::Pasted => format!("{}{}", id, PASTED_SUFFIX),
        }
    }

    /// Path of a stored file. Pure mapping, no I/O.
    pub fn path_for(&self, stored_file_name: &str) -> PathBuf {
        self.base_path.join(stored_file_name)
    }

    /// Delete a stored file. Already-absent files are not an error.
    pub async fn remove(&self, stored_file_name: &str) -> Result<()> {
        let path = self.path_for(stored_file_name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(
                    subsystem = "storage",
                    component = "attachment_storage",
                    stored_file_name,
                    "Stored file removed"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Check whether a stored file is present on disk.
    pub async fn exists(&self, stored_file_name: &str) -> Result<bool> {
        Ok(fs::try_exists(self.path_for(stored_file_name)).await?)
    }

    /// Read a stored file's bytes.
    pub async fn read(&self, stored_file_name: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.path_for(stored_file_name)).await?)
    }

    /// Copy `source` into the directory under `stored_file_name`.
    ///
    /// An existing file at the destination is removed first. On failure no
    /// partial destination is left behind. Errors map to [`Error::Copy`].
    pub async fn copy_from(&self, source: &Path, stored_file_name: &str) -> Result<u64> {
        let destination = self.path_for(stored_file_name);

        if fs::try_exists(&destination).await.unwrap_or(false) {
            warn!(
                subsystem = "storage",
                component = "attachment_storage",
                stored_file_name,
                "Destination already exists, replacing"
            );
            fs::remove_file(&destination).await.map_err(|e| {
                Error::Copy(format!("replace {}: {}", destination.display(), e))
            })?;
        }

        match fs::copy(source, &destination).await {
            Ok(bytes) => {
                debug!(
                    subsystem = "storage",
                    component = "attachment_storage",
                    stored_file_name,
                    size = bytes,
                    "Source copied into attachment directory"
                );
                Ok(bytes)
            }
            Err(e) => {
                let _ = fs::remove_file(&destination).await;
                Err(Error::Copy(format!("{}: {}", source.display(), e)))
            }
        }
    }

    /// Write `data` under `stored_file_name` atomically (temp file + rename).
    pub async fn write_atomic(&self, stored_file_name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.path_for(stored_file_name);
        let temp_path = self.path_for(&format!(".{}.tmp", stored_file_name));

        let result = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            // rw-r--r--, no execute
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o644)).await?;
            }
            fs::rename(&temp_path, &full_path).await
        }
        .await;

        if let Err(e) = result {
            warn!(
                subsystem = "storage",
                component = "attachment_storage",
                stored_file_name,
                error = %e,
                "Atomic write failed"
            );
            let _ = fs::remove_file(&temp_path).await;
            return Err(Error::Io(e));
        }

        Ok(())
    }
}
