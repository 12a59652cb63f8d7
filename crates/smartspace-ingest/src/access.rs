//! Scoped read access to caller-supplied files.
//!
//! Some hosts grant temporary permission to read a file chosen by the
//! user. [`AccessGuard`] pairs the grant with its release so every exit
//! path of an item's pipeline run gives the permission back.

use std::path::{Path, PathBuf};

use tracing::trace;

/// Host hook for acquiring and releasing read permission on a path.
pub trait ScopedAccess: Send + Sync {
    /// Request access. Returns `true` when a grant was taken and must be released.
    fn start(&self, path: &Path) -> bool;

    /// Release a grant taken by [`ScopedAccess::start`].
    fn stop(&self, path: &Path);
}

/// For hosts where files are readable without a grant.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAccess;

impl ScopedAccess for NoopAccess {
    fn start(&self, _path: &Path) -> bool {
        false
    }

    fn stop(&self, _path: &Path) {}
}

/// Holds a grant for the lifetime of the guard.
pub struct AccessGuard<'a> {
    access: &'a dyn ScopedAccess,
    path: PathBuf,
    granted: bool,
}

impl<'a> AccessGuard<'a> {
    pub fn acquire(access: &'a dyn ScopedAccess, path: &Path) -> Self {
        let granted = access.start(path);
        trace!(path = %path.display(), granted, "Scoped access acquired");
        Self {
            access,
            path: path.to_path_buf(),
            granted,
        }
    }

    pub fn granted(&self) -> bool {
        self.granted
    }
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        if self.granted {
            self.access.stop(&self.path);
            trace!(path = %self.path.display(), "Scoped access released");
        }
    }
}
