use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// RAII guard that removes a partially created directory unless the
/// operation that created it is marked successful.
pub struct CleanupGuard<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    armed: bool,
}

impl<'a, R: Runtime> CleanupGuard<'a, R> {
    /// Register `path` for removal on drop.
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self {
            runtime,
            path,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mark the operation as successful, keeping the path.
    pub fn success(mut self) {
        self.armed = false;
    }
}

impl<R: Runtime> Drop for CleanupGuard<'_, R> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!("Cleaning up: {:?}", self.path);
        if self.runtime.exists(&self.path)
            && let Err(e) = self.runtime.remove_dir_all(&self.path)
        {
            warn!("Failed to clean up {:?}: {}", self.path, e);
        }
    }
}
