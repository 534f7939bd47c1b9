//! Symlink operations (create, read, inspect).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink as unix_symlink;
            unix_symlink(original, link).context("Failed to create symlink")?;
        }
        #[cfg(windows)]
        {
            use std::os::windows::fs::{symlink_dir, symlink_file};

            // `is_dir()` on a relative path is relative to CWD; we want it relative to the link's parent.
            let target_path = if original.is_absolute() {
                original.to_path_buf()
            } else {
                link.parent()
                    .context("Failed to get parent directory for symlink")?
                    .join(original)
            };

            if target_path.is_dir() {
                symlink_dir(original, link).context("Failed to create directory symlink")?;
            } else {
                symlink_file(original, link).context("Failed to create file symlink")?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_link_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).context("Failed to read symlink")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_symlink_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        runtime.create_dir_all(&target).unwrap();

        let link = dir.path().join("link");
        runtime.symlink(&target, &link).unwrap();
        assert!(runtime.is_symlink(&link));
        assert!(!runtime.is_symlink(&target));

        let read_target = runtime.read_link(&link).unwrap();
        assert_eq!(read_target, target);
    }

    #[test]
    fn test_real_runtime_relative_symlink_resolves_from_link_parent() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let target = dir.path().join("src/lib");
        runtime.create_dir_all(&target).unwrap();
        runtime.write(&target.join("mod.txt"), b"content").unwrap();

        let link = dir.path().join("lib");
        runtime.symlink(&PathBuf::from("src/lib"), &link).unwrap();

        assert!(runtime.is_symlink(&link));
        assert!(runtime.is_dir(&link));
        assert_eq!(
            runtime.read_to_string(&link.join("mod.txt")).unwrap(),
            "content"
        );
    }

    #[test]
    fn test_is_symlink_missing_path() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        assert!(!runtime.is_symlink(&dir.path().join("missing")));
    }
}
