//! On-disk layout of installed packages.
//!
//! ```text
//! <install_root>/package_list.txt
//! <install_root>/<name>/<version>/            fetched tree
//! <install_root>/<name>/<version>/<folder>    link to package_src_dir
//! <install_root>/<name>/<version>/.pkg_info/<version>.toml
//! ```

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::descriptor::VersionDescriptor;
use crate::error::BpmError;
use crate::runtime::path::normalize_path;
use crate::runtime::{Runtime, is_path_under};

pub const INFO_DIR_NAME: &str = ".pkg_info";

/// Reject names that are not a single plain path component or that would
/// break the whitespace-separated ledger format.
pub fn validate_name(name: &str) -> Result<(), BpmError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_whitespace);
    if invalid {
        return Err(BpmError::UnsafePath(name.to_string()));
    }
    Ok(())
}

/// Resolve a descriptor-supplied relative path under `base`, refusing
/// absolute paths and anything that climbs out of `base`.
///
/// The result is lexically normalized.
pub fn resolve_under(base: &Path, relative: &str) -> Result<PathBuf, BpmError> {
    let candidate = Path::new(relative);
    if candidate.is_absolute() || candidate.has_root() {
        return Err(BpmError::UnsafePath(relative.to_string()));
    }
    let joined = base.join(candidate);
    if !is_path_under(&joined, base) {
        return Err(BpmError::UnsafePath(relative.to_string()));
    }
    Ok(normalize_path(&joined))
}

pub struct InstallLayout<'a, R: Runtime> {
    runtime: &'a R,
    install_root: PathBuf,
}

impl<'a, R: Runtime> InstallLayout<'a, R> {
    pub fn new(runtime: &'a R, install_root: PathBuf) -> Self {
        Self {
            runtime,
            install_root,
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Returns: `<install_root>/<name>`
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.install_root.join(name)
    }

    /// Returns: `<install_root>/<name>/<version>`
    pub fn version_dir(&self, name: &str, version: &str) -> PathBuf {
        self.package_dir(name).join(version)
    }

    /// Returns: `<install_root>/<name>/<version>/.pkg_info/<version>.toml`
    pub fn snapshot_path(&self, name: &str, version: &str) -> PathBuf {
        self.version_dir(name, version)
            .join(INFO_DIR_NAME)
            .join(format!("{}.toml", version))
    }

    /// Store the version config an install was performed with.
    #[tracing::instrument(skip(self, descriptor))]
    pub fn save_snapshot(
        &self,
        name: &str,
        version: &str,
        descriptor: &VersionDescriptor,
    ) -> Result<()> {
        let path = self.snapshot_path(name, version);
        if let Some(parent) = path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }
        self.runtime
            .write(&path, descriptor.raw().as_bytes())
            .with_context(|| format!("Failed to save install snapshot to {:?}", path))
    }

    /// Load the snapshot taken at install time.
    pub fn load_snapshot(&self, name: &str, version: &str) -> Result<VersionDescriptor> {
        let path = self.snapshot_path(name, version);
        let content = self
            .runtime
            .read_to_string(&path)
            .with_context(|| format!("Failed to read install snapshot {:?}", path))?;
        VersionDescriptor::parse(&content)
            .with_context(|| format!("Invalid install snapshot {:?}", path))
    }

    /// Remove a version directory. A missing directory is not an error.
    pub fn remove_version_dir(&self, name: &str, version: &str) -> Result<()> {
        let version_dir = self.version_dir(name, version);
        if self.runtime.exists(&version_dir) || self.runtime.is_symlink(&version_dir) {
            debug!("Removing {:?}", version_dir);
            self.runtime.remove_dir_all(&version_dir)?;
        } else {
            debug!("{:?} already absent", version_dir);
        }

        // Drop the package directory once its last version is gone
        let package_dir = self.package_dir(name);
        if self.runtime.is_dir(&package_dir)
            && let Ok(entries) = self.runtime.read_dir(&package_dir)
            && entries.is_empty()
            && let Err(e) = self.runtime.remove_dir_all(&package_dir)
        {
            warn!("Failed to remove empty package directory {:?}: {}", package_dir, e);
        }

        Ok(())
    }
}
