//! Read-only view over the cloned package index.
//!
//! Layout: `<index_root>/<first letter>/<name>/package.toml` plus one
//! `<version>.toml` per available version.

use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::descriptor::{PackageDescriptor, VersionDescriptor};
use super::layout::validate_name;
use crate::error::BpmError;
use crate::fetch::{Fetcher, InstallMethod};
use crate::runtime::Runtime;

pub const PACKAGE_CONFIG_FILE: &str = "package.toml";
const CONFIG_EXTENSION: &str = "toml";

/// Where a package lives inside the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    pub name: String,
    pub dir: PathBuf,
}

impl PackageLocation {
    pub fn package_config(&self) -> PathBuf {
        self.dir.join(PACKAGE_CONFIG_FILE)
    }

    pub fn version_config(&self, version: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", version, CONFIG_EXTENSION))
    }
}

pub struct PackageIndex<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> PackageIndex<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bucket directory for a package: lowercase first character of its name.
    fn bucket(&self, name: &str) -> Option<PathBuf> {
        let first = name.chars().next()?;
        Some(self.root.join(first.to_lowercase().to_string()))
    }

    #[tracing::instrument(skip(self))]
    pub fn locate(&self, name: &str) -> Result<PackageLocation> {
        let not_found = || BpmError::PackageNotFound(name.to_string());

        validate_name(name).map_err(|_| not_found())?;
        let bucket = self.bucket(name).ok_or_else(not_found)?;
        if !self.runtime.is_dir(&bucket) {
            debug!("Bucket {:?} missing", bucket);
            return Err(not_found().into());
        }

        let dir = bucket.join(name);
        if !self.runtime.is_dir(&dir) {
            debug!("Package directory {:?} missing", dir);
            return Err(not_found().into());
        }

        Ok(PackageLocation {
            name: name.to_string(),
            dir,
        })
    }

    /// Versions with a `<version>.toml` descriptor, sorted by name.
    pub fn list_versions(&self, location: &PackageLocation) -> Result<BTreeSet<String>> {
        let mut versions = BTreeSet::new();
        for entry in self.runtime.read_dir(&location.dir)? {
            let is_config = entry.extension().and_then(|e| e.to_str()) == Some(CONFIG_EXTENSION);
            if !is_config || !self.runtime.is_file(&entry) {
                continue;
            }
            if entry.file_name().and_then(|n| n.to_str()) == Some(PACKAGE_CONFIG_FILE) {
                continue;
            }
            if let Some(stem) = entry.file_stem().and_then(|s| s.to_str()) {
                versions.insert(stem.to_string());
            }
        }
        Ok(versions)
    }

    pub fn read_package_config(&self, location: &PackageLocation) -> Result<PackageDescriptor> {
        let path = location.package_config();
        let content = self
            .runtime
            .read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        PackageDescriptor::parse(&content).with_context(|| format!("Invalid {:?}", path))
    }

    pub fn read_version_config(
        &self,
        location: &PackageLocation,
        version: &str,
    ) -> Result<VersionDescriptor> {
        if !self.list_versions(location)?.contains(version) {
            return Err(BpmError::VersionNotFound {
                package: location.name.clone(),
                version: version.to_string(),
            }
            .into());
        }

        let path = location.version_config(version);
        let content = self
            .runtime
            .read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        VersionDescriptor::parse(&content).with_context(|| format!("Invalid {:?}", path))
    }

    /// Clear the index directory and fetch it again from `url`.
    ///
    /// Not atomic: a failed fetch leaves the index empty.
    #[tracing::instrument(skip(self, fetcher))]
    pub fn refresh<F: Fetcher>(&self, fetcher: &F, url: &str, method: InstallMethod) -> Result<()> {
        if url.trim().is_empty() {
            return Err(BpmError::Config("index_url is not set".into()).into());
        }

        if self.runtime.exists(&self.root) {
            for entry in self.runtime.read_dir(&self.root)? {
                debug!("Removing {:?}", entry);
                if self.runtime.is_dir(&entry) && !self.runtime.is_symlink(&entry) {
                    self.runtime.remove_dir_all(&entry)?;
                } else {
                    self.runtime.remove_file(&entry)?;
                }
            }
        } else {
            self.runtime.create_dir_all(&self.root)?;
        }

        info!("Fetching package index from {}", url);
        fetcher.fetch(method, url, &self.root)
    }
}
