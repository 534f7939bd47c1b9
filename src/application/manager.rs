//! Install manager - install, uninstall and locate packages.
//!
//! "latest" means different things per operation: install takes the
//! version the index declares, uninstall and locate take the highest
//! version present in the ledger.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::cleanup::CleanupGuard;
use crate::config::Paths;
use crate::error::BpmError;
use crate::fetch::{Fetcher, InstallMethod};
use crate::package::{
    InstallLayout, InstallLedger, InstalledEntry, PackageIndex, Version, VersionRequest,
    VersionResolver, resolve_under, validate_name,
};
use crate::runtime::path::normalize_path;
use crate::runtime::{Runtime, relative_symlink_path};

pub struct InstallManager<'a, R: Runtime, F: Fetcher> {
    runtime: &'a R,
    fetcher: &'a F,
    index: PackageIndex<'a, R>,
    ledger: InstallLedger<'a, R>,
    layout: InstallLayout<'a, R>,
}

impl<'a, R: Runtime, F: Fetcher> InstallManager<'a, R, F> {
    pub fn new(runtime: &'a R, fetcher: &'a F, paths: &Paths) -> Self {
        Self {
            runtime,
            fetcher,
            index: PackageIndex::new(runtime, paths.index_root.clone()),
            ledger: InstallLedger::in_root(runtime, &paths.install_root),
            layout: InstallLayout::new(runtime, paths.install_root.clone()),
        }
    }

    pub fn index(&self) -> &PackageIndex<'a, R> {
        &self.index
    }

    pub fn ledger(&self) -> &InstallLedger<'a, R> {
        &self.ledger
    }

    pub fn layout(&self) -> &InstallLayout<'a, R> {
        &self.layout
    }

    /// Re-clone the package index.
    pub fn refresh(&self, url: &str, method: InstallMethod) -> Result<()> {
        self.index.refresh(self.fetcher, url, method)
    }

    /// Installed entries in ledger order.
    pub fn list(&self) -> Result<Vec<InstalledEntry>> {
        self.ledger.list_installed()
    }

    /// Install a package version from the index.
    ///
    /// The ledger entry is written last, once the tree, link and snapshot
    /// exist; any earlier failure removes the new version directory.
    #[tracing::instrument(skip(self))]
    pub fn install(&self, name: &str, request: &VersionRequest) -> Result<InstalledEntry> {
        let location = self.index.locate(name)?;

        let version = match request {
            VersionRequest::Latest => {
                let declared = self.index.read_package_config(&location)?.latest_version;
                debug!("Index declares {} as latest for {}", declared, name);
                declared
            }
            VersionRequest::Exact(v) => v.clone(),
        };

        if !self.index.list_versions(&location)?.contains(&version) {
            return Err(BpmError::VersionNotFound {
                package: name.to_string(),
                version,
            }
            .into());
        }
        validate_name(&version)?;
        // Ledger entries must stay comparable for "latest" resolution
        version.parse::<Version>()?;

        if self.ledger.contains(name, &version)? {
            return Err(BpmError::AlreadyInstalled {
                package: name.to_string(),
                version,
            }
            .into());
        }

        let descriptor = self.index.read_version_config(&location, &version)?;
        let spec = &descriptor.install;

        let version_dir = self.layout.version_dir(name, &version);
        let src_dir = resolve_under(&version_dir, &spec.package_src_dir)?;
        let link_path = resolve_under(&version_dir, &spec.install_folder)?;
        if link_path == normalize_path(&version_dir) {
            return Err(BpmError::UnsafePath(spec.install_folder.clone()).into());
        }

        if self.runtime.exists(&version_dir) || self.runtime.is_symlink(&version_dir) {
            return Err(BpmError::DirectoryConflict(version_dir.display().to_string()).into());
        }

        info!("Installing {} {} into {}", name, version, version_dir.display());
        let package_dir = self.layout.package_dir(name);
        let package_guard = (!self.runtime.exists(&package_dir))
            .then(|| CleanupGuard::new(self.runtime, package_dir));
        self.runtime.create_dir_all(&version_dir)?;
        let guard = CleanupGuard::new(self.runtime, version_dir.clone());

        self.fetcher
            .fetch(spec.install_method, &spec.install_url, &version_dir)
            .with_context(|| format!("Failed to fetch {} {}", name, version))?;

        self.link_install_folder(&src_dir, &link_path)?;
        self.layout.save_snapshot(name, &version, &descriptor)?;
        self.ledger.append(name, &version)?;

        guard.success();
        if let Some(package_guard) = package_guard {
            package_guard.success();
        }
        info!("Installed {} {}", name, version);
        Ok(InstalledEntry::new(name, version))
    }

    /// Remove an installed version and its ledger entry.
    ///
    /// A version directory that is already gone is not an error.
    #[tracing::instrument(skip(self))]
    pub fn uninstall(&self, name: &str, request: &VersionRequest) -> Result<InstalledEntry> {
        let version = self.resolve_installed(name, request)?;
        validate_name(name)?;
        validate_name(&version)?;

        info!("Uninstalling {} {}", name, version);
        self.layout.remove_version_dir(name, &version)?;
        self.ledger.remove(name, &version)?;

        Ok(InstalledEntry::new(name, version))
    }

    /// Path of an installed version's install folder.
    ///
    /// Read from the snapshot taken at install time, not the live index.
    #[tracing::instrument(skip(self))]
    pub fn locate(&self, name: &str, request: &VersionRequest) -> Result<PathBuf> {
        let version = self.resolve_installed(name, request)?;
        validate_name(name)?;
        validate_name(&version)?;

        let snapshot = self.layout.load_snapshot(name, &version)?;
        let version_dir = self.layout.version_dir(name, &version);
        Ok(resolve_under(&version_dir, &snapshot.install.install_folder)?)
    }

    /// Resolve a request against the ledger.
    ///
    /// "Package absent" and "version absent" are distinct failures.
    fn resolve_installed(&self, name: &str, request: &VersionRequest) -> Result<String> {
        let entries = self.ledger.list_installed()?;
        let versions: Vec<&str> = entries
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.version.as_str())
            .collect();

        if versions.is_empty() {
            return Err(BpmError::PackageNotInstalled {
                package: name.to_string(),
            }
            .into());
        }

        match request {
            VersionRequest::Latest => {
                let highest = VersionResolver::highest(versions.iter().copied())?.ok_or_else(
                    || BpmError::PackageNotInstalled {
                        package: name.to_string(),
                    },
                )?;
                debug!("Highest installed version of {} is {}", name, highest);
                Ok(highest.to_string())
            }
            VersionRequest::Exact(v) if versions.contains(&v.as_str()) => Ok(v.clone()),
            VersionRequest::Exact(v) => Err(BpmError::VersionNotInstalled {
                package: name.to_string(),
                version: v.clone(),
            }
            .into()),
        }
    }

    fn link_install_folder(&self, src_dir: &Path, link_path: &Path) -> Result<()> {
        if let Some(parent) = link_path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        let target = match relative_symlink_path(link_path, src_dir) {
            Some(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Some(rel) => rel,
            None => src_dir.to_path_buf(),
        };

        debug!("Linking {:?} -> {:?}", link_path, target);
        self.runtime
            .symlink(&target, link_path)
            .with_context(|| format!("Failed to create install folder {:?}", link_path))
    }
}
