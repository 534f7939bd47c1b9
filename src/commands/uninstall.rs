use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::fetch::Fetcher;
use crate::package::{InstalledEntry, VersionRequest};
use crate::runtime::Runtime;

use super::context::Workspace;

/// Remove an installed package version
#[tracing::instrument(skip(runtime, config_path))]
pub fn uninstall<R: Runtime>(
    runtime: R,
    name: &str,
    version: Option<&str>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let workspace = Workspace::new(runtime, config_path)?;
    let entry = run(&workspace, name, &VersionRequest::from(version))?;
    println!("Uninstalled {} {}", entry.name, entry.version);
    Ok(())
}

pub(crate) fn run<R: Runtime, F: Fetcher>(
    workspace: &Workspace<R, F>,
    name: &str,
    request: &VersionRequest,
) -> Result<InstalledEntry> {
    debug!("Uninstalling {} ({})", name, request);
    workspace.manager().uninstall(name, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BpmError;
    use crate::fetch::MockFetcher;
    use crate::runtime::RealRuntime;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_uninstall_removes_ledger_entry() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();
        fs::create_dir_all(dir.path().join("packages/foo/1.0.0")).unwrap();
        fs::write(
            dir.path().join("packages/package_list.txt"),
            "\nfoo 1.0.0\nbar 2.0.0",
        )
        .unwrap();

        let workspace =
            Workspace::with_fetcher(RealRuntime, MockFetcher::new(), Some(config_path)).unwrap();
        let entry = run(&workspace, "foo", &VersionRequest::Latest).unwrap();

        assert_eq!(entry, InstalledEntry::new("foo", "1.0.0"));
        assert!(!dir.path().join("packages/foo").exists());
        assert_eq!(
            workspace.manager().list().unwrap(),
            vec![InstalledEntry::new("bar", "2.0.0")]
        );
    }

    #[test]
    fn test_uninstall_not_installed() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let workspace =
            Workspace::with_fetcher(RealRuntime, MockFetcher::new(), Some(config_path)).unwrap();
        let err = run(&workspace, "foo", &VersionRequest::Latest).unwrap_err();

        assert!(BpmError::kind_of(&err).unwrap().is_not_installed());
    }
}
