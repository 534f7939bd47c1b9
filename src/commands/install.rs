use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::fetch::Fetcher;
use crate::package::{InstalledEntry, VersionRequest};
use crate::runtime::Runtime;

use super::context::Workspace;

/// Install a package version from the index
#[tracing::instrument(skip(runtime, config_path))]
pub fn install<R: Runtime>(
    runtime: R,
    name: &str,
    version: Option<&str>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let workspace = Workspace::new(runtime, config_path)?;
    let entry = run(&workspace, name, &VersionRequest::from(version))?;
    println!("Installed {} {}", entry.name, entry.version);
    Ok(())
}

pub(crate) fn run<R: Runtime, F: Fetcher>(
    workspace: &Workspace<R, F>,
    name: &str,
    request: &VersionRequest,
) -> Result<InstalledEntry> {
    debug!("Installing {} ({})", name, request);
    workspace.manager().install(name, request)
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
    fn test_install_missing_index_reports_package_not_found() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let workspace =
            Workspace::with_fetcher(RealRuntime, MockFetcher::new(), Some(config_path)).unwrap();
        let err = run(&workspace, "foo", &VersionRequest::Latest).unwrap_err();

        assert_eq!(
            BpmError::kind_of(&err),
            Some(&BpmError::PackageNotFound("foo".into()))
        );
    }
}
