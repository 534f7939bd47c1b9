use anyhow::Result;
use log::debug;
use std::path::Path;
use std::process::Command;

use super::SourceFetch;
use crate::error::BpmError;

/// Clones repositories with the system `git` binary.
pub struct GitFetcher;

impl SourceFetch for GitFetcher {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("git clone {} {}", url, dest.display());

        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg(url)
            .arg(dest)
            .output()
            .map_err(|e| BpmError::TransportFailure {
                url: url.to_string(),
                reason: format!("failed to run git: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BpmError::TransportFailure {
                url: url.to_string(),
                reason: format!("git clone failed: {}", stderr.trim()),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_git_clone_missing_repository_is_transport_failure() {
        // Fails whether or not git is installed: either spawning or cloning errors out
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-repo");
        let dest = dir.path().join("dest");

        let err = GitFetcher
            .fetch(missing.to_str().unwrap(), &dest)
            .unwrap_err();

        assert!(matches!(
            BpmError::kind_of(&err),
            Some(BpmError::TransportFailure { .. })
        ));
    }
}
