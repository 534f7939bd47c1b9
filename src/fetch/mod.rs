//! Source fetching for the index and for package installs.
//!
//! Each supported method is a variant of [`InstallMethod`] backed by a
//! [`SourceFetch`] implementation; [`MethodFetcher`] dispatches between them.

mod archive;
mod git;

use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use archive::ArchiveFetcher;
pub use git::GitFetcher;

/// Supported fetch methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum InstallMethod {
    /// `git clone <url> <dest>`
    #[default]
    Git,
    /// HTTP download of a gzip-compressed tarball unpacked into `<dest>`
    Archive,
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallMethod::Git => write!(f, "git"),
            InstallMethod::Archive => write!(f, "archive"),
        }
    }
}

impl FromStr for InstallMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "git" => Ok(InstallMethod::Git),
            "archive" => Ok(InstallMethod::Archive),
            _ => anyhow::bail!("Unknown install method: {}. Expected git or archive.", s),
        }
    }
}

impl TryFrom<String> for InstallMethod {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fetch the tree at `url` into `dest`.
///
/// `dest` may already exist but must be empty.
pub trait SourceFetch {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Fetch capability used by the index and the install manager.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    fn fetch(&self, method: InstallMethod, url: &str, dest: &Path) -> Result<()>;
}

/// Dispatcher that selects the fetch implementation for a method.
pub struct MethodFetcher {
    git: GitFetcher,
    archive: ArchiveFetcher,
}

impl Default for MethodFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodFetcher {
    pub fn new() -> Self {
        Self {
            git: GitFetcher,
            archive: ArchiveFetcher::new(),
        }
    }

    fn fetcher_for(&self, method: InstallMethod) -> &dyn SourceFetch {
        match method {
            InstallMethod::Git => &self.git,
            InstallMethod::Archive => &self.archive,
        }
    }
}

impl Fetcher for MethodFetcher {
    #[tracing::instrument(skip(self, dest))]
    fn fetch(&self, method: InstallMethod, url: &str, dest: &Path) -> Result<()> {
        log::info!("Fetching {} via {} into {}", url, method, dest.display());
        self.fetcher_for(method).fetch(url, dest)
    }
}
