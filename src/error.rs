//! Typed failures surfaced by the package manager core.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BpmError {
    #[error("Could not find package: {0}")]
    PackageNotFound(String),

    #[error("Version '{version}' not found for package '{package}'")]
    VersionNotFound { package: String, version: String },

    #[error("Package '{package}' version '{version}' is already installed")]
    AlreadyInstalled { package: String, version: String },

    #[error("Package '{package}' is not installed")]
    PackageNotInstalled { package: String },

    #[error("Package '{package}' version '{version}' is not installed")]
    VersionNotInstalled { package: String, version: String },

    #[error("Install directory already exists: {0}")]
    DirectoryConflict(String),

    #[error("Malformed version '{version}': component '{component}' is not a non-negative integer")]
    MalformedVersion { version: String, component: String },

    #[error("Fetch of {url} failed: {reason}")]
    TransportFailure { url: String, reason: String },

    #[error("Path '{0}' escapes its parent directory")]
    UnsafePath(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BpmError {
    /// Find the typed failure anywhere in an error chain.
    pub fn kind_of(err: &anyhow::Error) -> Option<&BpmError> {
        err.chain().find_map(|cause| cause.downcast_ref::<BpmError>())
    }

    /// True for both "package absent" and "version absent" ledger misses.
    pub fn is_not_installed(&self) -> bool {
        matches!(
            self,
            BpmError::PackageNotInstalled { .. } | BpmError::VersionNotInstalled { .. }
        )
    }
}
