use anyhow::{Result, anyhow};
use std::str::FromStr;

use super::version::VersionRequest;

/// A package argument that may pin a version
/// Format: "name" or "name=version"
#[derive(Debug, PartialEq, Clone)]
pub struct PackageSpec {
    pub name: String,
    pub version: Option<String>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn request(&self) -> VersionRequest {
        VersionRequest::from(self.version.as_deref())
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for PackageSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = match s.split_once('=') {
            Some((name, ver)) => {
                if ver.is_empty() {
                    return Err(anyhow!(
                        "Invalid format: version after = cannot be empty. Expected 'name=version'."
                    ));
                }
                (name, Some(ver.to_string()))
            }
            None => (s, None),
        };

        if name.is_empty() {
            return Err(anyhow!("Invalid format: package name cannot be empty."));
        }

        Ok(PackageSpec::new(name, version))
    }
}
