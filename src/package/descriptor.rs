use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::InstallMethod;

/// Package-level config (`package.toml`) from the index.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    /// The version the index declares as current, not necessarily the highest.
    pub latest_version: String,
}

impl PackageDescriptor {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse package config")
    }
}

/// The `[Install]` recipe of a version config.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct InstallSpec {
    pub install_method: InstallMethod,
    pub install_url: String,
    /// Path inside the fetched tree that holds the usable sources.
    pub package_src_dir: String,
    /// Name of the link exposing `package_src_dir`.
    pub install_folder: String,
}

/// Version config (`<version>.toml`) from the index.
///
/// Keeps the raw text so an install can snapshot exactly what it used.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VersionDescriptor {
    #[serde(rename = "Install")]
    pub install: InstallSpec,
    #[serde(skip)]
    raw: String,
}

impl VersionDescriptor {
    pub fn parse(content: &str) -> Result<Self> {
        let mut descriptor: VersionDescriptor =
            toml::from_str(content).context("Failed to parse version config")?;
        descriptor.raw = content.to_string();
        Ok(descriptor)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}
