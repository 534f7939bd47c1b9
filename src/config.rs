//! Tool configuration (`config.toml`).

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::BpmError;
use crate::fetch::InstallMethod;
use crate::runtime::Runtime;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub install_dir: PathBuf,
    pub index_clone_dir: PathBuf,
    pub index_url: String,
    pub index_method: InstallMethod,
    /// Resolve the two directories against the config file's directory.
    pub relative_paths: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("packages"),
            index_clone_dir: PathBuf::from("index"),
            index_url: String::new(),
            index_method: InstallMethod::Git,
            relative_paths: true,
        }
    }
}

/// Directory roots derived from a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub install_root: PathBuf,
    pub index_root: PathBuf,
}

/// A config together with the directory relative paths are anchored at.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    pub fn paths(&self) -> Paths {
        self.config.resolve_paths(&self.base_dir)
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| BpmError::Config(e.to_string()))
            .context("Failed to parse configuration")
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn resolve_paths(&self, base_dir: &Path) -> Paths {
        let resolve = |p: &Path| {
            if self.relative_paths {
                base_dir.join(p)
            } else {
                p.to_path_buf()
            }
        };
        Paths {
            install_root: resolve(&self.install_dir),
            index_root: resolve(&self.index_clone_dir),
        }
    }
}

/// Find and load the configuration.
///
/// Order: explicit path, `config.toml` beside the executable,
/// `<config dir>/bpm/config.toml`, then defaults anchored at `~/.bpm`.
#[tracing::instrument(skip(runtime))]
pub fn load_config<R: Runtime>(runtime: &R, explicit: Option<PathBuf>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !runtime.is_file(&path) {
            return Err(BpmError::Config(format!("config file {:?} not found", path)).into());
        }
        return load_from(runtime, &path);
    }

    let candidates = [
        runtime.exe_dir().map(|d| d.join(CONFIG_FILE_NAME)),
        runtime
            .config_dir()
            .map(|d| d.join("bpm").join(CONFIG_FILE_NAME)),
    ];
    for path in candidates.into_iter().flatten() {
        debug!("Looking for config at {:?}", path);
        if runtime.is_file(&path) {
            return load_from(runtime, &path);
        }
    }

    let home = runtime
        .home_dir()
        .context("Could not find home directory")?;
    info!("No config file found, using defaults");
    Ok(LoadedConfig {
        config: Config::default(),
        base_dir: home.join(".bpm"),
    })
}

fn load_from<R: Runtime>(runtime: &R, path: &Path) -> Result<LoadedConfig> {
    info!("Using config {}", path.display());
    let config = Config::load(runtime, path)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedConfig { config, base_dir })
}
