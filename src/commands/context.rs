use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    application::InstallManager,
    config::{Config, Paths, load_config},
    fetch::{Fetcher, MethodFetcher},
    runtime::Runtime,
};

/// Everything a command needs: runtime, fetcher and the resolved config.
pub struct Workspace<R: Runtime, F: Fetcher> {
    pub runtime: R,
    pub fetcher: F,
    pub config: Config,
    pub paths: Paths,
}

impl<R: Runtime> Workspace<R, MethodFetcher> {
    pub fn new(runtime: R, config_path: Option<PathBuf>) -> Result<Self> {
        Self::with_fetcher(runtime, MethodFetcher::new(), config_path)
    }
}

impl<R: Runtime, F: Fetcher> Workspace<R, F> {
    pub fn with_fetcher(runtime: R, fetcher: F, config_path: Option<PathBuf>) -> Result<Self> {
        let loaded = load_config(&runtime, config_path)?;
        let paths = loaded.paths();
        debug!(
            "Install root {:?}, index root {:?}",
            paths.install_root, paths.index_root
        );
        Ok(Self {
            runtime,
            fetcher,
            config: loaded.config,
            paths,
        })
    }

    pub fn manager(&self) -> InstallManager<'_, R, F> {
        InstallManager::new(&self.runtime, &self.fetcher, &self.paths)
    }
}
