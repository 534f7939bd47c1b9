use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::fetch::Fetcher;
use crate::runtime::Runtime;

use super::context::Workspace;

/// Re-clone the package index from the configured URL
#[tracing::instrument(skip(runtime, config_path))]
pub fn refresh<R: Runtime>(runtime: R, config_path: Option<PathBuf>) -> Result<()> {
    let workspace = Workspace::new(runtime, config_path)?;
    run(&workspace)?;
    println!("Index refreshed at {}", workspace.paths.index_root.display());
    Ok(())
}

pub(crate) fn run<R: Runtime, F: Fetcher>(workspace: &Workspace<R, F>) -> Result<()> {
    info!(
        "Refreshing index from {} ({})",
        workspace.config.index_url, workspace.config.index_method
    );
    workspace
        .manager()
        .refresh(&workspace.config.index_url, workspace.config.index_method)
}
