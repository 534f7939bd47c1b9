use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;

use super::context::Workspace;

/// List installed packages in ledger order
#[tracing::instrument(skip(runtime, config_path))]
pub fn list<R: Runtime>(runtime: R, config_path: Option<PathBuf>) -> Result<()> {
    let workspace = Workspace::new(runtime, config_path)?;
    let entries = workspace.manager().list()?;

    if entries.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }

    debug!("Found {} installed package(s)", entries.len());
    for entry in entries {
        println!("{} {}", entry.name, entry.version);
    }

    Ok(())
}
