//! The installed-package ledger (`package_list.txt`).
//!
//! One `name version` entry per line. Blank lines and lines whose first
//! non-blank character is `#` are ignored. Entries are written with a leading newline separator.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub const LEDGER_FILE_NAME: &str = "package_list.txt";

/// A recorded (name, version) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledEntry {
    pub name: String,
    pub version: String,
}

impl InstalledEntry {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn matches(&self, name: &str, version: &str) -> bool {
        self.name == name && self.version == version
    }

    fn line(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

pub struct InstallLedger<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> InstallLedger<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    /// Ledger stored in its default location under an install root.
    pub fn in_root(runtime: &'a R, install_root: &Path) -> Self {
        Self::new(runtime, install_root.join(LEDGER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in file order. A missing file is an empty ledger.
    #[tracing::instrument(skip(self))]
    pub fn list_installed(&self) -> Result<Vec<InstalledEntry>> {
        if !self.runtime.exists(&self.path) {
            debug!("Ledger {:?} does not exist yet", self.path);
            return Ok(vec![]);
        }

        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger {:?}", self.path))?;

        let mut entries = Vec::new();
        for line in content.lines() {
            if is_noise(line) {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [name, version] => entries.push(InstalledEntry::new(*name, *version)),
                _ => warn!("Skipping malformed ledger line: {:?}", line),
            }
        }
        Ok(entries)
    }

    pub fn contains(&self, name: &str, version: &str) -> Result<bool> {
        Ok(self
            .list_installed()?
            .iter()
            .any(|e| e.matches(name, version)))
    }

    /// Record an entry. Duplicate detection is the caller's job.
    #[tracing::instrument(skip(self))]
    pub fn append(&self, name: &str, version: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        let line = format!("\n{}", InstalledEntry::new(name, version).line());
        self.runtime
            .append(&self.path, line.as_bytes())
            .with_context(|| format!("Failed to append to ledger {:?}", self.path))
    }

    /// Rewrite the ledger without blank lines and lines equal to `name version`.
    #[tracing::instrument(skip(self))]
    pub fn remove(&self, name: &str, version: &str) -> Result<()> {
        if !self.runtime.exists(&self.path) {
            return Ok(());
        }

        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger {:?}", self.path))?;
        let target = InstalledEntry::new(name, version).line();

        let mut rewritten = String::with_capacity(content.len());
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed == target {
                continue;
            }
            rewritten.push('\n');
            rewritten.push_str(trimmed);
        }

        self.runtime
            .write(&self.path, rewritten.as_bytes())
            .with_context(|| format!("Failed to rewrite ledger {:?}", self.path))
    }
}

fn is_noise(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}
