use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, info};
use reqwest::blocking::Client;
use std::path::Path;

use super::SourceFetch;
use crate::error::BpmError;

/// Downloads a `.tar.gz` over HTTP and unpacks it in place.
pub struct ArchiveFetcher {
    client: Client,
}

impl Default for ArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveFetcher {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl SourceFetch for ArchiveFetcher {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        info!("Downloading archive from {}...", url);

        let transport = |reason: String| BpmError::TransportFailure {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| transport(e.to_string()))?;

        debug!("Unpacking into {}", dest.display());
        let mut archive = tar::Archive::new(GzDecoder::new(response));
        archive
            .unpack(dest)
            .map_err(|e| transport(format!("failed to unpack archive: {}", e)))
            .with_context(|| format!("Failed to extract into {}", dest.display()))?;

        info!("Download complete.");
        Ok(())
    }
}
