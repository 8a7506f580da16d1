//! Picture downloads.
//!
//! The extraction engine only sees the [`Downloader`] trait. Any failure of a
//! download is returned to the caller; nothing here retries.

use crate::errors::{Result, ScrapeError};
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Fetch a remote file and store it at a given path.
pub trait Downloader {
    async fn download(&self, url: &str, destination: &Path) -> Result<()>;
}

/// [`Downloader`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Downloader for HttpDownloader {
    #[instrument(level = "debug", skip_all, fields(%url, destination = %destination.display()))]
    async fn download(&self, url: &str, destination: &Path) -> Result<()> {
        let to_download_error = |source| ScrapeError::Download {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(to_download_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::DownloadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(to_download_error)?;

        fs::write(destination, &bytes)
            .await
            .map_err(|source| ScrapeError::Write {
                path: destination.to_path_buf(),
                source,
            })?;
        debug!(bytes = bytes.len(), "Saved picture");
        Ok(())
    }
}
