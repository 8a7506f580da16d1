//! Error types for the scraping run.
//!
//! A single [`ScrapeError`] covers every way a run can fail. Missing fields
//! and missing pictures are not errors; they are resolved by the extraction
//! fallbacks and never reach this type.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The site confirmed that the search phrase matched nothing.
    #[error("No results found for the search phrase: '{phrase}'")]
    NoResults { phrase: String },

    #[error("search phrase {phrase:?} is not a valid pattern: {source}")]
    InvalidPhrase {
        phrase: String,
        #[source]
        source: regex::Error,
    },

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: String, timeout: Duration },

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("article {index} has a picture without a source attribute")]
    MissingImageSource { index: usize },

    #[error("download of {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} returned HTTP {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_message_carries_phrase() {
        let err = ScrapeError::NoResults {
            phrase: "IPL".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No results found for the search phrase: 'IPL'"
        );
    }

    #[test]
    fn test_timeout_message_names_locator() {
        let err = ScrapeError::Timeout {
            locator: "css `select.select-input`".to_string(),
            timeout: Duration::from_secs(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("select.select-input"));
        assert!(msg.contains("3s"));
    }
}
