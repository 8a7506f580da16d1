//! Utility functions for logging and file system operations.
//!
//! - String truncation for log fields
//! - Output directory validation
//! - All-or-nothing file replacement for the report

use crate::errors::{Result, ScrapeError};
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn ensure_writable_dir(path: &Path) -> Result<()> {
    stdfs::create_dir_all(path)?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path).map_err(|source| ScrapeError::Write {
        path: probe_path.clone(),
        source,
    })?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

/// Replace `path` with `bytes` so readers see either the old file or the
/// complete new one.
///
/// The bytes go to a temporary sibling first, which is then renamed over the
/// target. On failure the temporary file is removed and `path` is untouched.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), bytes = bytes.len()))]
pub async fn write_file_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_sibling(path);
    let to_write_error = |source| ScrapeError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = fs::write(&tmp_path, bytes).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(to_write_error(e));
    }
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(to_write_error(e));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
