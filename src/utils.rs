//! Utility functions for timestamp formatting, log previews, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Atom timestamp formatting shared by identity keys and the feed writer
//! - String truncation for logging HTML previews
//! - File system validation for the feed's output directory

use chrono::{DateTime, Utc};
use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Format a UTC timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Sub-second precision is dropped.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters with an ellipsis and a count
/// of the remaining bytes appended. Never splits a UTF-8 character.
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

/// The directory that will hold `file_path`; a bare file name resolves to
/// the current directory.
pub fn parent_dir(file_path: &Path) -> &Path {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Ensure the feed at `file_path` can be written later on.
///
/// Performs a write test in the nearest existing ancestor of the feed's
/// directory by creating and immediately deleting a probe file. Missing
/// directories are left for the writer to create, so nothing persists on
/// disk if the run fails afterwards.
///
/// # Errors
///
/// Returns an error if the directory is not writable (permission denied,
/// read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub async fn ensure_writable_dir(file_path: &Path) -> io::Result<()> {
    let mut dir = parent_dir(file_path);
    while !fs::try_exists(dir).await? {
        dir = parent_dir(dir);
        if dir == Path::new(".") {
            break;
        }
    }

    // A sync probe keeps the error surface simple.
    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(dt), "2024-01-03T00:00:00Z");
    }

    #[test]
    fn test_format_timestamp_drops_subseconds() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap()
            + chrono::Duration::milliseconds(750);
        assert_eq!(format_timestamp(dt), "2024-12-31T23:59:58Z");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "ééé";
        assert_eq!(truncate_for_log(s, 1), "é…(+4 bytes)");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("P2PEmpire.xml")), Path::new("."));
        assert_eq!(parent_dir(Path::new("feeds/P2PEmpire.xml")), Path::new("feeds"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_leaves_no_trace() {
        let tmp = tempfile::tempdir().unwrap();
        let feed_path = tmp.path().join("nested").join("deeper").join("P2PEmpire.xml");

        ensure_writable_dir(&feed_path).await.unwrap();

        assert!(!tmp.path().join("nested").exists());
        assert!(!tmp.path().join("..__probe_write__").exists());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();

        ensure_writable_dir(&tmp.path().join("P2PEmpire.xml")).await.unwrap();

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
