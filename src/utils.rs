//! Helpers for bounded log output and output-path validation.

use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging or error messages.
///
/// Long strings are cut to at most `max` bytes, backed off to the nearest
/// character boundary (the source publishes in Bangla, so byte-index slicing
/// would panic mid-codepoint), with an ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `path` exists and is writable.
///
/// Creates the directory if needed, then performs a write test by creating
/// and immediately deleting a probe file. Running this before the fetch
/// means a doomed run fails fast instead of after a full browser-emulation
/// round trip.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_parent(path: &str) -> Result<(), io::Error> {
    let dir = match Path::new(path).parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;

    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output location is writable");
    Ok(())
}
