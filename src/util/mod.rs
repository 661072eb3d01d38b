//! Shared utilities: logging, name matching, bounds.

use std::path::Path;
use tracing::Level;

/// Initialize tracing with env filter. Safe to call once at startup.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Normalize a weapon name or search query for case-insensitive matching.
pub fn normalize_name(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Case-insensitive substring match of `query` against `name`. Empty query matches all.
pub fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Check a file exists and is within size limit; returns its size.
pub fn check_file_size(path: &Path, max_bytes: usize) -> Result<u64, String> {
    let meta = std::fs::metadata(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if !meta.is_file() {
        return Err(format!("not a file: {}", path.display()));
    }
    let size = meta.len();
    if size > max_bytes as u64 {
        return Err(format!(
            "file too large: {} bytes (max {})",
            size, max_bytes
        ));
    }
    Ok(size)
}
