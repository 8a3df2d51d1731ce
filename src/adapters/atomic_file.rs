//! Atomic whole-file replacement.
//!
//! Content goes to a temporary file in the destination's directory, is
//! flushed and synced, then renamed over the destination. Readers see either
//! the old file or the new one, never a partial write.

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::domain::error::LedgerError;

/// Directory that holds `path`, `.` for a bare file name.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), LedgerError> {
    let persist_err = |reason: String| LedgerError::Persist {
        path: path.display().to_string(),
        reason,
    };
    let json = serde_json::to_vec_pretty(value).map_err(|e| persist_err(e.to_string()))?;
    write_atomic(path, &json).map_err(|e| persist_err(e.to_string()))
}
