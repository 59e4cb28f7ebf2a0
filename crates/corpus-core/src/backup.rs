//! Dated backup copies of files about to be overwritten.
//!
//! Backups are named `{stem}_{YYYYMMDD}.{ext}` inside the backup directory. A
//! second backup on the same day replaces the first.

use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Returns the dated backup path for `original` inside `backup_dir`.
#[must_use]
pub fn dated_backup_path(original: &Path, backup_dir: &Path, date: NaiveDate) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match original.extension() {
        Some(ext) => format!("{stem}_{}.{}", date.format("%Y%m%d"), ext.to_string_lossy()),
        None => format!("{stem}_{}", date.format("%Y%m%d")),
    };
    backup_dir.join(name)
}

/// Copies `original` to its dated backup path if it exists.
///
/// Returns the backup path, or `None` when there was nothing to back up.
///
/// # Errors
/// Returns the I/O error if the backup directory cannot be created or the copy
/// fails.
pub fn backup_existing(
    original: &Path,
    backup_dir: &Path,
    date: NaiveDate,
) -> io::Result<Option<PathBuf>> {
    if !original.is_file() {
        debug!(path = %original.display(), "Nothing to back up");
        return Ok(None);
    }
    std::fs::create_dir_all(backup_dir)?;
    let target = dated_backup_path(original, backup_dir, date);
    std::fs::copy(original, &target)?;
    info!(
        from = %original.display(),
        to = %target.display(),
        "Created backup copy"
    );
    Ok(Some(target))
}
