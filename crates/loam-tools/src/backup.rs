//! Timestamped backup naming.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

/// The backup path for a file: the original name with a local-time
/// `-%Y%m%d_%H%M%S.bak` suffix appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let suffix = Local::now().format("-%Y%m%d_%H%M%S.bak").to_string();
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Rename a file to its backup path, returning where it went.
pub fn create_backup(path: &Path) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    std::fs::rename(path, &backup)?;
    Ok(backup)
}
