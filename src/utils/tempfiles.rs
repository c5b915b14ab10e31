use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Temporary path the result database is written to before the final rename.
pub fn temp_path_for(db_path: &Path) -> PathBuf {
    let name = db_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| PackagePaths::get().db_filename());
    db_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Remove SQLite WAL and SHM files next to `db_path` (left behind after a rename or a crash).
pub fn remove_wal_and_shm(db_path: &Path) {
    let file_name = db_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let parent = db_path.parent().unwrap_or(Path::new("."));
    let _ = fs::remove_file(parent.join(format!("{file_name}-wal")));
    let _ = fs::remove_file(parent.join(format!("{file_name}-shm")));
}

/// Remove a stale temp database (and its sidecars) from an earlier interrupted run.
pub fn prepare_temp_path(db_path: &Path) -> Result<PathBuf> {
    let temp_path = temp_path_for(db_path);
    if temp_path.exists() {
        remove_wal_and_shm(&temp_path);
        fs::remove_file(&temp_path).with_context(|| {
            format!("remove stale temp database at {}", temp_path.display())
        })?;
    }
    Ok(temp_path)
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    remove_wal_and_shm(final_path);
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp database to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })?;
    remove_wal_and_shm(temp_path);
    Ok(())
}
