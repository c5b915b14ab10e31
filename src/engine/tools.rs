//! Path and filter utilities

use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::utils::config::PackagePaths;

/// Path as stored in the DB: lossy UTF-8 with forward slashes.
pub fn path_to_db_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// True if `path` is the result database or one of its SQLite sidecars / temp copy
/// (`duplicates.db`, `duplicates.db.tmp`, `duplicates.db-wal`, `duplicates.db-journal`, ...).
pub fn is_db_artifact(path: &Path, db_canonical: &Option<PathBuf>) -> bool {
    let Some(db) = db_canonical else {
        return false;
    };
    if path.parent() != db.parent() {
        return false;
    }
    let (Some(name), Some(db_name)) = (
        path.file_name().and_then(|n| n.to_str()),
        db.file_name().and_then(|n| n.to_str()),
    ) else {
        return false;
    };
    match name.strip_prefix(db_name) {
        Some(rest) => rest.is_empty() || rest.starts_with('-') || rest.starts_with(".tmp"),
        None => false,
    }
}

/// True if `path` is the settings file directly under `root`.
pub fn is_settings_file(path: &Path, root: &Path) -> bool {
    path.parent() == Some(root)
        && path
            .file_name()
            .is_some_and(|n| n == PackagePaths::get().config_filename())
}

/// Returns true if the path should be hashed (not the root, the DB or the root's settings file,
/// not excluded).
pub fn should_include_in_walk(
    path: &Path,
    root: &Path,
    db_canonical: &Option<PathBuf>,
    exclude_patterns: &[String],
) -> bool {
    if path == root {
        return false;
    }
    if is_db_artifact(path, db_canonical) || is_settings_file(path, root) {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    !exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, name) || glob_match(pattern, path_str))
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    // Last '*' seen in the pattern and the text position it was tried at.
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((spi, sti)) = star {
            pi = spi + 1;
            ti = sti + 1;
            star = Some((spi, sti + 1));
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Check the scan root: it must exist, be a directory and be traversable by this user.
/// Returns the canonicalized root.
pub fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
    let meta = std::fs::metadata(root).map_err(|e| {
        ScanError::invalid_root(root, format!("does not exist or is unreadable ({e})"))
    })?;
    if !meta.is_dir() {
        return Err(ScanError::invalid_root(root, "not a directory"));
    }
    if !is_traversable(root) {
        return Err(ScanError::invalid_root(
            root,
            "insufficient access rights to traverse",
        ));
    }
    std::fs::read_dir(root)
        .map_err(|e| ScanError::invalid_root(root, format!("cannot list directory ({e})")))?;
    root.canonicalize()
        .map_err(|e| ScanError::invalid_root(root, format!("cannot canonicalize ({e})")))
}

/// Search (execute) permission on a directory for the current user.
#[cfg(unix)]
fn is_traversable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(not(unix))]
fn is_traversable(_path: &Path) -> bool {
    true
}

/// Canonicalize the DB path for comparison against walked paths. The file itself may not exist
/// yet, so the parent is canonicalized and the file name re-attached.
pub fn canonicalize_db_path(db_path: &Path) -> Option<PathBuf> {
    if let Ok(p) = db_path.canonicalize() {
        return Some(p);
    }
    let name = db_path.file_name()?;
    let parent = match db_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}
