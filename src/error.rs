//! Error kinds surfaced by scanning and storage.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Root missing, not a directory, or not traversable. Fatal before any hashing.
    #[error("invalid root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// One file could not be opened or fully read. Recorded per file; the scan continues.
    #[error("cannot read {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Results could not be persisted. Fatal for the run.
    #[error("storage: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Strict mode: the walk hit an entry it could not read.
    #[error("strict mode: {message}")]
    Walk { message: String },

    #[error("cancelled before hashing")]
    Cancelled,

    #[error("worker exited before reporting this path")]
    WorkerLost,
}

impl ScanError {
    pub fn invalid_root(path: &std::path::Path, reason: impl Into<String>) -> Self {
        ScanError::InvalidRoot {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
