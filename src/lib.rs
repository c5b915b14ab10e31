//! dupescan: find duplicate files by SHA-256 content hash.
//!
//! Walk a directory, hash every regular file on a bounded worker pool, and store
//! `(filepath, sha256sum)` rows in SQLite so duplicate groups can be listed without rescanning.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::ScanError;
pub use types::*;

use log::debug;
use std::path::Path;

/// Result alias used by public dupescan API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: validate `root`, walk it and hash every regular file with `opts.workers`
/// threads. Per-file errors land in [`ScanSession::failures`]; only an invalid root or a strict-mode
/// walk error is returned as `Err`. Nothing is persisted; see [`engine::store_results`].
///
/// ```ignore
/// let session = dupescan::scan_dir(Path::new("/data"), &ScanOpts::default())?;
/// let mut conn = dupescan::engine::open_db_in_memory()?;
/// dupescan::engine::store_results(&mut conn, &session.results)?;
/// for group in dupescan::engine::load_duplicates(&conn)? {
///     println!("{} x{}", group.digest, group.paths.len());
/// }
/// ```
pub fn scan_dir(root: &Path, opts: &ScanOpts) -> Result<ScanSession> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    pipeline::run_scan_pipeline(root, opts, |_| None)
}
