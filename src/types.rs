//! Public and internal types for the dupescan API and pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::error::ScanError;
use crate::utils::config::WorkerConsts;

/// Digest of one file: the path that was read and its SHA-256 as 64 lowercase hex chars.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HashResult {
    pub path: PathBuf,
    pub digest: String,
}

/// A path the pool could not turn into a [`HashResult`], with the cause.
#[derive(Debug)]
pub struct HashFailure {
    pub path: PathBuf,
    pub error: ScanError,
}

/// Everything the pool produced for one batch of paths. Every unique input path appears exactly
/// once across `results` and `failures`; order is completion order and carries no meaning.
#[derive(Debug, Default)]
pub struct PoolOutcome {
    pub results: Vec<HashResult>,
    pub failures: Vec<HashFailure>,
}

impl PoolOutcome {
    /// Number of input paths accounted for (successes + failures).
    pub fn accounted(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// Inputs and outputs of one run: discovered paths, hash results, per-file failures and walk skips.
#[derive(Debug, Default)]
pub struct ScanSession {
    /// Canonicalized scan root.
    pub root: PathBuf,
    /// Regular files found by the walk (already deduplicated by the pool before hashing).
    pub discovered: Vec<PathBuf>,
    pub results: Vec<HashResult>,
    pub failures: Vec<HashFailure>,
    /// Paths the walk could not enter, with the walk error message.
    pub skipped: Vec<(PathBuf, String)>,
    /// True when the scan was interrupted; results are partial and must not be stored.
    pub cancelled: bool,
}

/// One digest shared by two or more paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub digest: String,
    pub paths: Vec<PathBuf>,
}

/// Summary counts from the stored results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanCounts {
    pub total_files: usize,
    /// Number of distinct digests that occur on two or more paths.
    pub duplicate_digests: usize,
}

/// Lib-only options for [`scan_dir`](crate::scan_dir).
#[derive(Clone, Debug)]
pub struct ScanOpts {
    /// Number of hashing workers. Capped by the open-file limit.
    pub workers: usize,
    /// Exclude patterns (glob syntax, e.g. `*.iso`, `node_modules`).
    pub exclude: Vec<String>,
    /// Strict mode: fail on the first walk error instead of skipping the entry.
    pub strict: bool,
    /// Result database location; the walk skips it and its sidecar files.
    pub db_path: Option<PathBuf>,
    /// When set and flipped to true, workers stop hashing and report remaining paths as cancelled.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ScanOpts {
    fn default() -> Self {
        Self {
            workers: WorkerConsts::DEFAULT_WORKERS,
            exclude: Vec::new(),
            strict: false,
            db_path: None,
            cancel: None,
        }
    }
}

impl From<&Opts> for ScanOpts {
    fn from(o: &Opts) -> Self {
        ScanOpts {
            workers: o.workers,
            exclude: o.exclude.clone(),
            strict: o.strict,
            db_path: o.db_path.clone(),
            cancel: None,
        }
    }
}

/// Full options (CLI). Use [`ScanOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Result database path. When None, uses `root.join(<package db filename>)`.
    pub db_path: Option<PathBuf>,
    pub workers: usize,
    pub exclude: Vec<String>,
    /// Debug logging and progress bar.
    pub verbose: bool,
    pub strict: bool,
    /// Drop any existing database and rescan.
    pub force: bool,
    /// Print duplicate groups.
    pub list: bool,
    /// Use an in-memory database; nothing is written to disk.
    pub temp: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            db_path: None,
            workers: WorkerConsts::DEFAULT_WORKERS,
            exclude: Vec::new(),
            verbose: false,
            strict: false,
            force: false,
            list: false,
            temp: false,
        }
    }
}
