//! Scan-and-store flow used by the CLI: pick a mode, run the pipeline, persist, query.

use anyhow::{Result, bail};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::engine::progress::{create_progress_bar, finish_progress_bar, progress_callback};
use crate::engine::{
    count_files, load_duplicates, open_db, open_db_in_memory, store_results, store_to_file,
};
use crate::pipeline::run_scan_pipeline;
use crate::utils::config::PackagePaths;
use crate::{DuplicateGroup, Opts, ScanCounts, ScanOpts, ScanSession};

/// What the CLI should do for a given set of flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Hash the tree and replace the stored results.
    Scan,
    /// Print the stored duplicate report without rescanning.
    ListStored,
    /// Nothing requested.
    Help,
}

/// temp or force always scan; list scans only when there is no database yet.
pub fn select_mode(opts: &Opts, db_exists: bool) -> Mode {
    if opts.temp || opts.force || (opts.list && !db_exists) {
        Mode::Scan
    } else if opts.list {
        Mode::ListStored
    } else {
        Mode::Help
    }
}

/// Database path from options, or the package default inside `root`.
pub fn resolve_db_path(root: &Path, opts: &Opts) -> PathBuf {
    opts.db_path
        .clone()
        .unwrap_or_else(|| root.join(PackagePaths::get().db_filename()))
}

/// Outcome of a scan run: the session, counts read back from the store, and the duplicate groups
/// when listing was requested.
#[derive(Debug)]
pub struct ScanSummary {
    pub session: ScanSession,
    pub counts: ScanCounts,
    pub duplicates: Option<Vec<DuplicateGroup>>,
}

/// Scan `root`, store results (in memory when `opts.temp`, otherwise atomically to `db_path`) and
/// read back counts. A cancelled scan is not stored.
pub fn scan_and_store(
    root: &Path,
    db_path: &Path,
    opts: &Opts,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<ScanSummary> {
    let mut scan_opts = ScanOpts::from(opts);
    scan_opts.db_path = (!opts.temp).then(|| db_path.to_path_buf());
    scan_opts.cancel = cancel;

    let verbose = opts.verbose;
    let mut bar = None;
    let session = run_scan_pipeline(root, &scan_opts, |total| {
        bar = verbose.then(|| create_progress_bar(total, "Hashing"));
        progress_callback(&bar)
    })?;
    if let Some(bar) = bar.as_ref() {
        finish_progress_bar(bar);
    }

    if session.cancelled {
        bail!(
            "Scan cancelled by user after {} of {} files; results were not stored",
            session.results.len(),
            session.discovered.len()
        );
    }

    let conn = if opts.temp {
        debug!("Using in-memory database");
        let mut conn = open_db_in_memory()?;
        store_results(&mut conn, &session.results)?;
        conn
    } else {
        store_to_file(db_path, &session.results)?;
        info!("Results stored in {}", db_path.display());
        open_db(db_path)?
    };

    let counts = count_files(&conn)?;
    let duplicates = if opts.list || opts.temp {
        Some(load_duplicates(&conn)?)
    } else {
        None
    };
    Ok(ScanSummary {
        session,
        counts,
        duplicates,
    })
}

/// Read the stored report from an existing database.
pub fn list_stored(db_path: &Path) -> Result<(ScanCounts, Vec<DuplicateGroup>)> {
    let conn = open_db(db_path)?;
    Ok((count_files(&conn)?, load_duplicates(&conn)?))
}
