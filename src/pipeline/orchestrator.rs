use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use crate::engine::tools::{canonicalize_db_path, validate_root};
use crate::pipeline::pool::{PoolOpts, run_pool};
use crate::pipeline::walk::{DiscoveredPaths, discover, walk_context};
use crate::{ScanOpts, ScanSession};

/// Progress callback handed to the pool.
pub type ProgressFn = Box<dyn Fn(usize) + Send>;

/// Validate `root` and walk it. Returns the canonical root and what the walk found.
pub fn discover_root(root: &Path, opts: &ScanOpts) -> Result<(PathBuf, DiscoveredPaths)> {
    let root = validate_root(root)?;
    let db_canonical = opts.db_path.as_deref().and_then(canonicalize_db_path);
    let ctx = walk_context(&root, db_canonical, &opts.exclude, opts.strict);
    let found = discover(&ctx)?;
    Ok((root, found))
}

/// Discovery → hashing pool. `make_progress` receives the number of discovered paths and may
/// return a callback the pool calls once per finished path.
/// Walk → path channel → workers (SHA-256) → outcome channel → [`ScanSession`].
pub fn run_scan_pipeline<F>(root: &Path, opts: &ScanOpts, make_progress: F) -> Result<ScanSession>
where
    F: FnOnce(usize) -> Option<ProgressFn>,
{
    let (root, found) = discover_root(root, opts)?;
    let DiscoveredPaths { paths, skipped } = found;

    let pool_opts = PoolOpts {
        workers: opts.workers,
        cancel: opts.cancel.clone(),
        on_progress: make_progress(paths.len()),
    };
    let outcome = run_pool(paths.iter().cloned(), &pool_opts);
    let cancelled = opts
        .cancel
        .as_ref()
        .is_some_and(|c| c.load(Ordering::Relaxed));
    debug!(
        "Scan of {}: {} discovered, {} hashed, {} failed{}",
        root.display(),
        paths.len(),
        outcome.results.len(),
        outcome.failures.len(),
        if cancelled { " (cancelled)" } else { "" }
    );

    Ok(ScanSession {
        root,
        discovered: paths,
        results: outcome.results,
        failures: outcome.failures,
        skipped,
        cancelled,
    })
}
