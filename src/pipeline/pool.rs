//! Bounded hashing pool.
//!
//! Every unique input path is preloaded into one channel; N workers `recv` from it, so each path
//! is claimed by exactly one worker. Outcomes come back on a second channel and are collected on
//! the calling thread in completion order. `run_pool` returns only after all workers have exited
//! and every path has either a [`HashResult`] or a [`HashFailure`].

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::hashing::hash_file_with_buffer;
use crate::error::ScanError;
use crate::utils::config::{HashingConsts, WorkerConsts};
use crate::utils::fd_limit::cap_workers;
use crate::{HashFailure, HashResult, PoolOutcome};

/// What a worker sends back for one path.
pub type HashOutcome = Result<HashResult, HashFailure>;

/// Outcomes buffered per worker before workers block on the collector.
const OUTCOMES_PER_WORKER: usize = 64;

/// Pool settings. Passed explicitly so the pool holds no ambient state.
pub struct PoolOpts {
    /// Requested worker count (0 is treated as 1; capped by the FD limit and by the path count).
    pub workers: usize,
    /// When set to true, workers stop hashing and report each remaining path as cancelled.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Called on the collecting thread with `1` for every outcome received.
    pub on_progress: Option<Box<dyn Fn(usize) + Send>>,
}

impl Default for PoolOpts {
    fn default() -> Self {
        Self {
            workers: WorkerConsts::DEFAULT_WORKERS,
            cancel: None,
            on_progress: None,
        }
    }
}

impl PoolOpts {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}

fn is_cancelled(cancel: &Option<Arc<AtomicBool>>) -> bool {
    cancel.as_ref().is_some_and(|c| c.load(Ordering::Relaxed))
}

/// Single hash worker: claim paths until the channel is drained, hash each with one reused buffer.
fn hash_worker_loop(
    path_rx: Receiver<PathBuf>,
    outcome_tx: Sender<HashOutcome>,
    cancel: Option<Arc<AtomicBool>>,
) {
    let mut buffer = vec![0u8; HashingConsts::READ_BUFFER_SIZE];
    while let Ok(path) = path_rx.recv() {
        let outcome = if is_cancelled(&cancel) {
            Err(HashFailure {
                path,
                error: ScanError::Cancelled,
            })
        } else {
            hash_file_with_buffer(&path, &mut buffer).map_err(|error| HashFailure { path, error })
        };
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
}

/// Spawn `num_workers` hash workers. Caller must drop its own outcome sender afterwards so the
/// outcome channel closes when the last worker exits.
pub fn spawn_hash_workers(
    path_rx: Receiver<PathBuf>,
    outcome_tx: &Sender<HashOutcome>,
    num_workers: usize,
    cancel: &Option<Arc<AtomicBool>>,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let path_rx = path_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let cancel = cancel.clone();
            thread::spawn(move || hash_worker_loop(path_rx, outcome_tx, cancel))
        })
        .collect()
}

/// Hash every path in `paths` on a bounded pool. Duplicate input paths are hashed once.
pub fn run_pool<I>(paths: I, opts: &PoolOpts) -> PoolOutcome
where
    I: IntoIterator<Item = PathBuf>,
{
    let unique: HashSet<PathBuf> = paths.into_iter().collect();
    let mut outcome = PoolOutcome::default();
    if unique.is_empty() {
        debug!("Pool: no paths, nothing to hash");
        return outcome;
    }

    let num_workers = cap_workers(opts.workers).min(unique.len());
    debug!("Pool: {} paths on {} workers", unique.len(), num_workers);

    let (path_tx, path_rx) = unbounded::<PathBuf>();
    for path in &unique {
        // Receiver is alive in this scope, so send cannot fail.
        let _ = path_tx.send(path.clone());
    }
    // Closing the path channel is what lets workers exit once it is drained.
    drop(path_tx);

    let (outcome_tx, outcome_rx) = bounded::<HashOutcome>(num_workers * OUTCOMES_PER_WORKER);
    let handles = spawn_hash_workers(path_rx, &outcome_tx, num_workers, &opts.cancel);
    drop(outcome_tx);

    while let Ok(o) = outcome_rx.recv() {
        match o {
            Ok(r) => outcome.results.push(r),
            Err(f) => outcome.failures.push(f),
        }
        if let Some(cb) = opts.on_progress.as_ref() {
            cb(1);
        }
    }
    for h in handles {
        if h.join().is_err() {
            warn!("A hash worker panicked");
        }
    }

    if outcome.accounted() < unique.len() {
        account_lost_paths(unique, &mut outcome);
    }
    debug!(
        "Pool done: {} hashed, {} failed",
        outcome.results.len(),
        outcome.failures.len()
    );
    outcome
}

/// Report every input path without an outcome as [`ScanError::WorkerLost`].
pub fn account_lost_paths(mut unique: HashSet<PathBuf>, outcome: &mut PoolOutcome) {
    for r in &outcome.results {
        unique.remove(&r.path);
    }
    for f in &outcome.failures {
        unique.remove(&f.path);
    }
    warn!("{} paths were lost by a dead worker", unique.len());
    outcome
        .failures
        .extend(unique.into_iter().map(|path| HashFailure {
            path,
            error: ScanError::WorkerLost,
        }));
}
