//! Pipeline components: walk, hashing pool, orchestration.

pub mod orchestrator;
pub mod pool;
pub mod walk;

pub use orchestrator::{ProgressFn, discover_root, run_scan_pipeline};
pub use pool::{HashOutcome, PoolOpts, account_lost_paths, run_pool, spawn_hash_workers};
pub use walk::{
    DiscoveredPaths, WalkContext, WalkOutcome, discover, run_walk_loop, to_outcome_walkdir,
    walk_context,
};
