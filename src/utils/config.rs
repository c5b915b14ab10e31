//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    db_filename: String,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                db_filename: "duplicates.db".to_string(),
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Default result database file name, created inside the scanned directory.
    pub fn db_filename(&self) -> &str {
        &self.db_filename
    }

    /// Per-directory settings file (see [`crate::utils::dupescan_toml`]).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker threads ----

pub struct WorkerConsts;

impl WorkerConsts {
    /// Fixed default for the hashing pool. Hashing is I/O bound; more workers than this rarely help.
    pub const DEFAULT_WORKERS: usize = 10;
}

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Read buffer per worker (bytes). 128 KiB. Memory per file hashed is bounded by this.
    pub const READ_BUFFER_SIZE: usize = 128 * 1024;
    /// Hex digest length for SHA-256.
    pub const DIGEST_HEX_LEN: usize = 64;
}

// ---- Database ----

/// Batch size for DB insert chunks (balance transaction size vs round-trips).
pub const DB_INSERT_BATCH_SIZE: usize = 1000;

/// Width of the separator printed between duplicate groups.
pub const REPORT_SEPARATOR_WIDTH: usize = 65;
