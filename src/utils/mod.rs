pub mod config;
pub mod dupescan_toml;
pub mod fd_limit;
pub mod logger;
pub mod tempfiles;

pub use config::*;
pub use dupescan_toml::{apply_file_to_opts, load_dupescan_toml};
pub use fd_limit::{cap_workers, max_open_fds, max_workers_by_fd_limit};
pub use logger::{Colors, setup_logging};
pub use tempfiles::{prepare_temp_path, remove_wal_and_shm, rename_temp_to_final, temp_path_for};
