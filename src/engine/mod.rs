//! Engine module: hashing, storage, CLI plumbing

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod hashing;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, setup_opts};
pub use db_ops::{
    count_files, load_duplicates, open_db, open_db_in_memory, store_results, store_to_file,
};
pub use hashing::{hash_bytes, hash_file, hash_file_with_buffer, is_hex_digest};
pub use tools::{
    canonicalize_db_path, glob_match, is_db_artifact, is_settings_file, path_to_db_string,
    should_include_in_walk, validate_root,
};
