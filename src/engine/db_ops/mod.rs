//! Database operations: schema, open, store results, duplicate queries.

mod connection;
mod store;

pub use connection::{open_db, open_db_in_memory};
pub use store::{count_files, load_duplicates, store_results, store_to_file};

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Insert statement for the files table.
pub(crate) const INSERT_FILE_SQL: &str = "INSERT INTO files (filepath, sha256sum) VALUES (?1, ?2)";

/// Schema for the files table. Idempotent.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filepath VARCHAR(256) NOT NULL,
    sha256sum VARCHAR(64) NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_files_sha256sum ON files(sha256sum);
"#;

/// Drops the previous scan. Run before re-applying [`SCHEMA`].
pub(crate) const DROP_FILES_SQL: &str = "DROP TABLE IF EXISTS files;";
