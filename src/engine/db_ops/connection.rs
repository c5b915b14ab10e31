//! Open the result database.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::error::ScanError;

use super::{SCHEMA, WAL_PRAGMAS};

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(ScanError::from)
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS)
        .map_err(ScanError::from)
        .context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA)
        .map_err(ScanError::from)
        .context("create schema")?;
    Ok(())
}

/// Open or create the result DB and ensure schema + WAL.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .map_err(ScanError::from)
        .with_context(|| format!("open database {}", path.display()))?;
    apply_wal_and_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory DB with the same schema (ephemeral mode; no WAL pragmas needed).
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(ScanError::from)
        .context("open in-memory database")?;
    conn.execute_batch(SCHEMA)
        .map_err(ScanError::from)
        .context("create schema")?;
    Ok(conn)
}
