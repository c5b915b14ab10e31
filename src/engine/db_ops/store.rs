//! Store one scan's results and answer duplicate queries.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, Statement};
use std::path::{Path, PathBuf};

use crate::engine::hashing::is_hex_digest;
use crate::engine::tools::path_to_db_string;
use crate::error::ScanError;
use crate::utils::config::DB_INSERT_BATCH_SIZE;
use crate::utils::{prepare_temp_path, rename_temp_to_final};
use crate::{DuplicateGroup, HashResult, ScanCounts};

use super::{DROP_FILES_SQL, INSERT_FILE_SQL, SCHEMA, open_db};

const DUPLICATE_DIGESTS_SQL: &str = "SELECT sha256sum FROM files GROUP BY sha256sum \
     HAVING COUNT(*) > 1 ORDER BY sha256sum";

const PATHS_FOR_DIGEST_SQL: &str =
    "SELECT filepath FROM files WHERE sha256sum = ?1 ORDER BY filepath";

/// Execute one insert for a result (used by flush_batch).
fn execute_insert_result(stmt: &mut Statement<'_>, r: &HashResult) -> Result<()> {
    debug_assert!(is_hex_digest(&r.digest), "malformed digest {}", r.digest);
    stmt.execute((path_to_db_string(&r.path).as_str(), r.digest.as_str()))
        .map_err(ScanError::from)
        .with_context(|| format!("insert {}", r.path.display()))?;
    Ok(())
}

/// Insert a batch of results in a single transaction. Returns batch length.
fn flush_batch(conn: &mut Connection, batch: &[HashResult]) -> Result<usize> {
    let tx = conn
        .transaction()
        .map_err(ScanError::from)
        .context("begin transaction")?;
    {
        let mut stmt = tx
            .prepare(INSERT_FILE_SQL)
            .map_err(ScanError::from)
            .context("prepare insert")?;
        for r in batch {
            execute_insert_result(&mut stmt, r)?;
        }
    }
    tx.commit()
        .map_err(ScanError::from)
        .context("commit transaction")?;
    Ok(batch.len())
}

/// Replace the stored scan with `results`: drop and recreate the files table, then insert in
/// batches of [`DB_INSERT_BATCH_SIZE`]. Returns the number of rows written.
pub fn store_results(conn: &mut Connection, results: &[HashResult]) -> Result<usize> {
    conn.execute_batch(DROP_FILES_SQL)
        .map_err(ScanError::from)
        .context("drop previous results")?;
    conn.execute_batch(SCHEMA)
        .map_err(ScanError::from)
        .context("create schema")?;
    let mut written = 0_usize;
    for chunk in results.chunks(DB_INSERT_BATCH_SIZE) {
        written += flush_batch(conn, chunk)?;
    }
    debug!("Stored {} results", written);
    Ok(written)
}

/// Write `results` to a new database at `db_path`. The DB is built under `<db>.tmp` and renamed
/// into place on success, so a failure never leaves a half-written database behind.
pub fn store_to_file(db_path: &Path, results: &[HashResult]) -> Result<usize> {
    let temp_path = prepare_temp_path(db_path)?;
    let written = {
        let mut conn = open_db(&temp_path)?;
        let written = store_results(&mut conn, results)?;
        conn.close()
            .map_err(|(_, e)| ScanError::from(e))
            .context("close temp database")?;
        written
    };
    rename_temp_to_final(&temp_path, db_path)?;
    debug!("Wrote {} results to {}", written, db_path.display());
    Ok(written)
}

/// Digests that occur on two or more paths, ordered by digest; each group's paths are sorted.
pub fn load_duplicates(conn: &Connection) -> Result<Vec<DuplicateGroup>> {
    let digests: Vec<String> = {
        let mut stmt = conn
            .prepare(DUPLICATE_DIGESTS_SQL)
            .map_err(ScanError::from)
            .context("prepare duplicate query")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(ScanError::from)
            .context("query duplicate digests")?;
        rows.collect::<rusqlite::Result<Vec<String>>>()
            .map_err(ScanError::from)
            .context("read duplicate digests")?
    };

    let mut stmt = conn
        .prepare(PATHS_FOR_DIGEST_SQL)
        .map_err(ScanError::from)
        .context("prepare path query")?;
    let mut groups = Vec::with_capacity(digests.len());
    for digest in digests {
        let paths = stmt
            .query_map([digest.as_str()], |row| row.get::<_, String>(0))
            .map_err(ScanError::from)
            .context("query paths for digest")?
            .map(|r| r.map(PathBuf::from))
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(ScanError::from)
            .context("read paths for digest")?;
        groups.push(DuplicateGroup { digest, paths });
    }
    Ok(groups)
}

/// Total stored files and number of digests shared by two or more files.
pub fn count_files(conn: &Connection) -> Result<ScanCounts> {
    let total: i64 = conn
        .query_row("SELECT COUNT(id) FROM files", [], |row| row.get(0))
        .map_err(ScanError::from)
        .context("count files")?;
    let duplicates: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM (SELECT sha256sum FROM files GROUP BY sha256sum HAVING COUNT(*) > 1)",
            [],
            |row| row.get(0),
        )
        .map_err(ScanError::from)
        .context("count duplicate digests")?;
    Ok(ScanCounts {
        total_files: total.max(0) as usize,
        duplicate_digests: duplicates.max(0) as usize,
    })
}
