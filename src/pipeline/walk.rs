//! Path discovery: walk the root and collect regular files, recording entries the walk could not read.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::tools::should_include_in_walk;
use crate::error::ScanError;

/// Shared inputs for the walk: canonical root, DB to skip, exclude patterns, strictness.
#[derive(Clone, Debug)]
pub struct WalkContext {
    pub root: PathBuf,
    pub db_canonical: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub strict: bool,
}

/// Regular files found under the root and the entries that were skipped with their error.
#[derive(Debug, Default)]
pub struct DiscoveredPaths {
    pub paths: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// One result from a directory walk.
pub enum WalkOutcome {
    File(PathBuf),
    /// Directory, symlink, socket, ...: walked through but not hashed.
    NotFile,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::NotFile,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Walk `ctx.root` without following symlinks. Excluded directories are pruned, not descended.
pub fn discover(ctx: &WalkContext) -> Result<DiscoveredPaths, ScanError> {
    let root = ctx.root.clone();
    let db_canonical = ctx.db_canonical.clone();
    let exclude = ctx.exclude.clone();
    let iter = WalkDir::new(&ctx.root)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |e| {
            e.depth() == 0 || should_include_in_walk(e.path(), &root, &db_canonical, &exclude)
        })
        .map(to_outcome_walkdir);
    run_walk_loop(ctx, iter)
}

/// Consume `iter` of [`WalkOutcome`]: collect files, record errors (strict → first error aborts).
pub fn run_walk_loop<I>(ctx: &WalkContext, iter: I) -> Result<DiscoveredPaths, ScanError>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut found = DiscoveredPaths::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::File(path) => found.paths.push(path),
            WalkOutcome::NotFile => {}
            WalkOutcome::Err { msg, path } => {
                if ctx.strict {
                    return Err(ScanError::Walk { message: msg });
                }
                let path = path.unwrap_or_else(|| ctx.root.clone());
                warn!("Skipping {}: {}", path.display(), msg);
                found.skipped.push((path, msg));
            }
        }
    }
    debug!(
        "Walk done: {} files, {} skipped under {}",
        found.paths.len(),
        found.skipped.len(),
        ctx.root.display()
    );
    Ok(found)
}

/// Build a [`WalkContext`] for a canonical root.
pub fn walk_context(
    root: &Path,
    db_canonical: Option<PathBuf>,
    exclude: &[String],
    strict: bool,
) -> WalkContext {
    WalkContext {
        root: root.to_path_buf(),
        db_canonical,
        exclude: exclude.to_vec(),
        strict,
    }
}
