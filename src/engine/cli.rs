//! CLI command handler: validate the root, then scan, list stored results, or print help.

use anyhow::{Context, Result};
use clap::CommandFactory;
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::tools::validate_root;
use crate::report::{print_failures, print_report, print_skipped};
use crate::scan::{Mode, list_stored, resolve_db_path, scan_and_store, select_mode};
use crate::utils::{apply_file_to_opts, load_dupescan_toml, setup_logging};

/// Build Opts: defaults, then `.dupescan.toml` in the root, then explicit CLI flags.
pub fn setup_opts(cli: &Cli, root: &Path) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = load_dupescan_toml(root)? {
        apply_file_to_opts(&file, root, &mut opts);
    }
    if let Some(db) = cli.db.clone() {
        opts.db_path = Some(db);
    }
    if let Some(workers) = cli.workers {
        opts.workers = workers;
    }
    if !cli.exclude.is_empty() {
        opts.exclude = cli.exclude.clone();
    }
    if let Some(v) = cli.list {
        opts.list = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.strict {
        opts.strict = v;
    }
    opts.force = cli.force;
    opts.temp = cli.temp;
    Ok(opts)
}

/// Install a Ctrl+C handler that asks the pool to stop hashing.
fn install_cancel_handler() -> Result<Arc<AtomicBool>> {
    let cancel_requested = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    Ok(cancel_requested)
}

/// Run the mode selected by the flags. The root is validated before anything else.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let root = validate_root(&cli.dir)?;
    let opts = setup_opts(cli, &root)?;
    setup_logging(opts.verbose);
    debug!("{:#?}", opts);

    let db_path = resolve_db_path(&root, &opts);
    match select_mode(&opts, db_path.is_file()) {
        Mode::Scan => {
            if opts.force && db_path.is_file() {
                warn!("Replacing existing results in {}", db_path.display());
            }
            let cancel = install_cancel_handler()?;
            let summary = scan_and_store(&root, &db_path, &opts, Some(cancel))?;
            print_skipped(&summary.session.skipped, opts.verbose);
            print_report(&summary.counts, summary.duplicates.as_deref());
            print_failures(&summary.session.failures);
        }
        Mode::ListStored => {
            debug!("Reading stored results from {}", db_path.display());
            let (counts, groups) = list_stored(&db_path)?;
            print_report(&counts, Some(&groups));
        }
        Mode::Help => {
            Cli::command().print_help().context("print help")?;
        }
    }
    Ok(())
}
