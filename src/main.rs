//! dupescan CLI: scan a directory for duplicate files; use -l to list them.

use anyhow::Result;
use clap::Parser;
use dupescan::engine::arg_parser::Cli;
use dupescan::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
