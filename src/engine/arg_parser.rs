use clap::Parser;
use std::path::PathBuf;

/// Find duplicate files by content. Results are stored in a SQLite database.
#[derive(Clone, Parser)]
#[command(name = "dupescan")]
#[command(
    about = "Check for duplicates in the specified dir, results are stored in a sqlite3 database"
)]
pub struct Cli {
    /// Directory to scan.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Drop the database if it exists and perform a re-scan.
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Show the results (performs a scan if no database is found).
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub list: Option<bool>,

    /// Use a temporary in-memory database; nothing is left on disk.
    #[arg(long, short = 't')]
    pub temp: bool,

    /// Path to the result database. Default: `duplicates.db` in DIR.
    #[arg(long, short = 'd')]
    pub db: Option<PathBuf>,

    /// Number of hashing workers. Default: 10.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Verbose output (debug logging and a progress bar).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Strict mode: fail on the first unreadable directory instead of skipping it.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,
}
