//! User-facing output: scan summary, duplicate groups, failure list.

use colored::Colorize;
use log::warn;
use std::fmt::Write;
use std::path::PathBuf;

use crate::utils::Colors;
use crate::utils::config::REPORT_SEPARATOR_WIDTH;
use crate::{DuplicateGroup, HashFailure, ScanCounts};

/// `Scanned [N] files for duplicates.`, with a hint about `-l` when not listing.
pub fn format_summary(counts: &ScanCounts, listing: bool) -> String {
    let scanned = format!("Scanned [{}] files for duplicates", counts.total_files);
    if listing {
        format!("{scanned}.")
    } else {
        format!("{scanned}, use [-l] to list results")
    }
}

/// One block per group: separator, header with digest and count, then each path.
pub fn format_duplicates(groups: &[DuplicateGroup]) -> String {
    let separator = "-".repeat(REPORT_SEPARATOR_WIDTH);
    let mut out = String::new();
    for g in groups {
        let _ = writeln!(out, "{separator}");
        let _ = writeln!(
            out,
            "The file with hash [{}] has [{}] occurrences:",
            Colors::colorize(Colors::DIGEST, &g.digest),
            Colors::colorize(Colors::COUNT, &g.paths.len().to_string())
        );
        for p in &g.paths {
            let _ = writeln!(out, "{}", p.display());
        }
    }
    out
}

pub fn format_duplicate_count(counts: &ScanCounts) -> String {
    format!(
        "Found [{}] hashes shared by more than one file.",
        counts.duplicate_digests
    )
}

/// Print summary, optional duplicate listing and the duplicate digest count to stdout.
pub fn print_report(counts: &ScanCounts, duplicates: Option<&[DuplicateGroup]>) {
    println!("{}", format_summary(counts, duplicates.is_some()));
    if let Some(groups) = duplicates {
        print!("{}", format_duplicates(groups));
    }
    println!("{}", format_duplicate_count(counts));
}

/// Files that could not be hashed. Written to stderr so the summary stays machine-readable.
pub fn print_failures(failures: &[HashFailure]) {
    if failures.is_empty() {
        return;
    }
    warn!("Failed to hash {} files", failures.len());
    let mut sorted: Vec<&HashFailure> = failures.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));
    for f in sorted {
        eprintln!(
            "  {} {}: {}",
            "failed:".color(Colors::FAILURE),
            f.path.display(),
            f.error
        );
    }
}

/// Entries the walk could not read. Listed individually only when verbose.
pub fn print_skipped(skipped: &[(PathBuf, String)], verbose: bool) {
    if skipped.is_empty() {
        return;
    }
    warn!(
        "Skipped {} paths due to permission errors or access issues",
        skipped.len()
    );
    if verbose {
        for (p, msg) in skipped {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}
