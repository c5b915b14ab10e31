//! Load `.dupescan.toml` from the scanned directory (CLI only). Lib callers pass [`ScanOpts`](crate::ScanOpts) directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DupescanToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    db_path: Option<String>,
    workers: Option<usize>,
    exclude: Option<Vec<String>>,
    list: Option<bool>,
    verbose: Option<bool>,
    strict: Option<bool>,
}

/// Parse settings from a TOML string.
pub fn parse_dupescan_toml(s: &str) -> Result<DupescanToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load `.dupescan.toml` from `dir`. `Ok(None)` when there is no such file; an unreadable or
/// malformed file is an error so a typo never silently falls back to defaults.
pub fn load_dupescan_toml(dir: &Path) -> Result<Option<DupescanToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let file =
        parse_dupescan_toml(&s).with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
/// force and temp are never read from the file. A relative `db_path` is taken relative to `dir`,
/// the directory the file was loaded from.
pub fn apply_file_to_opts(file: &DupescanToml, dir: &Path, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.db_path {
        opts.db_path = Some(dir.join(p));
    }
    apply_file_opt!(s, opts, workers => workers);
    if let Some(ref v) = s.exclude {
        opts.exclude = v.clone();
    }
    apply_file_opt!(s, opts, list => list);
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, strict => strict);
}
