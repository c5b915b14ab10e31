use clap::Parser;
use dupescan::engine::{
    Cli, count_files, glob_match, is_db_artifact, is_settings_file, load_duplicates,
    open_db_in_memory, path_to_db_string, setup_opts, should_include_in_walk, store_results,
    validate_root,
};
use dupescan::pipeline::{discover_root, run_walk_loop, walk_context, WalkOutcome};
use dupescan::report::{format_duplicate_count, format_duplicates, format_summary};
use dupescan::scan::{Mode, list_stored, resolve_db_path, scan_and_store, select_mode};
use dupescan::utils::dupescan_toml::{apply_file_to_opts, load_dupescan_toml, parse_dupescan_toml};
use dupescan::{DuplicateGroup, Opts, ScanCounts, ScanError, ScanOpts, scan_dir};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

const SHA256_HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// root/a.txt = "hello", root/b.txt = "hello", root/c.txt = "world"
fn hello_world_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "world").unwrap();
    dir
}

fn sorted(mut v: Vec<PathBuf>) -> Vec<PathBuf> {
    v.sort();
    v
}

// --- glob_match ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("node_modules", "node_modules"));
    assert!(!glob_match("node_modules", "node_module"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("node_*", "node_modules"));
    assert!(glob_match("*", ""));
    assert!(glob_match("a*b*c", "aXXbYYc"));
    assert!(!glob_match("a*b*c", "aXXbYY"));
}

#[test]
fn test_glob_match_question_mark() {
    assert!(glob_match("file?.txt", "file1.txt"));
    assert!(!glob_match("file?.txt", "file10.txt"));
}

// --- path helpers ---

#[test]
fn test_path_to_db_string_normalizes_backslashes() {
    assert_eq!(path_to_db_string(Path::new("src\\main.rs")), "src/main.rs");
    assert_eq!(path_to_db_string(Path::new("/a/b")), "/a/b");
}

#[test]
fn test_is_db_artifact() {
    let db = Some(PathBuf::from("/r/duplicates.db"));
    assert!(is_db_artifact(Path::new("/r/duplicates.db"), &db));
    assert!(is_db_artifact(Path::new("/r/duplicates.db-wal"), &db));
    assert!(is_db_artifact(Path::new("/r/duplicates.db-shm"), &db));
    assert!(is_db_artifact(Path::new("/r/duplicates.db-journal"), &db));
    assert!(is_db_artifact(Path::new("/r/duplicates.db.tmp"), &db));
    assert!(!is_db_artifact(Path::new("/r/duplicates.dbx"), &db));
    assert!(!is_db_artifact(Path::new("/r/sub/duplicates.db"), &db));
    assert!(!is_db_artifact(Path::new("/r/duplicates.db"), &None));
}

#[test]
fn test_should_include_root_excluded() {
    let root = PathBuf::from("/foo");
    assert!(!should_include_in_walk(&root, &root, &None, &[]));
}

#[test]
fn test_should_include_exclude_patterns() {
    let root = PathBuf::from("/foo");
    let excl = ["*.log".to_string(), "node_modules".to_string()];
    assert!(!should_include_in_walk(Path::new("/foo/bar/baz.log"), &root, &None, &excl));
    assert!(!should_include_in_walk(Path::new("/foo/node_modules"), &root, &None, &excl));
    assert!(should_include_in_walk(Path::new("/foo/bar/baz.txt"), &root, &None, &excl));
}

// --- validate_root ---

#[test]
fn test_validate_root_missing() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        validate_root(&missing),
        Err(ScanError::InvalidRoot { .. })
    ));
}

#[test]
fn test_validate_root_file_is_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f");
    fs::write(&file, "x").unwrap();
    match validate_root(&file) {
        Err(ScanError::InvalidRoot { path, reason }) => {
            assert_eq!(path, file);
            assert!(reason.contains("not a directory"));
        }
        other => panic!("expected InvalidRoot, got {:?}", other),
    }
}

#[test]
fn test_validate_root_canonicalizes() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let dotted = dir.path().join("sub").join("..");
    let root = validate_root(&dotted).unwrap();
    assert_eq!(root, dir.path().canonicalize().unwrap());
}

#[test]
fn test_scan_dir_invalid_root_is_downcastable() {
    let dir = TempDir::new().unwrap();
    let err = scan_dir(&dir.path().join("missing"), &ScanOpts::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::InvalidRoot { .. })
    ));
}

// --- discovery ---

#[test]
fn test_discover_nested_regular_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
    fs::write(dir.path().join("top.txt"), "1").unwrap();
    fs::write(dir.path().join("a/b/c/deep.txt"), "2").unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();

    let (root, found) = discover_root(dir.path(), &ScanOpts::default()).unwrap();
    assert_eq!(
        sorted(found.paths),
        vec![root.join("a/b/c/deep.txt"), root.join("top.txt")]
    );
    assert!(found.skipped.is_empty());
}

#[test]
fn test_discover_skips_db_and_sidecars() {
    let dir = hello_world_tree();
    for name in ["duplicates.db", "duplicates.db-wal", "duplicates.db.tmp"] {
        fs::write(dir.path().join(name), "db bytes").unwrap();
    }
    let opts = ScanOpts {
        db_path: Some(dir.path().join("duplicates.db")),
        ..ScanOpts::default()
    };
    let (_, found) = discover_root(dir.path(), &opts).unwrap();
    assert_eq!(found.paths.len(), 3);
}

#[test]
fn test_discover_skips_root_settings_file() {
    let dir = hello_world_tree();
    fs::write(dir.path().join(".dupescan.toml"), "[settings]\nworkers = 2\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/.dupescan.toml"), "not the root one").unwrap();

    let (root, found) = discover_root(dir.path(), &ScanOpts::default()).unwrap();
    assert!(is_settings_file(&root.join(".dupescan.toml"), &root));
    assert!(!is_settings_file(&root.join("sub/.dupescan.toml"), &root));
    assert_eq!(found.paths.len(), 4);
    assert!(!found.paths.contains(&root.join(".dupescan.toml")));
    assert!(found.paths.contains(&root.join("sub/.dupescan.toml")));
}

#[test]
fn test_discover_prunes_excluded_directories() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    fs::write(dir.path().join("node_modules/lib.js"), "x").unwrap();
    fs::write(dir.path().join("keep.js"), "x").unwrap();
    fs::write(dir.path().join("debug.log"), "x").unwrap();

    let opts = ScanOpts {
        exclude: vec!["node_modules".to_string(), "*.log".to_string()],
        ..ScanOpts::default()
    };
    let (root, found) = discover_root(dir.path(), &opts).unwrap();
    assert_eq!(found.paths, vec![root.join("keep.js")]);
}

#[cfg(unix)]
#[test]
fn test_discover_ignores_symlinks() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("real.txt"), "x").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let (root, found) = discover_root(dir.path(), &ScanOpts::default()).unwrap();
    assert_eq!(found.paths, vec![root.join("real.txt")]);
}

#[test]
fn test_walk_loop_records_errors_unless_strict() {
    let outcomes = || {
        vec![
            WalkOutcome::File(PathBuf::from("/r/a")),
            WalkOutcome::Err {
                msg: "permission denied".to_string(),
                path: Some(PathBuf::from("/r/locked")),
            },
            WalkOutcome::NotFile,
            WalkOutcome::File(PathBuf::from("/r/b")),
        ]
        .into_iter()
    };

    let lenient = walk_context(Path::new("/r"), None, &[], false);
    let found = run_walk_loop(&lenient, outcomes()).unwrap();
    assert_eq!(found.paths.len(), 2);
    assert_eq!(
        found.skipped,
        vec![(PathBuf::from("/r/locked"), "permission denied".to_string())]
    );

    let strict = walk_context(Path::new("/r"), None, &[], true);
    assert!(matches!(
        run_walk_loop(&strict, outcomes()),
        Err(ScanError::Walk { .. })
    ));
}

// --- end to end ---

#[test]
fn test_scan_dir_hello_world_scenario() {
    let dir = hello_world_tree();
    let session = scan_dir(dir.path(), &ScanOpts::default()).unwrap();
    assert_eq!(session.discovered.len(), 3);
    assert_eq!(session.results.len(), 3);
    assert!(session.failures.is_empty());
    assert!(!session.cancelled);

    let digest_of = |name: &str| {
        session
            .results
            .iter()
            .find(|r| r.path == session.root.join(name))
            .map(|r| r.digest.clone())
            .unwrap()
    };
    assert_eq!(digest_of("a.txt"), SHA256_HELLO);
    assert_eq!(digest_of("b.txt"), SHA256_HELLO);
    assert_ne!(digest_of("c.txt"), SHA256_HELLO);

    let mut conn = open_db_in_memory().unwrap();
    store_results(&mut conn, &session.results).unwrap();
    assert_eq!(
        count_files(&conn).unwrap(),
        ScanCounts {
            total_files: 3,
            duplicate_digests: 1
        }
    );
    let groups = load_duplicates(&conn).unwrap();
    assert_eq!(
        groups,
        vec![DuplicateGroup {
            digest: SHA256_HELLO.to_string(),
            paths: vec![session.root.join("a.txt"), session.root.join("b.txt")],
        }]
    );
}

#[test]
fn test_scan_dir_empty_directory() {
    let dir = TempDir::new().unwrap();
    let session = scan_dir(dir.path(), &ScanOpts::default()).unwrap();
    assert!(session.discovered.is_empty());
    assert!(session.results.is_empty());
    assert!(session.failures.is_empty());
}

#[test]
fn test_scan_dir_cancelled_accounts_every_file() {
    let dir = hello_world_tree();
    let opts = ScanOpts {
        cancel: Some(Arc::new(AtomicBool::new(true))),
        ..ScanOpts::default()
    };
    let session = scan_dir(dir.path(), &opts).unwrap();
    assert!(session.cancelled);
    assert_eq!(session.results.len() + session.failures.len(), 3);
}

#[test]
fn test_scan_and_store_to_file_then_list_and_force_rescan() {
    let dir = hello_world_tree();
    let root = validate_root(dir.path()).unwrap();
    let opts = Opts {
        list: true,
        ..Opts::default()
    };
    let db_path = resolve_db_path(&root, &opts);
    assert_eq!(db_path, root.join("duplicates.db"));

    let summary = scan_and_store(&root, &db_path, &opts, None).unwrap();
    assert_eq!(summary.counts.total_files, 3);
    assert_eq!(summary.counts.duplicate_digests, 1);
    assert_eq!(summary.duplicates.as_ref().map(|g| g.len()), Some(1));
    assert!(db_path.is_file());

    let (counts, groups) = list_stored(&db_path).unwrap();
    assert_eq!(counts, summary.counts);
    assert_eq!(groups[0].paths.len(), 2);

    // The database now lives inside the root; a rescan must not hash it.
    let force = Opts {
        force: true,
        ..Opts::default()
    };
    let summary = scan_and_store(&root, &db_path, &force, None).unwrap();
    assert_eq!(summary.counts.total_files, 3);
    assert!(summary.duplicates.is_none());
}

#[test]
fn test_scan_and_store_temp_leaves_nothing_on_disk() {
    let dir = hello_world_tree();
    let root = validate_root(dir.path()).unwrap();
    let opts = Opts {
        temp: true,
        ..Opts::default()
    };
    let db_path = resolve_db_path(&root, &opts);
    let summary = scan_and_store(&root, &db_path, &opts, None).unwrap();
    assert_eq!(summary.counts.total_files, 3);
    assert_eq!(summary.duplicates.map(|g| g.len()), Some(1));
    assert!(!db_path.exists());
}

#[test]
fn test_scan_and_store_cancelled_is_not_stored() {
    let dir = hello_world_tree();
    let root = validate_root(dir.path()).unwrap();
    let opts = Opts::default();
    let db_path = resolve_db_path(&root, &opts);
    let cancel = Some(Arc::new(AtomicBool::new(true)));
    assert!(scan_and_store(&root, &db_path, &opts, cancel).is_err());
    assert!(!db_path.exists());
}

// --- mode selection ---

#[test]
fn test_select_mode() {
    let base = Opts::default();
    assert_eq!(select_mode(&base, false), Mode::Help);
    assert_eq!(select_mode(&base, true), Mode::Help);

    let list = Opts {
        list: true,
        ..Opts::default()
    };
    assert_eq!(select_mode(&list, false), Mode::Scan);
    assert_eq!(select_mode(&list, true), Mode::ListStored);

    let force = Opts {
        force: true,
        ..Opts::default()
    };
    assert_eq!(select_mode(&force, true), Mode::Scan);

    let temp = Opts {
        temp: true,
        list: true,
        ..Opts::default()
    };
    assert_eq!(select_mode(&temp, true), Mode::Scan);
}

// --- config file ---

#[test]
fn test_toml_settings_applied() {
    let file = parse_dupescan_toml(
        r#"
        [settings]
        workers = 4
        exclude = ["*.iso"]
        strict = true
        db_path = "/tmp/dupes.db"
        "#,
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, Path::new("/scan"), &mut opts);
    assert_eq!(opts.workers, 4);
    assert_eq!(opts.exclude, vec!["*.iso".to_string()]);
    assert!(opts.strict);
    assert!(!opts.list);
    assert_eq!(opts.db_path, Some(PathBuf::from("/tmp/dupes.db")));
}

#[test]
fn test_toml_empty_keeps_defaults() {
    let file = parse_dupescan_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, Path::new("/scan"), &mut opts);
    assert_eq!(opts.workers, 10);
    assert!(opts.db_path.is_none());
}

#[test]
fn test_toml_relative_db_path_is_under_settings_dir() {
    let file = parse_dupescan_toml("[settings]\ndb_path = \"dups.db\"\n").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, Path::new("/scan/root"), &mut opts);
    assert_eq!(opts.db_path, Some(PathBuf::from("/scan/root/dups.db")));
}

#[test]
fn test_load_toml_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    assert!(load_dupescan_toml(dir.path()).unwrap().is_none());
}

#[test]
fn test_malformed_toml_is_reported() {
    let dir = hello_world_tree();
    fs::write(dir.path().join(".dupescan.toml"), "settings = [[[broken").unwrap();
    assert!(load_dupescan_toml(dir.path()).is_err());

    let cli = Cli::parse_from(["dupescan", dir.path().to_str().unwrap(), "-t"]);
    let err = setup_opts(&cli, dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains(".dupescan.toml"));
}

#[test]
fn test_cli_flags_override_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".dupescan.toml"),
        r#"
        [settings]
        workers = 4
        exclude = ["*.iso"]
        list = true
        strict = true
        db_path = "from_file.db"
        "#,
    )
    .unwrap();
    let root = dir.path().to_str().unwrap();

    let cli = Cli::parse_from(["dupescan", root, "-w", "7", "-l", "false", "-e", "*.txt"]);
    let opts = setup_opts(&cli, dir.path()).unwrap();
    assert_eq!(opts.workers, 7);
    assert!(!opts.list);
    assert_eq!(opts.exclude, vec!["*.txt".to_string()]);
    // Not given on the command line: file values stay.
    assert!(opts.strict);
    assert_eq!(opts.db_path, Some(dir.path().join("from_file.db")));
    assert!(!opts.force);
    assert!(!opts.temp);

    let cli = Cli::parse_from(["dupescan", root, "-f"]);
    let opts = setup_opts(&cli, dir.path()).unwrap();
    assert_eq!(opts.workers, 4);
    assert!(opts.list);
    assert_eq!(opts.exclude, vec!["*.iso".to_string()]);
    assert!(opts.force);
}

// --- report ---

#[test]
fn test_format_summary() {
    let counts = ScanCounts {
        total_files: 3,
        duplicate_digests: 1,
    };
    assert_eq!(
        format_summary(&counts, true),
        "Scanned [3] files for duplicates."
    );
    assert_eq!(
        format_summary(&counts, false),
        "Scanned [3] files for duplicates, use [-l] to list results"
    );
    assert!(format_duplicate_count(&counts).contains("[1]"));
}

#[test]
fn test_format_duplicates_lists_every_path() {
    let groups = vec![DuplicateGroup {
        digest: SHA256_HELLO.to_string(),
        paths: vec![PathBuf::from("/r/a.txt"), PathBuf::from("/r/b.txt")],
    }];
    let out = format_duplicates(&groups);
    assert!(out.contains(SHA256_HELLO));
    assert!(out.contains("occurrences:"));
    assert!(out.lines().any(|l| l == "/r/a.txt"));
    assert!(out.lines().any(|l| l == "/r/b.txt"));
    assert!(format_duplicates(&[]).is_empty());
}
