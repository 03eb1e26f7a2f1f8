//! Tests for the resume ledger and its interaction with planning

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use treesync::config::SyncOptions;
use treesync::diff::plan_sync;
use treesync::filter::PathFilter;
use treesync::scanner::scan_tree;
use treesync::state::{ResumeLedger, STATE_FILE};
use treesync::stats::SyncStats;
use treesync::types::ScanResult;

fn scan(root: &Path) -> ScanResult {
    let stats = SyncStats::new();
    scan_tree(root, &PathFilter::default(), &stats, None).expect("scan should succeed")
}

#[test]
fn test_ledger_persists_across_instances() {
    let temp = TempDir::new().expect("create temp dir");
    let state_path = temp.path().join(STATE_FILE);

    let first = ResumeLedger::new(&state_path);
    first.mark_completed("docs/a.txt");
    first.mark_completed("docs/b.txt");
    first.save().expect("save state");

    let second = ResumeLedger::load(&state_path);
    assert_eq!(second.len(), 2);
    assert!(second.is_completed("docs/a.txt"));
    assert!(second.is_completed("docs/b.txt"));
}

#[test]
fn test_state_file_is_json_with_sorted_paths_and_timestamp() {
    let temp = TempDir::new().expect("create temp dir");
    let state_path = temp.path().join(STATE_FILE);

    let ledger = ResumeLedger::new(&state_path);
    ledger.mark_completed("z.txt");
    ledger.mark_completed("a.txt");
    ledger.save().expect("save state");

    let raw = fs::read_to_string(&state_path).expect("read state");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("state is valid json");

    let files: Vec<&str> = parsed["completed_files"]
        .as_array()
        .expect("completed_files array")
        .iter()
        .map(|v| v.as_str().expect("string entry"))
        .collect();
    assert_eq!(files, vec!["a.txt", "z.txt"]);

    let ts = parsed["timestamp"].as_str().expect("timestamp string");
    chrono::DateTime::parse_from_rfc3339(ts).expect("timestamp parses as ISO-8601");
}

#[test]
fn test_corrupt_state_is_tolerated() {
    let temp = TempDir::new().expect("create temp dir");
    let state_path = temp.path().join(STATE_FILE);
    fs::write(&state_path, b"\x00garbage\xff").expect("write garbage");

    let ledger = ResumeLedger::load(&state_path);
    assert!(ledger.is_empty());

    // and the next save replaces the garbage with valid state
    ledger.mark_completed("fresh.txt");
    ledger.save().expect("save over garbage");
    let reloaded = ResumeLedger::load(&state_path);
    assert!(reloaded.is_completed("fresh.txt"));
}

#[test]
fn test_clear_resets_state() {
    let temp = TempDir::new().expect("create temp dir");
    let state_path = temp.path().join(STATE_FILE);

    let ledger = ResumeLedger::new(&state_path);
    ledger.mark_completed("a.txt");
    ledger.save().expect("save state");

    ledger.clear().expect("clear state");
    assert!(!state_path.exists());
    assert!(ResumeLedger::load(&state_path).is_empty());
}

#[test]
fn test_completed_entry_skips_copy_even_when_destination_lost() {
    // The ledger is trusted over a fresh scan of the destination. Deleting
    // a destination file after it was recorded as completed does NOT get it
    // re-copied; that requires clearing the state first.
    let temp = TempDir::new().expect("create temp dir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&src).expect("create src");
    fs::create_dir_all(&dst).expect("create dst");
    fs::write(src.join("a.txt"), b"payload").expect("write");

    let ledger = ResumeLedger::new(temp.path().join(STATE_FILE));
    ledger.mark_completed("a.txt");

    let stats = SyncStats::new();
    let plan = plan_sync(
        &scan(&src),
        &scan(&dst),
        Some(&ledger),
        &SyncOptions::default(),
        &stats,
    );
    assert!(plan.is_empty(), "ledger entry must win over the rescan");
    assert_eq!(stats.summary().skipped, 1);

    // with the state cleared, the same trees produce a copy task again
    ledger.clear().expect("clear state");
    let stats = SyncStats::new();
    let plan = plan_sync(
        &scan(&src),
        &scan(&dst),
        Some(&ledger),
        &SyncOptions::default(),
        &stats,
    );
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].relative_path, "a.txt");
}

#[test]
fn test_resume_disabled_ignores_ledger() {
    let temp = TempDir::new().expect("create temp dir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&src).expect("create src");
    fs::create_dir_all(&dst).expect("create dst");
    fs::write(src.join("a.txt"), b"payload").expect("write");

    // passing no ledger is how resume=false is wired through
    let stats = SyncStats::new();
    let plan = plan_sync(&scan(&src), &scan(&dst), None, &SyncOptions::default(), &stats);
    assert_eq!(plan.len(), 1);
}
