//! CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn treesync() -> Command {
    Command::cargo_bin("treesync").expect("binary builds")
}

#[test]
fn test_sync_dry_run_prints_plan_and_copies_nothing() {
    let temp = TempDir::new().expect("create temp dir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&src).expect("create src");
    fs::create_dir_all(&dst).expect("create dst");
    fs::write(src.join("a.txt"), b"alpha").expect("write");

    treesync()
        .current_dir(temp.path())
        .args(["sync", "--dry-run"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode: no changes were made."))
        .stdout(predicate::str::contains("a.txt"));

    assert!(!dst.join("a.txt").exists());
}

#[test]
fn test_sync_mirrors_files() {
    let temp = TempDir::new().expect("create temp dir");
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&src).expect("create src");
    fs::create_dir_all(&dst).expect("create dst");
    fs::write(src.join("a.txt"), b"alpha").expect("write");

    treesync()
        .current_dir(temp.path())
        .arg("sync")
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 copied"));

    assert_eq!(fs::read(dst.join("a.txt")).expect("read dest"), b"alpha");
}

#[test]
fn test_sync_missing_source_fails() {
    let temp = TempDir::new().expect("create temp dir");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&dst).expect("create dst");

    treesync()
        .current_dir(temp.path())
        .arg("sync")
        .arg(temp.path().join("no_such_dir"))
        .arg(&dst)
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory does not exist"));
}

#[test]
fn test_compare_reports_differences() {
    let temp = TempDir::new().expect("create temp dir");
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    fs::create_dir_all(&a).expect("create a");
    fs::create_dir_all(&b).expect("create b");
    fs::write(a.join("left.txt"), b"l").expect("write");
    fs::write(b.join("right.txt"), b"r").expect("write");

    treesync()
        .current_dir(temp.path())
        .arg("compare")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Only in first: 1"))
        .stdout(predicate::str::contains("Only in second: 1"));
}

#[test]
fn test_clear_state_removes_file() {
    let temp = TempDir::new().expect("create temp dir");
    let state = temp.path().join("state.json");
    fs::write(&state, r#"{"completed_files":[],"timestamp":"x"}"#).expect("write state");

    treesync()
        .current_dir(temp.path())
        .args(["clear-state", "--state-file"])
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resume state cleared"));

    assert!(!state.exists());
}
