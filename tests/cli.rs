use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt as _;
use std::os::unix::fs::symlink;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;

fn cmd() -> Command {
    Command::cargo_bin("delink").unwrap()
}

fn layout() -> tempfile::TempDir {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("site")).unwrap();
    std::fs::write(root.join("src/core.py"), b"X = 1\n").unwrap();
    std::fs::write(root.join("src/notes.txt"), b"notes\n").unwrap();
    symlink("../src/core.py", root.join("site/core.py")).unwrap();
    symlink("../src/notes.txt", root.join("site/notes.py")).unwrap();
    td
}

fn is_symlink(p: &std::path::Path) -> bool {
    std::fs::symlink_metadata(p).unwrap().file_type().is_symlink()
}

#[test]
fn dry_run_reports_without_changes() {
    let td = layout();
    cmd()
        .arg("--dry-run")
        .arg(td.path())
        .assert()
        .success()
        .stdout(contains("Would replace:"))
        .stdout(contains("Symlinks would be replaced: 1"))
        .stdout(contains("unrecognized suffix: 1"));
    assert!(is_symlink(&td.path().join("site/core.py")));
}

#[test]
fn yes_replaces_without_prompting() {
    let td = layout();
    cmd()
        .args(["-y"])
        .arg(td.path())
        .assert()
        .success()
        .stdout(contains("Replaced:"))
        .stdout(contains("Symlinks replaced: 1"))
        .stderr(contains("Continue?").not());
    assert!(!is_symlink(&td.path().join("site/core.py")));
    assert!(is_symlink(&td.path().join("site/notes.py")));
}

#[test]
fn declining_the_prompt_cancels() {
    let td = layout();
    cmd()
        .arg(td.path())
        .write_stdin("n\n")
        .assert()
        .code(0)
        .stderr(contains("Continue? [y/N]"))
        .stdout(contains("Operation cancelled."));
    assert!(is_symlink(&td.path().join("site/core.py")));
}

#[test]
fn accepting_the_prompt_replaces() {
    let td = layout();
    cmd()
        .arg(td.path())
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Symlinks replaced: 1"));
    assert!(!is_symlink(&td.path().join("site/core.py")));
}

#[test]
fn missing_directory_is_fatal() {
    let td = tempfile::tempdir().unwrap();
    cmd()
        .arg(td.path().join("absent"))
        .assert()
        .code(1)
        .stdout(contains("Error: invalid root"));
}

#[test]
fn missing_argument_is_a_usage_error() {
    cmd().assert().code(64).stderr(contains("Usage"));
}

#[test]
fn json_report_is_machine_readable() {
    let td = layout();
    let out = cmd()
        .args(["--json", "--dry-run"])
        .arg(td.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["status"], "done");
    assert_eq!(v["dry_run"], true);
    assert_eq!(v["skipped_dry_run"], 1);
    assert_eq!(v["skipped_by_reason"]["unrecognized suffix"], 1);
}

#[test]
fn facts_are_appended_as_jsonl() {
    let td = layout();
    let facts = td.path().join("facts.jsonl");
    cmd()
        .args(["-y", "--facts"])
        .arg(&facts)
        .arg(td.path().join("site"))
        .assert()
        .success();
    let text = std::fs::read_to_string(&facts).unwrap();
    let events: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(events.iter().all(|e| e["subsystem"] == "delink"));
    assert_eq!(events.last().unwrap()["event"], "run.summary");
    assert!(events.iter().any(|e| e["event"] == "replace.result"));
}

#[test]
fn json_report_handles_non_utf8_names() {
    let td = tempfile::tempdir().unwrap();
    std::fs::write(td.path().join("core.py"), b"X = 1\n").unwrap();
    let link = td.path().join(OsStr::from_bytes(b"caf\xe9.py"));
    symlink("core.py", &link).unwrap();

    let out = cmd().args(["--json", "-y"]).arg(td.path()).output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["replaced"], 1);
    let shown = v["links"][0]["link"].as_str().unwrap();
    assert!(shown.ends_with("caf\u{fffd}.py"), "{shown}");
    assert!(!is_symlink(&link));
}
