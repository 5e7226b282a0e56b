//! CLI integration tests for Daylist
//!
//! These tests drive the binary against a temporary task file and verify
//! that commands work together through the persisted JSON slot.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance bound to a temp task file and no user config
fn daylist_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("daylist"));
    cmd.env("DAYLIST_FILE", task_file(dir))
        .env("DAYLIST_CONFIG", dir.path().join("config.toml"))
        .env_remove("DAYLIST_LOG");
    cmd
}

fn task_file(dir: &TempDir) -> PathBuf {
    dir.path().join("tasks.json")
}

/// Adds a task and returns its ID
fn add_task(dir: &TempDir, text: &str) -> i64 {
    let output = daylist_cmd(dir)
        .args(["--format", "json", "add", text])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    json["id"].as_i64().unwrap()
}

fn stored(dir: &TempDir) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(task_file(dir)).unwrap()).unwrap()
}

// =============================================================================
// Add
// =============================================================================

#[test]
fn test_add_creates_task_file() {
    let dir = TempDir::new().unwrap();

    daylist_cmd(&dir)
        .args(["add", "buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task"))
        .stdout(predicate::str::contains("buy milk"));

    let tasks = stored(&dir);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["text"], "buy milk");
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0]["createdAt"].is_string());
    assert!(tasks[0]["id"].is_i64());
}

#[test]
fn test_add_whitespace_is_rejected() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "A");

    daylist_cmd(&dir)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a task name"));

    assert_eq!(stored(&dir).as_array().unwrap().len(), 1);
}

#[test]
fn test_add_escapes_control_characters() {
    let dir = TempDir::new().unwrap();

    daylist_cmd(&dir)
        .args(["add", "\u{1b}]0;pwned\u{7}x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\\u{1b}]0;pwned\\u{7}x"))
        .stdout(predicate::str::contains("\u{1b}").not());

    assert_eq!(stored(&dir)[0]["text"], "\u{1b}]0;pwned\u{7}x");
}

#[test]
fn test_add_prepends_with_unique_ids() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");
    let c = add_task(&dir, "C");

    assert!(a < b && b < c);

    let tasks = stored(&dir);
    let texts: Vec<_> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["C", "B", "A"]);
}

// =============================================================================
// List
// =============================================================================

#[test]
fn test_list_empty_shows_placeholder() {
    let dir = TempDir::new().unwrap();

    daylist_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));
}

#[test]
fn test_list_filters() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "Alpha");
    add_task(&dir, "Beta");

    daylist_cmd(&dir)
        .args(["toggle", &a.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task"));

    daylist_cmd(&dir)
        .args(["list", "--filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"))
        .stdout(predicate::str::contains("Alpha"))
        .stdout(predicate::str::contains("Beta").not());

    daylist_cmd(&dir)
        .args(["list", "--filter", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beta"))
        .stdout(predicate::str::contains("Alpha").not());
}

#[test]
fn test_list_json_is_view() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "A");

    let output = daylist_cmd(&dir)
        .args(["--format", "json", "list", "--filter", "completed"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["filter"], "completed");
    assert_eq!(json["rows"].as_array().unwrap().len(), 0);
    assert_eq!(json["placeholder"], "No tasks");
}

#[test]
fn test_list_escapes_control_characters() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "\u{1b}[2Jwipe");

    daylist_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("\\u{1b}[2Jwipe"))
        .stdout(predicate::str::contains("\u{1b}").not());
}

// =============================================================================
// Toggle / Edit
// =============================================================================

#[test]
fn test_toggle_twice_restores() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "A");
    let before = stored(&dir);

    daylist_cmd(&dir).args(["toggle", &a.to_string()]).assert().success();
    daylist_cmd(&dir)
        .args(["toggle", &a.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened task"));

    assert_eq!(stored(&dir), before);
}

#[test]
fn test_toggle_unknown_id_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "A");
    let before = stored(&dir);

    daylist_cmd(&dir)
        .args(["toggle", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No task with id 12345"));

    assert_eq!(stored(&dir), before);
}

#[test]
fn test_invalid_id_fails() {
    let dir = TempDir::new().unwrap();

    daylist_cmd(&dir)
        .args(["toggle", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task ID"));
}

#[test]
fn test_edit_changes_text() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "old");

    daylist_cmd(&dir)
        .args(["edit", &a.to_string(), "new", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task"));

    assert_eq!(stored(&dir)[0]["text"], "new text");
}

#[test]
fn test_edit_to_whitespace_keeps_text() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "keep me");

    daylist_cmd(&dir)
        .args(["edit", &a.to_string(), "  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));

    assert_eq!(stored(&dir)[0]["text"], "keep me");
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_rm_with_yes_deletes() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "A");
    add_task(&dir, "B");

    daylist_cmd(&dir)
        .args(["rm", &a.to_string(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task"));

    let tasks = stored(&dir);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["text"], "B");
}

#[test]
fn test_rm_declined_keeps_task() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "A");

    daylist_cmd(&dir)
        .args(["rm", &a.to_string()])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"))
        .stderr(predicate::str::contains("Delete this task?"));

    assert_eq!(stored(&dir).as_array().unwrap().len(), 1);
}

#[test]
fn test_rm_prompt_escapes_control_characters() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "\u{1b}[2Jwipe");

    daylist_cmd(&dir)
        .args(["rm", &a.to_string()])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("\\u{1b}[2Jwipe"))
        .stderr(predicate::str::contains("\u{1b}").not());
}

#[test]
fn test_rm_confirmed_on_stdin() {
    let dir = TempDir::new().unwrap();
    let a = add_task(&dir, "A");

    daylist_cmd(&dir)
        .args(["rm", &a.to_string()])
        .write_stdin("y\n")
        .assert()
        .success();

    assert_eq!(stored(&dir).as_array().unwrap().len(), 0);
}

#[test]
fn test_rm_unknown_id_leaves_list() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "A");
    let before = stored(&dir);

    daylist_cmd(&dir)
        .args(["rm", "99", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No task with id 99"));

    assert_eq!(stored(&dir), before);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_corrupt_file_starts_empty_with_warning() {
    let dir = TempDir::new().unwrap();
    fs::write(task_file(&dir), "this is not json").unwrap();

    daylist_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"))
        .stderr(predicate::str::contains("Warning"));

    assert_eq!(
        fs::read_to_string(dir.path().join("tasks.json.corrupt")).unwrap(),
        "this is not json"
    );
}

#[test]
fn test_config_file_sets_data_file() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("custom.json");
    fs::write(
        dir.path().join("config.toml"),
        format!("data_file = {:?}\n", custom.display().to_string()),
    )
    .unwrap();

    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("daylist"))
        .env_remove("DAYLIST_FILE")
        .env("DAYLIST_CONFIG", dir.path().join("config.toml"))
        .args(["add", "configured"])
        .assert()
        .success();

    assert!(custom.exists());
}

#[test]
fn test_path_shows_task_file() {
    let dir = TempDir::new().unwrap();

    daylist_cmd(&dir)
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks.json"));
}

// =============================================================================
// Workflow
// =============================================================================

#[test]
fn test_full_workflow() {
    let dir = TempDir::new().unwrap();

    let a = add_task(&dir, "A");
    let b = add_task(&dir, "B");

    daylist_cmd(&dir).args(["toggle", &a.to_string()]).assert().success();

    daylist_cmd(&dir)
        .args(["list", "--filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" A"))
        .stdout(predicate::str::contains(" B").not());

    daylist_cmd(&dir)
        .args(["rm", &b.to_string()])
        .write_stdin("y\n")
        .assert()
        .success();

    let tasks = stored(&dir);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["id"], a);
    assert_eq!(tasks[0]["completed"], true);
}
