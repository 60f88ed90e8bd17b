//! CLI smoke tests for the cadence binary
//!
//! Each test runs against a throwaway XDG sandbox so no real user data is
//! touched.

use assert_cmd::Command;
use tempfile::TempDir;

/// Command wired to a sandboxed XDG environment
fn cadence(sandbox: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cadence").unwrap();
    cmd.env("HOME", sandbox.path())
        .env("XDG_DATA_HOME", sandbox.path().join("data"))
        .env("XDG_STATE_HOME", sandbox.path().join("state"))
        .env("XDG_CONFIG_HOME", sandbox.path().join("config"));
    cmd
}

#[test]
fn test_help() {
    let sandbox = TempDir::new().unwrap();
    cadence(&sandbox)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("habit"));
}

#[test]
fn test_add_and_list() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox)
        .args(["add", "Meditate", "--description", "10 minutes"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Meditate"));

    cadence(&sandbox)
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("Meditate"));
}

#[test]
fn test_toggle_updates_streak() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox).args(["add", "Run"]).assert().success();

    cadence(&sandbox)
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Completed Run"));

    cadence(&sandbox)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Streak:      1"));

    // Toggling again clears the completion
    cadence(&sandbox)
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Cleared Run"));
}

#[test]
fn test_toggle_rejects_malformed_date() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox).args(["add", "Run"]).assert().success();

    cadence(&sandbox)
        .args(["toggle", "1", "--date", "not-a-date"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid date"));
}

#[test]
fn test_show_unknown_habit_fails() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox)
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("habit not found"));
}

#[test]
fn test_history_length() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox).args(["add", "Walk"]).assert().success();

    let output = cadence(&sandbox)
        .args(["history", "1", "--days", "7", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let days: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(days.as_array().unwrap().len(), 8);
}

#[test]
fn test_report_generate_without_habits() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox)
        .args(["report", "generate"])
        .assert()
        .success()
        .stdout(predicates::str::contains("nothing to report"));
}

#[test]
fn test_json_dashboard_is_valid() {
    let sandbox = TempDir::new().unwrap();

    cadence(&sandbox).args(["add", "Read"]).assert().success();
    cadence(&sandbox).args(["toggle", "1"]).assert().success();

    let output = cadence(&sandbox)
        .args(["dashboard", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let data: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(data["total_habits"], 1);
    assert_eq!(data["today_completions"], 1);
}
