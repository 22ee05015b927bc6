//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_resqlink"))
        .env("RESQLINK_DATA_DIR", data_dir)
        .env_remove("RESQLINK_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_contacts_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["contacts", "add", "Mom", "+1 555 0100"]);
    assert_eq!(code, 0, "contacts add failed");
    let added: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(added["relationship"], "Emergency Contact");

    let (stdout, _, code) = run_cli(dir.path(), &["contacts", "list", "--json"]);
    assert_eq!(code, 0, "contacts list failed");
    let listed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Mom");
    assert_eq!(listed[0]["id"], added["id"]);
}

#[test]
fn test_contacts_add_rejects_bad_phone() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["contacts", "add", "Mom", "call me"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_contacts_edit_keeps_omitted_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, _) = run_cli(
        dir.path(),
        &["contacts", "add", "Dad", "555-0101", "--relationship", "Father"],
    );
    let added: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let id = added["id"].as_str().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["contacts", "edit", id, "--phone", "555-0199"]);
    assert_eq!(code, 0, "contacts edit failed");
    let edited: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(edited["name"], "Dad");
    assert_eq!(edited["phone"], "555-0199");
    assert_eq!(edited["relationship"], "Father");
}

#[test]
fn test_history_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["history", "list"]);
    assert_eq!(code, 0, "history list failed");
    assert!(stdout.contains("No emergency alerts sent yet"));
}

#[test]
fn test_config_get_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "alerts.vibration"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "true");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "alerts.vibration", "false"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "alerts.vibration"]);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "alerts.volume"]);
    assert_eq!(code, 1);
}

#[test]
fn test_alert_without_contacts() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["alert"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("resqlink contacts add"));
}

#[test]
fn test_alert_sends_and_records_history() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "alerts.vibration", "false"]);
    run_cli(dir.path(), &["contacts", "add", "Mom", "555-0100"]);

    let (stdout, _, code) = run_cli(dir.path(), &["alert"]);
    assert_eq!(code, 0, "alert failed");
    assert!(stdout.contains("Alert sent to 1 of 1 emergency contacts."));

    let outbox = std::fs::read_to_string(dir.path().join("outbox.jsonl")).unwrap();
    assert_eq!(outbox.lines().count(), 1);
    assert!(outbox.contains("EMERGENCY ALERT from ResQLink"));

    let (stdout, _, _) = run_cli(dir.path(), &["history", "list", "--json"]);
    let history: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["successCount"], 1);
}

#[test]
fn test_reset_clears_contacts() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["contacts", "add", "Mom", "555-0100"]);
    let (_, _, code) = run_cli(dir.path(), &["reset"]);
    assert_eq!(code, 0, "reset failed");

    let (stdout, _, _) = run_cli(dir.path(), &["contacts", "list", "--json"]);
    let listed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}
