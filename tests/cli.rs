//! Integration tests for CLI commands

#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Command isolated from the user's config and data directories
fn registry(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("registry").unwrap();
    cmd.arg("--config")
        .arg(tmp.path().join("config.toml"))
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_picture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("jane.png");
    std::fs::write(&path, PNG_MAGIC).unwrap();
    path
}

fn add_jane(tmp: &TempDir) {
    let picture = write_picture(tmp.path());
    registry(tmp)
        .args([
            "add",
            "--name",
            "Jane Doe",
            "--email",
            "jane@x.com",
            "--phone",
            "1234567890",
            "--gender",
            "Female",
            "--skill",
            "HTML",
            "--skill",
            "CSS",
            "--picture",
        ])
        .arg(&picture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered candidate"));
}

#[test]
fn test_main_command_help() {
    let mut cmd = Command::cargo_bin("registry").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Candidate registration form"));
}

#[test]
fn test_add_then_list_json() {
    let tmp = TempDir::new().unwrap();
    add_jane(&tmp);

    let output = registry(&tmp)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["fullName"], "Jane Doe");
    assert_eq!(entries[0]["skills"], serde_json::json!(["HTML", "CSS"]));
    assert_eq!(entries[0]["profilePic"], "jane.png");
    assert!(entries[0]["preview"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    // Slot file is where the data dir says
    assert!(tmp.path().join("data").join("entries.json").exists());
}

#[test]
fn test_add_rejects_invalid_candidate() {
    let tmp = TempDir::new().unwrap();

    registry(&tmp)
        .args(["add", "--name", "Jane", "--phone", "12345", "--skill", "HTML"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Email is required"))
        .stdout(predicate::str::contains("Phone must be 10 digits"))
        .stdout(predicate::str::contains("Select at least two skills"))
        .stdout(predicate::str::contains("Profile picture is required"));

    registry(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries yet."));
}

#[test]
fn test_add_rejects_unknown_skill() {
    let tmp = TempDir::new().unwrap();

    registry(&tmp)
        .args(["add", "--skill", "Rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown skill"));
}

#[test]
fn test_validate_does_not_store() {
    let tmp = TempDir::new().unwrap();
    let picture = write_picture(tmp.path());

    registry(&tmp)
        .args([
            "validate", "-n", "Jane", "-e", "jane@x.com", "-p", "1234567890", "-g", "male", "-s",
            "React", "-s", "CSS", "--picture",
        ])
        .arg(&picture)
        .assert()
        .success()
        .stdout(predicate::str::contains("All fields valid"));

    assert!(!tmp.path().join("data").join("entries.json").exists());
}

#[test]
fn test_delete_entry() {
    let tmp = TempDir::new().unwrap();
    add_jane(&tmp);

    let output = registry(&tmp)
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = entries[0]["id"].as_i64().unwrap();

    registry(&tmp)
        .args(["delete", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry"));

    // Second delete is a no-op, not an error
    registry(&tmp)
        .args(["delete", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry with id"));
}

#[test]
fn test_list_table() {
    let tmp = TempDir::new().unwrap();
    add_jane(&tmp);

    registry(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Candidates"))
        .stdout(predicate::str::contains("Jane Doe"))
        .stdout(predicate::str::contains("HTML, CSS"));
}

#[test]
fn test_config_command_shows_storage_path() {
    let tmp = TempDir::new().unwrap();

    registry(&tmp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("slot = \"entries\""))
        .stdout(predicate::str::contains("entries.json"));
}

#[test]
fn test_config_init_writes_file_once() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");

    registry(&tmp)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("slot = \"entries\""));
    assert!(written.contains("max_bytes = 5242880"));

    registry(&tmp)
        .args(["config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_repeated_skill_flag_keeps_skill_selected() {
    let tmp = TempDir::new().unwrap();
    let picture = write_picture(tmp.path());

    registry(&tmp)
        .args([
            "add", "-n", "Jane Doe", "-e", "jane@x.com", "-p", "1234567890", "-g", "Female",
            "-s", "HTML", "-s", "CSS", "-s", "HTML", "--picture",
        ])
        .arg(&picture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered candidate"));
}
