//! CLI integration tests

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

fn live_scribe_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_live-scribe"))
}

#[test]
fn help_output() {
    let output = live_scribe_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--source"));
    assert!(stdout.contains("--title"));
    assert!(stdout.contains("--endpoint"));
    assert!(stdout.contains("--duration"));
    assert!(stdout.contains("--discard"));
}

#[test]
fn version_output() {
    let output = live_scribe_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("live-scribe"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = live_scribe_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("live-scribe"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = live_scribe_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn missing_title_is_a_usage_error() {
    live_scribe_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("title is required"));
}

#[test]
fn invalid_duration_error() {
    live_scribe_bin()
        .args(["--title", "Team Sync", "--duration", "nonsense"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn invalid_source_is_rejected_by_clap() {
    let output = live_scribe_bin()
        .args(["--title", "Team Sync", "--source", "webcam"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("possible values"),
        "Expected clap rejection, got: {}",
        stderr
    );
}

#[test]
fn config_set_rejects_unknown_key() {
    let output = live_scribe_bin()
        .args(["config", "set", "api_key", "x"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown key"), "got: {}", stderr);
}

// Note: Tests for valid argument combinations are covered by unit and
// session tests; running them here would open a real capture device.
