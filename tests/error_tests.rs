//! Error scenario integration tests

use std::process::Command;

fn live_scribe_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_live-scribe"))
}

#[test]
fn config_get_unknown_key() {
    let output = live_scribe_bin()
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_duration() {
    let output = live_scribe_bin()
        .args(["config", "set", "duration", "invalid"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid") || stderr.contains("duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_source() {
    let output = live_scribe_bin()
        .args(["config", "set", "source", "webcam"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid capture source") || stderr.contains("mic"),
        "Expected error about invalid source, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_endpoint() {
    let output = live_scribe_bin()
        .args(["config", "set", "endpoint", "not-a-url"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("http"),
        "Expected error about endpoint URL, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    // config list works without a config file (all values unset)
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = live_scribe_bin()
        .args(["config", "list"])
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") || stdout.contains("endpoint"),
        "Expected config list output, got: {}",
        stdout
    );
}
