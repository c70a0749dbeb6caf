//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pulse-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("API Pulse"),
        "Should show app name"
    );
    assert!(stdout.contains("status"), "Should show status command");
    assert!(stdout.contains("metrics"), "Should show metrics command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pulse-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("pulse"), "Should show binary name");
}

/// Test metrics subcommand help
#[test]
fn test_metrics_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pulse-cli", "--", "metrics", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Metrics help should succeed");
    assert!(stdout.contains("latest"), "Should show latest subcommand");
    assert!(stdout.contains("delta"), "Should show delta subcommand");
    assert!(stdout.contains("history"), "Should show history subcommand");
}

/// Test history limit flag help
#[test]
fn test_history_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "pulse-cli", "--", "metrics", "history", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "History help should succeed");
    assert!(stdout.contains("--limit"), "Should show limit flag");
}
