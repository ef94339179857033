//! Integration tests for the neonquotes CLI.

use std::process::Command;

/// Get the path to the neonquotes binary.
fn neonquotes_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_neonquotes"))
}

#[test]
fn test_help_flag() {
    let output = neonquotes_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("neonquotes"));
    assert!(stdout.contains("--tickers"));
    assert!(stdout.contains("--period"));
    assert!(stdout.contains("--refresh"));
    assert!(stdout.contains("--theme"));
    assert!(stdout.contains("--style"));
}

#[test]
fn test_version_flag() {
    let output = neonquotes_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("neonquotes"));
}

#[test]
fn test_blank_ticker_input_is_an_error() {
    let output = neonquotes_bin()
        .args(["-s", " , ,, "])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No tickers"));
}

#[test]
fn test_missing_style_file_is_fatal() {
    let output = neonquotes_bin()
        .args(["-s", "AAPL", "--style", "/nonexistent/palette.toml"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("style file"));
}

#[test]
fn test_invalid_period_rejected() {
    let output = neonquotes_bin()
        .args(["-s", "AAPL", "-p", "7w"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_internal_period_not_exposed() {
    let output = neonquotes_bin()
        .args(["-s", "AAPL", "-p", "5d"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_theme_choices_documented() {
    let output = neonquotes_bin()
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("glow"));
    assert!(stdout.contains("classic"));
}

#[test]
fn test_env_vars_documented() {
    let output = neonquotes_bin()
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NEONQUOTES_TICKERS") || stdout.contains("env"));
}

/// Test batch mode with network access.
/// This test is ignored by default as it requires network access.
/// Run with: cargo test -- --ignored
#[test]
#[ignore]
fn test_batch_mode_with_network() {
    let child = neonquotes_bin()
        .args(["-s", "AAPL", "-b", "-n", "1", "--timeout", "5"])
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .expect("Failed to start command");

    let output = child
        .wait_with_output()
        .expect("Failed to wait for command");

    // In batch mode with 1 iteration, should complete
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("NEONQUOTES"));
    }
    // Network failure is acceptable in CI; the ticker then shows inline
    // as an error or no-data line rather than aborting the cycle.
}
