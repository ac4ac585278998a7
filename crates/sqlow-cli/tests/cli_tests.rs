//! Integration tests for the sqlow binary
//!
//! These exercise the paths that finish before a database connection is
//! attempted.

use std::process::Command;
use tempfile::tempdir;

/// Path to the compiled sqlow binary
fn sqlow_bin() -> String {
    env!("CARGO_BIN_EXE_sqlow").to_string()
}

/// Run a `sqlow` command and return (stdout, stderr, success).
fn run_sqlow(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(sqlow_bin())
        .args(args)
        .env_remove("SQLOW_PASSWORD")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute sqlow with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

#[test]
fn test_version_flag() {
    let (stdout, _, success) = run_sqlow(&["--version"]);
    assert!(success);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_requires_password() {
    let (_, stderr, success) = run_sqlow(&["run", "migrations.yml"]);
    assert!(!success);
    assert!(stderr.contains("--password"), "stderr: {}", stderr);
}

#[test]
fn test_mysql_dry_run_is_rejected() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.yml");
    let doc = temp.path().join("m.yml");
    std::fs::write(&config, "engine: mysql\n").unwrap();
    std::fs::write(&doc, "migrations: []\n").unwrap();

    let (stdout, stderr, success) = run_sqlow(&[
        "run",
        doc.to_str().unwrap(),
        "--dry-run",
        "-p",
        "secret",
        "-c",
        config.to_str().unwrap(),
    ]);

    assert!(!success);
    assert!(stderr.contains("[C004]"), "stderr: {}", stderr);
    assert!(stdout.is_empty());
}

#[test]
fn test_engine_flag_overrides_config_for_dry_run_check() {
    let temp = tempdir().unwrap();
    let doc = temp.path().join("m.yml");
    std::fs::write(&doc, "migrations: []\n").unwrap();

    let (_, stderr, success) = run_sqlow(&[
        "run",
        doc.to_str().unwrap(),
        "-d",
        "-e",
        "maria",
        "-p",
        "secret",
        "-c",
        temp.path().join("missing.yml").to_str().unwrap(),
    ]);

    assert!(!success);
    assert!(stderr.contains("[C004]"), "stderr: {}", stderr);
    assert!(stderr.contains("not found"), "stderr: {}", stderr);
}

#[test]
fn test_missing_migration_path() {
    let temp = tempdir().unwrap();
    let (_, stderr, success) = run_sqlow(&[
        "run",
        temp.path().join("nope.yml").to_str().unwrap(),
        "-p",
        "secret",
        "-c",
        temp.path().join("missing.yml").to_str().unwrap(),
    ]);

    assert!(!success);
    assert!(stderr.contains("[C007]"), "stderr: {}", stderr);
}
