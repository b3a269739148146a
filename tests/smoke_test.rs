//! Smoke tests for the gradle-init CLI.
//!
//! These tests verify basic CLI functionality:
//! - `gradle-init --version` outputs version info
//! - `gradle-init --help` outputs help text
//! - errors are reported as JSON on stderr with a non-zero exit

use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::TestEnv;

/// Get a Command for the gradle-init binary.
fn gi() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gradle-init"))
}

#[test]
fn test_version_flag() {
    gi().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradle-init"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    gi().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("context"))
        .stdout(predicate::str::contains("compile"));
}

#[test]
fn test_no_args_prints_usage() {
    gi().assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_error_is_json() {
    let env = TestEnv::new();
    env.gi()
        .args(["templates", "info", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"{"error":"#))
        .stderr(predicate::str::contains("does-not-exist"));
}

#[test]
fn test_error_is_human_with_flag() {
    let env = TestEnv::new();
    env.gi()
        .args(["-H", "templates", "info", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}
