//! Integration tests for `gradle-init config`.

mod common;

use common::{TestEnv, stdout_json};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_show_without_config_prints_defaults() {
    let env = TestEnv::new();

    let json = stdout_json(&env.gi().args(["config", "show"]).output().unwrap());
    assert_eq!(json["exists"], false);
    let content = json["content"].as_str().unwrap();
    assert!(content.contains("[templates]"));
    assert!(content.contains("[defaults]"));
    assert!(!env.config_path().exists());
}

#[test]
fn test_init_creates_layout() {
    let env = TestEnv::new();

    let json = stdout_json(&env.gi().args(["config", "init"]).output().unwrap());
    assert_eq!(json["created"], true);
    assert!(env.config_path().is_file());
    assert!(env.home_path().join("templates/official").is_dir());
    assert!(env.home_path().join("templates/custom").is_dir());
    assert!(env.cache_path().is_dir());
}

#[test]
fn test_init_does_not_overwrite_without_force() {
    let env = TestEnv::init();
    env.write_config("[defaults]\ngroup = \"mine\"\n");

    env.gi()
        .args(["-H", "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert!(fs::read_to_string(env.config_path()).unwrap().contains("mine"));

    env.gi().args(["config", "init", "--force"]).assert().success();
    let content = fs::read_to_string(env.config_path()).unwrap();
    assert!(!content.contains("mine"));
    assert!(content.contains("com.example"));
}

#[test]
fn test_show_existing_config() {
    let env = TestEnv::init();
    env.write_config("[defaults]\ngroup = \"ch.typedef\"\n");

    env.gi()
        .args(["-H", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("group = \"ch.typedef\""));
}

#[test]
fn test_malformed_config_is_an_error() {
    let env = TestEnv::init();
    env.write_config("[defaults\n");

    env.gi()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config parse error"));
}
