//! Common test utilities for gradle-init integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.gradleInit/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with an isolated gradle-init home.
///
/// The `gi()` method returns a `Command` that sets `GRADLEINIT_HOME`
/// per-invocation and strips inherited `GRADLE_INIT_*` variables, making
/// tests parallel-safe and independent of the developer's shell.
pub struct TestEnv {
    pub home_dir: TempDir,
    pub work_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            home_dir: TempDir::new().unwrap(),
            work_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and write the default config.
    pub fn init() -> Self {
        let env = Self::new();
        env.gi().args(["config", "init"]).assert().success();
        env
    }

    /// Get a Command for the gradle-init binary with isolated home directory.
    pub fn gi(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gradle-init"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("GRADLEINIT_HOME", self.home_dir.path());
        cmd.env_remove("RUST_LOG");
        for (name, _) in std::env::vars_os() {
            if name.to_string_lossy().starts_with("GRADLE_INIT_") {
                cmd.env_remove(name);
            }
        }
        cmd
    }

    pub fn home_path(&self) -> &Path {
        self.home_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.home_path().join("config")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.home_path().join("cache").join("compiled")
    }

    /// Replace the config file.
    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).unwrap();
    }

    /// Write a template under `templates/official/<name>`.
    pub fn write_template(&self, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
        let dir = self.home_path().join("templates").join("official").join(name);
        for (rel, content) in files {
            let path = dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    /// A small Kotlin template with enhanced and plain placeholders.
    pub fn kotlin_template(&self) -> PathBuf {
        self.write_template(
            "kotlin-single",
            &[
                (
                    "build.gradle.kts",
                    b"group = \"{{ @@01|Group ID=com.example@@group }}\"\n\
                      version = \"{{ version }}\"\n\
                      jvmToolchain({{ @@02|(11|17|21)|JDK version=21@@jdk_version }})\n",
                ),
                (
                    "settings.gradle.kts",
                    b"rootProject.name = \"{{ @@00|Project name@@project_name }}\"\n",
                ),
                ("gradle/wrapper/gradle-wrapper.jar", b"PK\x03\x04\x00\xff"),
            ],
        )
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse stdout of a successful command as JSON.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
