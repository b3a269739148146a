//! Integration tests for `gradle-init compile`.

mod common;

use common::{TestEnv, stdout_json};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_compile_mirrors_template_into_cache() {
    let env = TestEnv::new();
    env.kotlin_template();

    let output = env.gi().args(["compile", "kotlin-single"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["template"], "kotlin-single");
    assert_eq!(json["files_compiled"], 2);
    assert_eq!(json["forced"], false);

    let compiled = PathBuf::from(json["compiled_dir"].as_str().unwrap());
    assert!(compiled.starts_with(env.cache_path()));
    let build = fs::read_to_string(compiled.join("build.gradle.kts")).unwrap();
    assert_eq!(
        build,
        "group = \"{{ group }}\"\nversion = \"{{ version }}\"\njvmToolchain({{ jdk_version }})\n"
    );
    assert_eq!(
        fs::read(compiled.join("gradle/wrapper/gradle-wrapper.jar")).unwrap(),
        b"PK\x03\x04\x00\xff"
    );

    let info: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(compiled.join(".cache_info.json")).unwrap())
            .unwrap();
    assert_eq!(info["template_name"], "kotlin-single");
    assert_eq!(info["files_compiled"], 2);
    assert!(info["compiled_at"].is_f64());
}

#[test]
fn test_recompile_without_changes_keeps_timestamp() {
    let env = TestEnv::new();
    env.kotlin_template();

    let first = stdout_json(&env.gi().args(["compile", "kotlin-single"]).output().unwrap());
    let second = stdout_json(&env.gi().args(["compile", "kotlin-single"]).output().unwrap());
    assert_eq!(first["compiled_at"], second["compiled_at"]);

    let forced = stdout_json(
        &env.gi()
            .args(["compile", "kotlin-single", "--force"])
            .output()
            .unwrap(),
    );
    assert_eq!(forced["forced"], true);
    assert!(forced["compiled_at"].as_f64().unwrap() >= first["compiled_at"].as_f64().unwrap());
}

#[test]
fn test_compile_by_path() {
    let env = TestEnv::new();
    let dir = env.write_template("by-path", &[("README.md", b"# {{ @@Title@@title }}\n")]);

    let json = stdout_json(&env.gi().arg("compile").arg(&dir).output().unwrap());
    let compiled = PathBuf::from(json["compiled_dir"].as_str().unwrap());
    let readme = fs::read_to_string(compiled.join("README.md")).unwrap();
    assert_eq!(readme, "# {{ title }}\n");
}

#[test]
fn test_compile_unknown_template() {
    let env = TestEnv::new();
    env.gi().args(["compile", "missing"]).assert().failure();
}
