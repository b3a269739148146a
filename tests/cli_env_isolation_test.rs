//! `GRADLE_INIT_*` variables in the test runner's environment must not
//! reach commands spawned through `TestEnv::gi()`.
//!
//! Kept in its own test binary: the single test mutates the process
//! environment, so nothing else may run alongside it.

mod common;

use common::{TestEnv, stdout_json};

#[test]
fn test_inherited_context_variables_are_stripped() {
    let env = TestEnv::new();
    env.kotlin_template();

    // SAFETY: this binary runs exactly one test, so no other thread touches the environment.
    unsafe {
        std::env::set_var("GRADLE_INIT_GROUP", "from.shell");
        std::env::set_var("GRADLE_INIT_VERSION", "9.9.9");
    }

    let isolated = stdout_json(&env.gi().args(["context", "kotlin-single"]).output().unwrap());
    let explicit = stdout_json(
        &env.gi()
            .args(["context", "kotlin-single"])
            .env("GRADLE_INIT_GROUP", "from.test")
            .output()
            .unwrap(),
    );

    unsafe {
        std::env::remove_var("GRADLE_INIT_GROUP");
        std::env::remove_var("GRADLE_INIT_VERSION");
    }

    let ctx = &isolated["context"];
    assert_eq!(ctx["group"]["value"], "com.example");
    assert_eq!(ctx["group"]["source"], "template-default");
    assert_eq!(ctx["version"]["source"], "empty");

    // Variables a test sets explicitly still get through.
    let ctx = &explicit["context"];
    assert_eq!(ctx["group"]["value"], "from.test");
    assert_eq!(ctx["group"]["source"], "env:GRADLE_INIT_GROUP");
    assert_eq!(ctx["version"]["source"], "empty");
}
