//! End-to-end tests running the `ghm` binary against a temporary state
//! directory. None of these reach `gh` or `git`.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn ghm(state_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ghm"));
    cmd.env("GHM_STATE_DIR", state_dir)
        .env("GHM_PROMPT_DISABLED", "1")
        .env("NO_COLOR", "1")
        .env_remove("GHM_DEBUG")
        .current_dir(state_dir);
    cmd
}

fn store(state_dir: &Path, key: &str, value: &str) {
    ghm(state_dir)
        .args(["config", "store", "--config-key", key, "--config-value", value])
        .assert()
        .success();
}

#[test]
fn test_should_print_help_with_command_groups() {
    let dir = tempfile::tempdir().unwrap();
    ghm(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("secret")
                .and(predicate::str::contains("workflow"))
                .and(predicate::str::contains("config")),
        );
}

#[test]
fn test_should_store_and_list_configuration() {
    let dir = tempfile::tempdir().unwrap();
    store(dir.path(), "username", "alice");
    store(dir.path(), "token", "abc123");

    ghm(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout("- token: abc123\n- username: alice\n");

    let on_disk = fs::read_to_string(dir.path().join("cconfig.json")).unwrap();
    assert_eq!(
        on_disk,
        "{\n    \"token\": \"abc123\",\n    \"username\": \"alice\"\n}\n"
    );
}

#[test]
fn test_should_accept_underscore_flag_spellings() {
    let dir = tempfile::tempdir().unwrap();
    ghm(dir.path())
        .args(["config", "store", "--config_key", "username", "--config_value", "bob"])
        .assert()
        .success();

    ghm(dir.path())
        .args(["config", "list"])
        .assert()
        .stdout("- username: bob\n");
}

#[test]
fn test_should_use_state_dir_flag() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    ghm(dir.path())
        .arg("--state-dir")
        .arg(&state)
        .args(["config", "store", "--config-key", "username", "--config-value", "alice"])
        .assert()
        .success();

    assert!(state.join("cconfig.json").exists());
}

#[test]
fn test_should_report_empty_secret_cache() {
    let dir = tempfile::tempdir().unwrap();
    ghm(dir.path())
        .args(["secret", "list"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No secrets stored locally."));
}

#[test]
fn test_should_warn_about_corrupt_configuration() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cconfig.json"), "{oops").unwrap();

    ghm(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("failed to parse")
                .and(predicate::str::contains("No configurations stored.")),
        );
}

#[test]
fn test_should_exit_with_auth_code_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    ghm(dir.path())
        .args([
            "secret",
            "add",
            "--repo",
            "o/r",
            "--secret-name",
            "API_KEY",
            "--secret-value",
            "xyz",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("credentials are not configured"));

    assert!(!dir.path().join("secrets.json").exists());
}

#[test]
fn test_should_require_missing_flag_when_prompts_are_disabled() {
    let dir = tempfile::tempdir().unwrap();
    ghm(dir.path())
        .args(["config", "store", "--config-key", "username"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "--config-value required when not running interactively",
        ));
}

#[test]
fn test_should_reject_invalid_secret_name() {
    let dir = tempfile::tempdir().unwrap();
    store(dir.path(), "username", "alice");
    store(dir.path(), "token", "abc123");

    ghm(dir.path())
        .args([
            "secret",
            "add",
            "--repo",
            "o/r",
            "--secret-name",
            "BAD-NAME",
            "--secret-value",
            "xyz",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid secret name"));

    assert!(!dir.path().join("secrets.json").exists());
}

#[test]
fn test_should_reject_unknown_cache_policy() {
    let dir = tempfile::tempdir().unwrap();
    ghm(dir.path())
        .args(["secret", "remove", "--cache-policy", "sometimes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sometimes"));
}
