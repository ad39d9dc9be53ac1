//! Command-line behavior of the demo binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn demo() -> Command {
    let mut cmd = Command::cargo_bin("combobox_demo").unwrap();
    cmd.env_remove("COMBOBOX_DEMO_CONFIG")
        .env_remove("COMBOBOX_DEMO_THEME")
        .env_remove("COMBOBOX_DEMO_API_URL");
    cmd
}

#[test]
fn test_help_lists_flags() {
    demo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--offline"))
        .stdout(predicate::str::contains("--api-url"))
        .stdout(predicate::str::contains("--log-file"));
}

#[test]
fn test_self_check_renders_form() {
    demo()
        .args(["--offline", "--theme", "plain", "--self-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Job application"))
        .stdout(predicate::str::contains("Department *"))
        .stdout(predicate::str::contains("Pick up to 3 skills..."));
}

#[test]
fn test_missing_config_file_fails() {
    demo()
        .args(["--config", "/nonexistent/combobox_demo.toml", "--self-check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading config file"));
}

#[test]
fn test_invalid_api_url_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.toml");
    fs::write(&path, "[api]\nurl = \"not a url\"\n").unwrap();

    demo()
        .arg("--config")
        .arg(&path)
        .arg("--self-check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid API url"));
}

#[test]
fn test_unknown_theme_is_rejected() {
    demo()
        .args(["--theme", "neon", "--self-check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));
}
