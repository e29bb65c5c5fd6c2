//! Integration tests for the readex CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use readex_core::expr::{TypeRef, constant};
use readex_test::{null_safe_access, salary_calculation};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const SALARY: &str =
    "(Person p) => p.Age < 30 ? p.Salary * 1.15m : p.Age < 50 ? p.Salary * 1.08m : p.Salary * 1.03m";

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("readex").unwrap()
}

/// Temporary directory holding the sample trees as JSON
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let salary = serde_json::to_string_pretty(&salary_calculation().unwrap()).unwrap();
    fs::write(temp_dir.path().join("salary.json"), salary).unwrap();
    let null_safe = serde_json::to_string_pretty(&null_safe_access()).unwrap();
    fs::write(temp_dir.path().join("null_safe.json"), null_safe).unwrap();
    temp_dir
}

fn path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_render_defaults() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["render", "salary.json"])
        .assert()
        .success()
        .stdout(format!("{SALARY}\n"));
}

#[test]
fn test_render_without_type_names() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["render", "--no-explicit-type-names", "salary.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("p => p.Age < 30 ? p.Salary * 1.15 :"));
}

#[test]
fn test_render_line_width() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["render", "--line-width", "40", "salary.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  ? p.Salary * 1.15m\n"))
        .stdout(predicate::str::contains("\n    : p.Salary * 1.03m\n"));
}

#[test]
fn test_config_file_is_discovered() {
    let project = create_test_project();
    fs::write(
        path(&project, ".readexrc.json"),
        r#"{ "useExplicitTypeNames": false }"#,
    )
    .unwrap();

    cli()
        .current_dir(project.path())
        .args(["render", "salary.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("p => "));
}

#[test]
fn test_flags_override_config_file() {
    let project = create_test_project();
    fs::write(path(&project, "custom.toml"), "lineWidth = 200\n").unwrap();

    cli()
        .current_dir(project.path())
        .args(["--config", "custom.toml", "render", "--line-width", "40", "salary.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  : p.Age < 50\n"));
}

#[test]
fn test_render_multiple_files_as_json() {
    let project = create_test_project();
    let output = cli()
        .current_dir(project.path())
        .args(["render", "--format", "json", "salary.json", "null_safe.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(results[0]["file"], "salary.json");
    assert_eq!(results[0]["rendered"], SALARY);
    assert!(results[1]["rendered"].as_str().unwrap().ends_with(r#": "unknown""#));
}

#[test]
fn test_inconsistent_tree_fails() {
    let project = create_test_project();
    let broken = serde_json::to_string(&constant("oops", TypeRef::Int)).unwrap();
    fs::write(path(&project, "broken.json"), broken).unwrap();

    cli()
        .current_dir(project.path())
        .args(["render", "salary.json", "broken.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(SALARY))
        .stderr(predicate::str::contains("Type mismatch"))
        .stderr(predicate::str::contains("1 of 2 trees failed to render"));
}

#[test]
fn test_malformed_json_fails() {
    let project = create_test_project();
    fs::write(path(&project, "bad.json"), "{ \"kind\": \"nope\" }").unwrap();

    cli()
        .current_dir(project.path())
        .args(["render", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse expression tree"));
}

#[test]
fn test_invalid_indent_size_fails() {
    let project = create_test_project();
    cli()
        .current_dir(project.path())
        .args(["render", "--indent-size", "0", "salary.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("indentUnit"));
}

#[test]
fn test_config_init_and_show() {
    let project = TempDir::new().unwrap();

    cli()
        .current_dir(project.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path(&project, ".readexrc.json").exists());

    cli()
        .current_dir(project.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .current_dir(project.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));

    cli()
        .current_dir(project.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""useExplicitTypeNames": true"#));
}

#[test]
fn test_config_init_toml() {
    let project = TempDir::new().unwrap();
    cli()
        .current_dir(project.path())
        .args(["config", "init", "--format", "toml"])
        .assert()
        .success();

    let content = fs::read_to_string(path(&project, ".readexrc.toml")).unwrap();
    assert!(content.contains("showCapturedValues = true"));
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("useExplicitTypeNames"))
        .stdout(predicate::str::contains("lineWidth"));
}

#[test]
fn test_generate_completion() {
    cli()
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("readex"));
}
