//! The jargal binary: run and list against a temporary workspace

use super::test_utils::write_tree;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SETTINGS: &str = r#"
[logging]
color = false

[[generators]]
name = "greeting"
description = "Say hello"
templates = "templates"
destination = "out"

[[generators.prompts]]
name = "who"
"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("jargal.toml", SETTINGS),
            ("templates/hello.txt.hbs", "Hello, {{answers.who}}!"),
        ],
    );
    dir
}

fn jargal(workspace: &Path, args: &[&str]) -> Output {
    let isolated = workspace.join(".xdg");
    Command::new(env!("CARGO_BIN_EXE_jargal"))
        .env("XDG_CONFIG_HOME", &isolated)
        .env_remove("JARGAL_LOG")
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_run_named_generator_with_answers() {
    let dir = workspace();

    let output = jargal(
        dir.path(),
        &["run", "greeting", "--answer", "who=world", "--no-input"],
    );

    assert!(
        output.status.success(),
        "jargal run should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("out/hello.txt")).unwrap(),
        "Hello, world!"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generator 'greeting' wrote 1 file"));
}

#[test]
fn test_single_generator_runs_without_name() {
    let dir = workspace();
    let output = jargal(dir.path(), &["run", "--answer", "who=you", "--no-input"]);
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("out/hello.txt")).unwrap(),
        "Hello, you!"
    );
}

#[test]
fn test_second_run_conflicts_then_skips() {
    let dir = workspace();
    let args = ["run", "greeting", "--answer", "who=world", "--no-input"];
    assert!(jargal(dir.path(), &args).status.success());

    let conflict = jargal(dir.path(), &args);
    assert_eq!(conflict.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&conflict.stderr);
    assert!(stderr.contains("File already exists"));

    let mut skip_args = args.to_vec();
    skip_args.extend(["--mode", "skip-if-exists"]);
    let skipped = jargal(dir.path(), &skip_args);
    assert!(skipped.status.success());
    assert!(String::from_utf8_lossy(&skipped.stdout).contains("[SKIPPED]"));
}

#[test]
fn test_missing_answer_without_input_fails() {
    let dir = workspace();
    let output = jargal(dir.path(), &["run", "greeting", "--no-input"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No answer provided for 'who'"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_list_json() {
    let dir = workspace();
    let output = jargal(dir.path(), &["list", "--format", "json"]);
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["name"], "greeting");
    assert_eq!(listed[0]["description"], "Say hello");
}
