//! Snapshot tests using insta.
//!
//! These tests capture and verify the output format of various commands.

use std::process::Output;

use assert_cmd::Command;

use crate::integration::fixtures::{create_project, standard_scripts, TestProject};

/// Get a Command for the scriptrun binary, running inside `project`.
fn scriptrun(project: &TestProject) -> Command {
    let mut cmd = Command::cargo_bin("scriptrun").expect("Failed to find scriptrun binary");
    cmd.current_dir(project.path()).env_remove("RUST_LOG");
    cmd
}

/// Replace the temporary project path and strip surrounding blank lines.
fn normalize(text: &str, project: &TestProject) -> String {
    let mut text = text.to_string();
    if let Ok(canonical) = project.path().canonicalize() {
        text = text.replace(&canonical.display().to_string(), "[PROJECT]");
    }
    text = text.replace(&project.path().display().to_string(), "[PROJECT]");
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn stdout(output: &Output, project: &TestProject) -> String {
    normalize(&String::from_utf8_lossy(&output.stdout), project)
}

fn stderr(output: &Output, project: &TestProject) -> String {
    normalize(&String::from_utf8_lossy(&output.stderr), project)
}

// ==================== List Output Snapshots ====================

#[test]
fn test_snapshot_list() {
    let project = create_project(&standard_scripts());
    let output = scriptrun(&project)
        .args(["run", "--list"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stdout(&output, &project), @r"
    Available scripts in [PROJECT]/scripts:

      env.lua
      failing.lua    Always fails
      lifecycle.lua  Exercise every lifecycle phase
      params.lua

    4 scripts found
    ");
}

#[test]
fn test_snapshot_list_empty() {
    let project = create_project(&[]);
    let output = scriptrun(&project)
        .args(["run", "--list"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stdout(&output, &project), @r"
    Available scripts in [PROJECT]/scripts:


    0 scripts found
    ");
}

// ==================== Exec Output Snapshots ====================

#[test]
fn test_snapshot_exec_lifecycle() {
    let project = create_project(&standard_scripts());
    let output = scriptrun(&project)
        .args(["exec", "lifecycle.lua"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stdout(&output, &project), @r#"
    Running tearUp()
    setting up
    Running execute()
    value 1
    Running tearDown()
    answer was 42

    Script completed successfully
    {
      "answer": 42
    }
    "#);
}

#[test]
fn test_snapshot_exec_null_result() {
    let project = create_project(&[("quiet.lua", "return function(ctx) ctx.log('hi') end")]);
    let output = scriptrun(&project)
        .args(["exec", "quiet"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stdout(&output, &project), @r"
    Running default()
    hi

    Script completed successfully
    ");
}

// ==================== Error Output Snapshots ====================

#[test]
fn test_snapshot_error_scripts_dir_missing() {
    let project = TestProject::empty();
    let output = scriptrun(&project)
        .args(["run", "--list"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stderr(&output, &project), @r"
    Error: Scripts directory not found: [PROJECT]/scripts

    Tip: Run 'scriptrun init' or pass --scripts-dir.
    ");
}

#[test]
fn test_snapshot_error_script_not_found_with_suggestion() {
    let project = create_project(&standard_scripts());
    let output = scriptrun(&project)
        .args(["exec", "lifecycl"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stderr(&output, &project), @r"
    Error: Script not found: lifecycl

    Did you mean: 'lifecycle.lua'?

    Run 'scriptrun run --list' to see all available scripts.
    ");
}

#[test]
fn test_snapshot_error_missing_entry_point() {
    let project = create_project(&[("empty.lua", "return { description = 'x' }")]);
    let output = scriptrun(&project)
        .args(["exec", "empty.lua"])
        .output()
        .expect("Failed to run scriptrun");

    insta::assert_snapshot!(stderr(&output, &project), @r"
    Error: Script [PROJECT]/scripts/empty.lua must export either an 'execute' function or a 'default' function
    ");
}
