//! Integration tests for configuration layering and environment loading.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::json;

use scriptrun::config::{resolve_config_in, ConfigLayer, Params, Theme};
use scriptrun::env::load_environment_with;
use scriptrun::RunnerOptions;

use crate::integration::fixtures::{create_project, TestProject, ENV_SCRIPT};

fn params(value: serde_json::Value) -> Params {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

// ==================== Config Layering ====================

#[test]
fn test_defaults_without_config_file() {
    let project = TestProject::empty();
    let config = resolve_config_in(project.path(), None, ConfigLayer::new(), ConfigLayer::new());

    assert_eq!(config.scripts_dir, project.path().join("scripts"));
    assert_eq!(config.tmp_dir, project.path().join("tmp"));
    assert_eq!(config.env_files, vec![project.path().join(".env")]);
    assert!(config.config_path.is_none());
}

#[test]
fn test_config_file_overrides_defaults() {
    let project = TestProject::empty();
    project.config(
        r#"
scriptsDir = "jobs"
envFiles = [".env", ".env.local"]
excludePatterns = ["**/*.test.lua"]

[defaultParams]
retries = 3

[appearance]
theme = "minimal"
"#,
    );

    let config = resolve_config_in(project.path(), None, ConfigLayer::new(), ConfigLayer::new());

    assert_eq!(config.scripts_dir, project.path().join("jobs"));
    assert_eq!(
        config.env_files,
        vec![project.path().join(".env"), project.path().join(".env.local")]
    );
    assert_eq!(config.exclude_patterns, vec!["**/*.test.lua".to_string()]);
    assert_eq!(config.default_params, params(json!({ "retries": 3 })));
    assert_eq!(config.appearance.theme, Theme::Minimal);
    assert_eq!(
        config.config_path,
        Some(project.path().join("scriptrun.config.toml"))
    );
}

#[test]
fn test_snake_case_keys_are_accepted() {
    let project = TestProject::empty();
    project.config("scripts_dir = \"snake\"\n");

    let config = resolve_config_in(project.path(), None, ConfigLayer::new(), ConfigLayer::new());
    assert_eq!(config.scripts_dir, project.path().join("snake"));
}

#[test]
fn test_layer_precedence() {
    let project = TestProject::empty();
    project.config("scriptsDir = \"from-file\"\ntmpDir = \"tmp-file\"\n");

    let caller_defaults = ConfigLayer {
        scripts_dir: Some(PathBuf::from("from-caller")),
        tmp_dir: Some(PathBuf::from("tmp-caller")),
        exclude_patterns: Some(vec!["caller/**".to_string()]),
        ..ConfigLayer::new()
    };
    let cli = ConfigLayer {
        scripts_dir: Some(PathBuf::from("from-cli")),
        ..ConfigLayer::new()
    };

    let config = resolve_config_in(project.path(), None, cli, caller_defaults);

    // CLI beats the file, the file beats caller defaults
    assert_eq!(config.scripts_dir, project.path().join("from-cli"));
    assert_eq!(config.tmp_dir, project.path().join("tmp-file"));
    // Caller defaults still beat built-in defaults
    assert_eq!(config.exclude_patterns, vec!["caller/**".to_string()]);
}

#[test]
fn test_explicit_config_path() {
    let project = TestProject::empty();
    project.file("conf/custom.toml", "scriptsDir = \"custom\"\n");
    project.config("scriptsDir = \"ignored\"\n");

    let config = resolve_config_in(
        project.path(),
        Some(PathBuf::from("conf/custom.toml").as_path()),
        ConfigLayer::new(),
        ConfigLayer::new(),
    );

    assert_eq!(config.scripts_dir, project.path().join("custom"));
    assert_eq!(
        config.config_path,
        Some(project.path().join("conf/custom.toml"))
    );
}

#[test]
fn test_broken_config_falls_back() {
    let project = TestProject::empty();
    project.config("scriptsDir = [not toml");

    let cli = ConfigLayer {
        tmp_dir: Some(PathBuf::from("scratch")),
        ..ConfigLayer::new()
    };
    let config = resolve_config_in(project.path(), None, cli, ConfigLayer::new());

    assert_eq!(config.scripts_dir, project.path().join("scripts"));
    assert_eq!(config.tmp_dir, project.path().join("scratch"));
    assert!(config.config_path.is_none());
}

#[test]
fn test_absolute_paths_are_kept() {
    let project = TestProject::empty();
    let elsewhere = TestProject::empty();

    let cli = ConfigLayer {
        scripts_dir: Some(elsewhere.path().to_path_buf()),
        ..ConfigLayer::new()
    };
    let config = resolve_config_in(project.path(), None, cli, ConfigLayer::new());
    assert_eq!(config.scripts_dir, elsewhere.path());
}

// ==================== Environment ====================

#[test]
fn test_env_file_order_and_precedence() {
    let project = TestProject::empty();
    let base = project.file(".env", "A=base\nB=base\nC=base\n");
    let local = project.file(".env.local", "B=local\nC=local\n");

    let ambient = vec![("C".to_string(), "process".to_string())];
    let explicit: HashMap<String, String> = [("D".to_string(), "explicit".to_string())].into();

    let loaded = load_environment_with(&[base, local], ambient, &explicit, &Params::new());

    assert_eq!(loaded.env.get("A"), Some("base"));
    assert_eq!(loaded.env.get("B"), Some("local"));
    assert_eq!(loaded.env.get("C"), Some("process"));
    assert_eq!(loaded.env.get("D"), Some("explicit"));
}

#[test]
fn test_missing_env_files_are_skipped() {
    let project = TestProject::empty();
    let loaded = load_environment_with(
        &[project.path().join(".env.missing")],
        Vec::new(),
        &HashMap::new(),
        &Params::new(),
    );
    assert!(loaded.env.is_empty());
}

#[test]
fn test_default_params_are_interpolated() {
    let project = TestProject::empty();
    let env_file = project.file(".env", "API_HOST=api.example.com\n");

    let defaults = params(json!({
        "baseUrl": "https://${API_HOST}/v1",
        "retries": 2,
        "missing": "${NOT_SET}",
    }));
    let loaded = load_environment_with(&[env_file], Vec::new(), &HashMap::new(), &defaults);

    assert_eq!(loaded.params["baseUrl"], json!("https://api.example.com/v1"));
    assert_eq!(loaded.params["retries"], json!(2));
    assert_eq!(loaded.params["missing"], json!(""));
    assert_eq!(loaded.env.get("baseUrl"), Some("https://api.example.com/v1"));
    assert_eq!(loaded.env.get("retries"), Some("2"));
}

// ==================== Runner Integration ====================

#[test]
fn test_runner_reads_config_file() {
    let project = create_project(&[]);
    project.file("jobs/env.lua", ENV_SCRIPT);
    project.config("scriptsDir = \"jobs\"\n");

    let runner = scriptrun::ScriptRunner::new(RunnerOptions {
        config_path: Some(project.path().join("scriptrun.config.toml")),
        env_files: Some(Vec::new()),
        ..RunnerOptions::default()
    })
    .unwrap();

    // Relative paths resolve against the process working directory
    assert!(runner.config().scripts_dir.ends_with("jobs"));
    assert_eq!(
        runner.config().config_path.as_deref(),
        Some(project.path().join("scriptrun.config.toml").as_path())
    );
}

#[test]
fn test_runner_default_params_reach_context() {
    let project = create_project(&[(
        "show.lua",
        "return function(ctx) return { url = ctx.baseUrl, fromEnv = ctx.env.baseUrl } end",
    )]);
    project.file(".env", "SCRIPTRUN_TEST_HOST=db.internal\n");

    let runner = scriptrun::ScriptRunner::new(RunnerOptions {
        default_params: Some(params(json!({ "baseUrl": "${SCRIPTRUN_TEST_HOST}:5432" }))),
        ..project.runner_options()
    })
    .unwrap();

    let result = runner
        .execute_script(
            project.scripts_dir().join("show.lua"),
            Default::default(),
            Some(scriptrun::runner::output::null_sink()),
        )
        .unwrap();

    assert_eq!(
        result,
        json!({ "url": "db.internal:5432", "fromEnv": "db.internal:5432" })
    );
}
