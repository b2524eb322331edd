//! Lifecycle execution tests through the runner module.

use std::fs;

use serde_json::json;

use scriptrun::env::EnvironmentSnapshot;
use scriptrun::runner::output::collecting_sink;
use scriptrun::runner::{run_script, EntryPoint, LogLevel, LogLine, ScriptContext, ScriptModule};
use scriptrun::ScriptError;

use crate::integration::fixtures::{
    create_project, FAILING_SCRIPT, LIFECYCLE_SCRIPT, NO_ENTRY_SCRIPT,
};

fn messages(lines: &[LogLine]) -> Vec<String> {
    lines.iter().map(|line| line.message.clone()).collect()
}

#[test]
fn test_phases_run_in_order() {
    let project = create_project(&[("lifecycle.lua", LIFECYCLE_SCRIPT)]);
    let (sink, lines) = collecting_sink();
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path()).with_log_sink(sink);

    let result = run_script(&project.scripts_dir().join("lifecycle.lua"), &context).unwrap();

    assert_eq!(result, json!({ "answer": 42 }));
    assert_eq!(
        messages(&lines.lock().unwrap()),
        vec![
            "Running tearUp()",
            "setting up",
            "Running execute()",
            "value 1",
            "Running tearDown()",
            "answer was 42",
        ]
    );
}

#[test]
fn test_error_in_main_phase_skips_teardown() {
    let project = create_project(&[(
        "fails.lua",
        r#"return {
  execute = function() error("nope") end,
  tearDown = function(ctx) ctx.log("cleaned") end,
}"#,
    )]);
    let (sink, lines) = collecting_sink();
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path()).with_log_sink(sink);

    let err = run_script(&project.scripts_dir().join("fails.lua"), &context).unwrap_err();
    assert!(matches!(err, ScriptError::Lua(_)));
    assert!(err.to_string().contains("nope"));

    let lines = lines.lock().unwrap();
    let last = lines.last().unwrap();
    assert_eq!(last.level, LogLevel::Error);
    assert!(last.message.starts_with("Error in execute():"));
    assert!(!messages(&lines).contains(&"cleaned".to_string()));
}

#[test]
fn test_teardown_error_fails_invocation() {
    let project = create_project(&[(
        "teardown.lua",
        r#"return {
  execute = function() return 1 end,
  tearDown = function() error("cleanup failed") end,
}"#,
    )]);
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path());

    let err = run_script(&project.scripts_dir().join("teardown.lua"), &context).unwrap_err();
    assert!(err.to_string().contains("cleanup failed"));
}

#[test]
fn test_failing_script_reports_phase() {
    let project = create_project(&[("failing.lua", FAILING_SCRIPT)]);
    let (sink, lines) = collecting_sink();
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path()).with_log_sink(sink);

    assert!(run_script(&project.scripts_dir().join("failing.lua"), &context).is_err());
    assert!(messages(&lines.lock().unwrap())
        .iter()
        .any(|m| m.starts_with("Error in execute():") && m.contains("boom")));
}

#[test]
fn test_missing_entry_point_runs_nothing() {
    let project = create_project(&[(
        "empty.lua",
        "return { tearUp = function(ctx) ctx.log('should not run') end }",
    )]);
    let (sink, lines) = collecting_sink();
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path()).with_log_sink(sink);

    let err = run_script(&project.scripts_dir().join("empty.lua"), &context).unwrap_err();
    assert!(matches!(err, ScriptError::MissingEntryPoint { .. }));
    assert!(lines.lock().unwrap().is_empty());
}

#[test]
fn test_syntax_error_is_a_load_error() {
    let project = create_project(&[("broken.lua", "return {")]);
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path());

    let err = run_script(&project.scripts_dir().join("broken.lua"), &context).unwrap_err();
    assert!(matches!(err, ScriptError::ModuleLoad { .. }));
}

#[test]
fn test_edits_are_picked_up_between_runs() {
    let project = create_project(&[("version.lua", "return function() return 1 end")]);
    let path = project.scripts_dir().join("version.lua");
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path());

    assert_eq!(run_script(&path, &context).unwrap(), json!(1));

    fs::write(&path, "return function() return 2 end").unwrap();
    assert_eq!(run_script(&path, &context).unwrap(), json!(2));
}

#[test]
fn test_globals_do_not_leak_between_runs() {
    let project = create_project(&[(
        "counter.lua",
        r#"return function()
  counter = (counter or 0) + 1
  return counter
end"#,
    )]);
    let path = project.scripts_dir().join("counter.lua");
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path());

    assert_eq!(run_script(&path, &context).unwrap(), json!(1));
    assert_eq!(run_script(&path, &context).unwrap(), json!(1));
}

#[test]
fn test_require_sibling_module() {
    let project = create_project(&[
        ("helpers.lua", "return { double = function(n) return n * 2 end }"),
        (
            "main.lua",
            "local helpers = require('helpers')\nreturn function() return helpers.double(21) end",
        ),
    ]);
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path());

    let result = run_script(&project.scripts_dir().join("main.lua"), &context).unwrap();
    assert_eq!(result, json!(42));
}

#[test]
fn test_console_levels() {
    let project = create_project(&[(
        "console.lua",
        r#"return function(ctx)
  ctx.console.info("i")
  ctx.console.warn("w")
  ctx.console.error("e")
  ctx.console.debug("d")
  ctx.console.log("l", { 1, 2 }, {}, nil, true)
end"#,
    )]);
    let (sink, lines) = collecting_sink();
    let context = ScriptContext::new(EnvironmentSnapshot::new(), project.path()).with_log_sink(sink);

    run_script(&project.scripts_dir().join("console.lua"), &context).unwrap();

    let lines = lines.lock().unwrap();
    // Skip the progress line
    let script_lines: Vec<_> = lines.iter().skip(1).cloned().collect();
    assert_eq!(
        script_lines,
        vec![
            LogLine::new(LogLevel::Info, "i"),
            LogLine::new(LogLevel::Warn, "w"),
            LogLine::new(LogLevel::Error, "e"),
            LogLine::new(LogLevel::Debug, "d"),
            LogLine::new(LogLevel::Log, "l [Array(2)] [Object] nil true"),
        ]
    );
}

#[test]
fn test_inspect_reads_static_facts() {
    let project = create_project(&[
        ("lifecycle.lua", LIFECYCLE_SCRIPT),
        ("empty.lua", NO_ENTRY_SCRIPT),
        ("fn.lua", "return function() return 1 end"),
    ]);

    let info = ScriptModule::inspect(&project.scripts_dir().join("lifecycle.lua")).unwrap();
    assert_eq!(
        info.description.as_deref(),
        Some("Exercise every lifecycle phase")
    );
    assert_eq!(info.entry_point, Some(EntryPoint::Execute));

    let info = ScriptModule::inspect(&project.scripts_dir().join("empty.lua")).unwrap();
    assert_eq!(info.entry_point, None);

    let info = ScriptModule::inspect(&project.scripts_dir().join("fn.lua")).unwrap();
    assert_eq!(info.entry_point, Some(EntryPoint::Default));
    assert!(info.description.is_none());
}
