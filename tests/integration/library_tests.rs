//! Library API tests: events, prompting and per-call options.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use scriptrun::env::EnvironmentSnapshot;
use scriptrun::prompt::{PromptError, VariableDefinition, VariableKind};
use scriptrun::runner::output::{collecting_sink, null_sink};
use scriptrun::{EventKind, ExecuteOptions, RunnerEvent, RunnerOptions, ScriptError, ScriptRunner};

use crate::integration::fixtures::{
    create_project, prompting_script, standard_scripts, LIFECYCLE_SCRIPT, PARAMS_SCRIPT,
};

fn record_events(runner: &ScriptRunner) -> Arc<Mutex<Vec<RunnerEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    for kind in EventKind::ALL {
        let events = Arc::clone(&events);
        runner.on(kind, move |event| events.lock().unwrap().push(event.clone()));
    }
    events
}

// ==================== Listing ====================

#[test]
fn test_script_entries() {
    let project = create_project(&standard_scripts());
    project.script("nested/deep.lua", LIFECYCLE_SCRIPT);

    let entries = project.runner().script_entries().unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["env.lua", "failing.lua", "lifecycle.lua", "nested/deep.lua", "params.lua"]
    );

    let failing = entries.iter().find(|e| e.name == "failing.lua").unwrap();
    assert_eq!(failing.description.as_deref(), Some("Always fails"));
}

#[test]
fn test_broken_script_is_still_listed() {
    let project = create_project(&[("broken.lua", "return {"), ("ok.lua", PARAMS_SCRIPT)]);

    let entries = project.runner().script_entries().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.description.is_none()));
}

#[test]
fn test_resolve_script_path() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();

    let path = runner.resolve_script_path("lifecycle").unwrap();
    assert_eq!(path, project.scripts_dir().join("lifecycle.lua"));

    let err = runner.resolve_script_path("lifecycl").unwrap_err();
    assert!(matches!(
        err,
        ScriptError::ScriptNotFoundWithSuggestions { .. }
    ));
}

// ==================== Events ====================

#[test]
fn test_success_events() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();
    let events = record_events(&runner);
    let script = project.scripts_dir().join("lifecycle.lua");

    let params = match json!({ "dryRun": true }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    runner
        .execute_script(
            &script,
            ExecuteOptions {
                params: params.clone(),
                ..ExecuteOptions::default()
            },
            Some(null_sink()),
        )
        .unwrap();

    let events = events.lock().unwrap();
    let kinds: Vec<EventKind> = events.iter().map(RunnerEvent::kind).collect();
    assert_eq!(kinds.first(), Some(&EventKind::BeforeExecute));
    assert_eq!(kinds.last(), Some(&EventKind::AfterExecute));
    assert_eq!(kinds.iter().filter(|k| **k == EventKind::Log).count(), 6);

    assert_eq!(
        events[0],
        RunnerEvent::BeforeExecute {
            script: script.clone(),
            params,
        }
    );
    assert_eq!(
        events.last().unwrap(),
        &RunnerEvent::AfterExecute {
            script,
            result: json!({ "answer": 42 }),
        }
    );
}

#[test]
fn test_error_event() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();
    let events = record_events(&runner);

    let result = runner.execute_script(
        project.scripts_dir().join("failing.lua"),
        ExecuteOptions::default(),
        Some(null_sink()),
    );
    assert!(result.is_err());

    let events = events.lock().unwrap();
    match events.last() {
        Some(RunnerEvent::Error { message, .. }) => assert!(message.contains("boom")),
        other => panic!("expected an error event, got {other:?}"),
    }
    assert!(!events
        .iter()
        .any(|e| e.kind() == EventKind::AfterExecute));
}

#[test]
fn test_missing_script_emits_error_without_before_event() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();
    let events = record_events(&runner);

    let err = runner
        .execute_script(
            project.scripts_dir().join("ghost.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap_err();
    assert!(matches!(err, ScriptError::ScriptNotFound { .. }));

    let kinds: Vec<EventKind> = events.lock().unwrap().iter().map(RunnerEvent::kind).collect();
    assert_eq!(kinds, vec![EventKind::Error]);
}

#[test]
fn test_off_removes_handler() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();
    let count = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&count);
    let id = runner.on(EventKind::AfterExecute, move |_| *counter.lock().unwrap() += 1);

    let script = project.scripts_dir().join("params.lua");
    runner
        .execute_script(&script, ExecuteOptions::default(), Some(null_sink()))
        .unwrap();
    assert!(runner.off(EventKind::AfterExecute, id));
    runner
        .execute_script(&script, ExecuteOptions::default(), Some(null_sink()))
        .unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
    assert!(!runner.off(EventKind::AfterExecute, id));
}

#[test]
fn test_custom_logger_and_log_events_see_same_lines() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();
    let events = record_events(&runner);
    let (sink, lines) = collecting_sink();

    runner
        .execute_script(
            project.scripts_dir().join("lifecycle.lua"),
            ExecuteOptions::default(),
            Some(sink),
        )
        .unwrap();

    let from_events: Vec<_> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            RunnerEvent::Log { line, .. } => Some(line.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(*lines.lock().unwrap(), from_events);
}

// ==================== Per-call Options ====================

#[test]
fn test_call_env_and_context_overrides() {
    let project = create_project(&[(
        "show.lua",
        "return function(ctx) return { region = ctx.env.SCRIPTRUN_TEST_CALL_REGION, tmp = ctx.tmpDir } end",
    )]);
    let runner = project.runner();

    let overrides = match json!({ "tmpDir": "/override" }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let result = runner
        .execute_script(
            project.scripts_dir().join("show.lua"),
            ExecuteOptions {
                env: [("SCRIPTRUN_TEST_CALL_REGION".to_string(), "ap".to_string())].into(),
                context_overrides: overrides,
                ..ExecuteOptions::default()
            },
            Some(null_sink()),
        )
        .unwrap();

    assert_eq!(result, json!({ "region": "ap", "tmp": "/override" }));
}

#[test]
fn test_initial_env_is_visible() {
    let project = create_project(&[(
        "show.lua",
        "return function(ctx) return ctx.env.SCRIPTRUN_TEST_INITIAL end",
    )]);
    let runner = ScriptRunner::new(RunnerOptions {
        initial_env: [("SCRIPTRUN_TEST_INITIAL".to_string(), "seed".to_string())].into(),
        ..project.runner_options()
    })
    .unwrap();

    assert_eq!(runner.environment().get("SCRIPTRUN_TEST_INITIAL"), Some("seed"));
    let result = runner
        .execute_script(
            project.scripts_dir().join("show.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap();
    assert_eq!(result, json!("seed"));
}

#[test]
fn test_console_interception_disabled() {
    let project = create_project(&[(
        "console.lua",
        "return function(ctx) return ctx.console == nil end",
    )]);
    let runner = ScriptRunner::new(RunnerOptions {
        console_interception: false,
        ..project.runner_options()
    })
    .unwrap();

    let result = runner
        .execute_script(
            project.scripts_dir().join("console.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap();
    assert_eq!(result, json!(true));
}

#[test]
fn test_tmp_dir_is_created() {
    let project = create_project(&standard_scripts());
    let runner = project.runner();
    assert!(!project.path().join("tmp").exists());

    runner
        .execute_script(
            project.scripts_dir().join("params.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap();
    assert!(project.path().join("tmp").is_dir());
}

// ==================== Prompting ====================

#[test]
fn test_prompter_fills_declared_variable() {
    let variable = "SCRIPTRUN_TEST_PROMPTED_TOKEN";
    let project = create_project(&[("needs.lua", prompting_script(variable).as_str())]);
    let asked = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&asked);
    let prompter = move |variables: &[VariableDefinition], _env: &EnvironmentSnapshot| {
        seen.lock().unwrap().extend(variables.iter().cloned());
        Ok::<_, PromptError>(
            variables
                .iter()
                .map(|v| (v.name.clone(), "t0k3n".to_string()))
                .collect::<HashMap<_, _>>(),
        )
    };
    let runner = ScriptRunner::new(RunnerOptions {
        prompter: Box::new(prompter),
        ..project.runner_options()
    })
    .unwrap();

    let result = runner
        .execute_script(
            project.scripts_dir().join("needs.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap();

    assert_eq!(result, json!({ "value": "t0k3n" }));
    let asked = asked.lock().unwrap();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].name, variable);
    assert_eq!(asked[0].kind, VariableKind::Password);
    assert_eq!(asked[0].message, "Value?");
}

#[test]
fn test_prompter_not_called_when_variable_is_set() {
    let variable = "SCRIPTRUN_TEST_PRESET_TOKEN";
    let project = create_project(&[("needs.lua", prompting_script(variable).as_str())]);
    let calls = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&calls);
    let prompter = move |_: &[VariableDefinition], _: &EnvironmentSnapshot| {
        *counter.lock().unwrap() += 1;
        Ok::<_, PromptError>(HashMap::new())
    };
    let runner = ScriptRunner::new(RunnerOptions {
        initial_env: [(variable.to_string(), "preset".to_string())].into(),
        prompter: Box::new(prompter),
        ..project.runner_options()
    })
    .unwrap();

    let result = runner
        .execute_script(
            project.scripts_dir().join("needs.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap();

    assert_eq!(result, json!({ "value": "preset" }));
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_cancelled_prompt_skips_execution() {
    let variable = "SCRIPTRUN_TEST_CANCELLED_TOKEN";
    let project = create_project(&[("needs.lua", prompting_script(variable).as_str())]);

    let prompter = |_: &[VariableDefinition], _: &EnvironmentSnapshot| {
        Err::<HashMap<String, String>, _>(PromptError::Cancelled)
    };
    let runner = ScriptRunner::new(RunnerOptions {
        prompter: Box::new(prompter),
        ..project.runner_options()
    })
    .unwrap();
    let (sink, lines) = collecting_sink();

    let err = runner
        .execute_script(
            project.scripts_dir().join("needs.lua"),
            ExecuteOptions::default(),
            Some(sink),
        )
        .unwrap_err();

    assert!(matches!(err, ScriptError::PromptCancelled));
    assert!(lines.lock().unwrap().is_empty());
}

#[test]
fn test_caller_prompts_come_first() {
    let variable = "SCRIPTRUN_TEST_ORDERED_TOKEN";
    let project = create_project(&[("needs.lua", prompting_script(variable).as_str())]);
    let asked = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&asked);
    let prompter = move |variables: &[VariableDefinition], _: &EnvironmentSnapshot| {
        seen.lock()
            .unwrap()
            .extend(variables.iter().map(|v| v.name.clone()));
        Ok::<_, PromptError>(
            variables
                .iter()
                .map(|v| (v.name.clone(), "x".to_string()))
                .collect::<HashMap<_, _>>(),
        )
    };
    let runner = ScriptRunner::new(RunnerOptions {
        env_prompts: vec![VariableDefinition::input("SCRIPTRUN_TEST_ORDERED_REGION")],
        prompter: Box::new(prompter),
        ..project.runner_options()
    })
    .unwrap();

    runner
        .execute_script(
            project.scripts_dir().join("needs.lua"),
            ExecuteOptions::default(),
            Some(null_sink()),
        )
        .unwrap();

    assert_eq!(
        *asked.lock().unwrap(),
        vec!["SCRIPTRUN_TEST_ORDERED_REGION".to_string(), variable.to_string()]
    );
}
