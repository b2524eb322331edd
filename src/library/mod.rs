//! Embeddable script runner.
//!
//! [`ScriptRunner`] ties configuration, environment, discovery, variable
//! prompting and execution together behind one object, and reports progress
//! through an [`EventBus`].
//!
//! ```no_run
//! use scriptrun::{ExecuteOptions, RunnerOptions, ScriptRunner};
//!
//! let runner = ScriptRunner::new(RunnerOptions::default())?;
//! for script in runner.list_scripts()? {
//!     println!("{}", script.display());
//! }
//! let result = runner.execute_script("scripts/hello.lua", ExecuteOptions::default(), None)?;
//! println!("{result}");
//! # Ok::<(), scriptrun::ScriptError>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::config::{resolve_config, Config, ConfigLayer, Params};
use crate::discovery::{discover_scripts, relative_name};
use crate::env::{load_environment, EnvironmentSnapshot, LoadedEnvironment};
use crate::error::{Result, ScriptError};
use crate::events::{EventBus, EventKind, HandlerId, RunnerEvent};
use crate::prompt::{apply_collected, negotiate, NoopPrompter, Prompter, VariableDefinition};
use crate::runner::output::{stdout_sink, tee};
use crate::runner::{run_module, LogLine, LogSink, ScriptContext, ScriptInfo, ScriptModule};
use crate::utils::{change_working_directory, find_script_file};

/// Options for [`ScriptRunner::new`].
///
/// `scripts_dir`, `tmp_dir`, `env_files`, `exclude_patterns` and
/// `default_params` are programmatic defaults: a config file overrides them.
/// `cli_overrides` sits above the config file.
pub struct RunnerOptions {
    pub scripts_dir: Option<PathBuf>,
    pub tmp_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub env_files: Option<Vec<PathBuf>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub default_params: Option<Params>,
    /// Explicit variables, above the process environment.
    pub initial_env: HashMap<String, String>,
    /// Variables to ask for before every script, in addition to its own.
    pub env_prompts: Vec<VariableDefinition>,
    /// Applied once, before configuration is resolved.
    pub working_directory: Option<PathBuf>,
    /// Whether scripts get `ctx.console`.
    pub console_interception: bool,
    pub prompter: Box<dyn Prompter + Send>,
    pub cli_overrides: ConfigLayer,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            scripts_dir: None,
            tmp_dir: None,
            config_path: None,
            env_files: None,
            exclude_patterns: None,
            default_params: None,
            initial_env: HashMap::new(),
            env_prompts: Vec::new(),
            working_directory: None,
            console_interception: true,
            prompter: Box::new(NoopPrompter),
            cli_overrides: ConfigLayer::new(),
        }
    }
}

/// Per-call options for [`ScriptRunner::execute_script`].
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Exposed to the script as `ctx.params`.
    pub params: Params,
    /// Variables for this call only, above the runner's environment.
    pub env: HashMap<String, String>,
    /// Top-level context fields that replace anything else of the same name.
    pub context_overrides: Params,
}

/// A discovered script with the facts shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub path: PathBuf,
    /// Path relative to the scripts directory, `/`-separated.
    pub name: String,
    pub description: Option<String>,
}

/// Runs scripts from one project.
pub struct ScriptRunner {
    config: Config,
    environment: LoadedEnvironment,
    env_prompts: Vec<VariableDefinition>,
    console_interception: bool,
    prompter: Mutex<Box<dyn Prompter + Send>>,
    events: Arc<EventBus>,
}

impl ScriptRunner {
    /// Resolve configuration and load the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::WorkingDirectoryNotFound`] if
    /// `working_directory` does not exist. Nothing else is resolved in that
    /// case.
    pub fn new(options: RunnerOptions) -> Result<Self> {
        if let Some(dir) = &options.working_directory {
            change_working_directory(dir)?;
        }

        let defaults = ConfigLayer {
            scripts_dir: options.scripts_dir,
            tmp_dir: options.tmp_dir,
            env_files: options.env_files,
            default_params: options.default_params,
            exclude_patterns: options.exclude_patterns,
            appearance: None,
        };
        let config = resolve_config(
            options.config_path.as_deref(),
            options.cli_overrides,
            defaults,
        );
        let environment = load_environment(
            &config.env_files,
            &options.initial_env,
            &config.default_params,
        );

        log::debug!(
            "Runner ready: scripts in {}, {} environment variables",
            config.scripts_dir.display(),
            environment.env.len()
        );

        Ok(Self {
            config,
            environment,
            env_prompts: options.env_prompts,
            console_interception: options.console_interception,
            prompter: Mutex::new(options.prompter),
            events: Arc::new(EventBus::new()),
        })
    }

    /// The effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The environment every invocation starts from.
    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.environment.env
    }

    /// Default parameters after interpolation.
    pub fn default_params(&self) -> &Params {
        &self.environment.params
    }

    /// Variables asked for before every script.
    pub fn env_prompts(&self) -> &[VariableDefinition] {
        &self.env_prompts
    }

    /// All scripts under the scripts directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ScriptsDirNotFound`] if the scripts directory
    /// does not exist.
    pub fn list_scripts(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.scripts_dir;
        if !dir.is_dir() {
            return Err(ScriptError::ScriptsDirNotFound { path: dir.clone() });
        }
        Ok(discover_scripts(dir, &self.config.exclude_patterns))
    }

    /// Discovered scripts with names and descriptions.
    ///
    /// Scripts that fail to load are still listed, without a description.
    pub fn script_entries(&self) -> Result<Vec<ScriptEntry>> {
        let scripts = self.list_scripts()?;
        Ok(scripts
            .into_iter()
            .map(|path| {
                let description = match ScriptModule::inspect(&path) {
                    Ok(info) => info.description,
                    Err(e) => {
                        log::debug!("Cannot inspect {}: {}", path.display(), e);
                        None
                    }
                };
                ScriptEntry {
                    name: relative_name(&self.config.scripts_dir, &path),
                    path,
                    description,
                }
            })
            .collect())
    }

    /// Map a user-supplied script name to a file.
    ///
    /// # Errors
    ///
    /// Returns a not-found error, with suggestions when some discovered
    /// script names are close.
    pub fn resolve_script_path(&self, name: &str) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        if let Some(path) = find_script_file(name, &cwd, &self.config.scripts_dir) {
            return Ok(path);
        }

        let known: Vec<String> = self
            .list_scripts()
            .unwrap_or_default()
            .iter()
            .map(|path| relative_name(&self.config.scripts_dir, path))
            .collect();
        let known: Vec<&str> = known.iter().map(String::as_str).collect();
        Err(ScriptError::script_not_found_with_suggestions(
            Path::new(name),
            &known,
        ))
    }

    /// Read a script's description, variables and entry point without running it.
    pub fn inspect_script(&self, path: &Path) -> Result<ScriptInfo> {
        ScriptModule::inspect(path)
    }

    /// Run a script with the runner's own prompter.
    ///
    /// Log lines go to `logger`, or to stdout when `None`, and are also
    /// emitted as `script:log` events.
    ///
    /// # Errors
    ///
    /// Any failure of the invocation. A `script:error` event is emitted
    /// before the error is returned.
    pub fn execute_script(
        &self,
        path: impl AsRef<Path>,
        options: ExecuteOptions,
        logger: Option<LogSink>,
    ) -> Result<Value> {
        let mut prompter = self.prompter.lock().unwrap_or_else(PoisonError::into_inner);
        self.execute_script_with_prompter(path, options, logger, prompter.as_mut())
    }

    /// Run a script, asking for missing variables through `prompter`.
    pub fn execute_script_with_prompter(
        &self,
        path: impl AsRef<Path>,
        options: ExecuteOptions,
        logger: Option<LogSink>,
        prompter: &mut dyn Prompter,
    ) -> Result<Value> {
        let path = path.as_ref();
        let outcome = self.invoke(path, options, logger, prompter);

        match &outcome {
            Ok(result) => self.events.emit(&RunnerEvent::AfterExecute {
                script: path.to_path_buf(),
                result: result.clone(),
            }),
            Err(e) => self.events.emit(&RunnerEvent::Error {
                script: path.to_path_buf(),
                message: e.to_string(),
            }),
        }

        outcome
    }

    fn invoke(
        &self,
        path: &Path,
        options: ExecuteOptions,
        logger: Option<LogSink>,
        prompter: &mut dyn Prompter,
    ) -> Result<Value> {
        if !path.is_file() {
            return Err(ScriptError::ScriptNotFound {
                path: path.to_path_buf(),
            });
        }

        self.events.emit(&RunnerEvent::BeforeExecute {
            script: path.to_path_buf(),
            params: options.params.clone(),
        });

        let mut env = self.environment.env.clone();
        env.extend(options.env);

        let module = ScriptModule::load(path)?;
        let collected = negotiate(&self.env_prompts, &module.variables(), &env, prompter)?;
        apply_collected(&collected, &mut env);

        let tmp_dir = &self.config.tmp_dir;
        fs::create_dir_all(tmp_dir).map_err(|e| ScriptError::io("create directory", tmp_dir, e))?;

        let context = ScriptContext::new(env, tmp_dir)
            .with_config_path(self.config.config_path.as_deref())
            .with_params(options.params)
            .with_default_params(self.environment.params.clone())
            .with_overrides(options.context_overrides)
            .with_console(self.console_interception)
            .with_log_sink(self.event_sink(path, logger.unwrap_or_else(stdout_sink)));

        run_module(&module, &context)
    }

    /// Wrap `logger` so every line is also emitted as a `script:log` event.
    fn event_sink(&self, path: &Path, logger: LogSink) -> LogSink {
        let events = Arc::clone(&self.events);
        let script = path.to_path_buf();
        let to_events: LogSink = Arc::new(move |line: &LogLine| {
            events.emit(&RunnerEvent::Log {
                script: script.clone(),
                line: line.clone(),
            });
        });
        tee(logger, to_events)
    }

    /// Register an event handler.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> HandlerId
    where
        F: Fn(&RunnerEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, handler)
    }

    /// Remove an event handler. Returns whether it was registered.
    pub fn off(&self, kind: EventKind, id: HandlerId) -> bool {
        self.events.off(kind, id)
    }

    /// Emit an event to registered handlers.
    pub fn emit(&self, event: &RunnerEvent) {
        self.events.emit(event);
    }

    /// Start the interactive terminal UI.
    pub fn run_tui(&self) -> Result<()> {
        self.events.emit(&RunnerEvent::TuiBeforeStart);
        let outcome = crate::tui::run(self);
        self.events.emit(&RunnerEvent::TuiAfterEnd);
        outcome
    }
}
