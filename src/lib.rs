//! scriptrun - run Lua scripts with a setup/run/cleanup lifecycle
//!
//! Discovers `.lua` scripts in a project, loads configuration and `.env`
//! files, asks for missing variables, and runs each script through
//! `tearUp` → `execute`/`default` → `tearDown`.
//!
//! # Features
//!
//! - **Fresh every time**: each run reloads the script from disk in a new Lua state
//! - **Layered config**: built-in defaults, caller defaults, `scriptrun.config.toml`, CLI flags
//! - **Environment**: `.env` files, process environment, `${VAR}` interpolation in default params
//! - **Three front ends**: a CLI, a TUI, and the [`ScriptRunner`] library API
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface argument parsing
//! - [`config`] - Configuration file loading and layering
//! - [`discovery`] - Recursive script discovery with exclude globs
//! - [`env`] - Environment loading and interpolation
//! - [`error`] - Error types and exit codes
//! - [`events`] - Observer registry for runner events
//! - [`filter`] - Fuzzy filtering for the script list
//! - [`init`] - Project scaffolding
//! - [`library`] - The embeddable [`ScriptRunner`]
//! - [`prompt`] - Variable declarations and prompting
//! - [`runner`] - Lua module loading and lifecycle execution
//! - [`tui`] - Terminal user interface
//! - [`utils`] - Path and terminal utilities
//!
//! # Example
//!
//! ```no_run
//! use scriptrun::{ExecuteOptions, RunnerOptions, ScriptRunner};
//!
//! let runner = ScriptRunner::new(RunnerOptions::default())?;
//! let script = runner.resolve_script_path("example.lua")?;
//! let result = runner.execute_script(&script, ExecuteOptions::default(), None)?;
//! println!("{result}");
//! # Ok::<(), scriptrun::ScriptError>(())
//! ```

/// CLI argument definitions.
pub mod cli;

/// Configuration system for loading and merging settings.
pub mod config;

/// Script discovery.
pub mod discovery;

/// Environment loading.
pub mod env;

/// Error types and result helpers.
pub mod error;

/// Runner events.
pub mod events;

/// Fuzzy filtering for scripts.
pub mod filter;

/// Project scaffolding.
pub mod init;

/// Library surface.
pub mod library;

/// Variable prompting.
pub mod prompt;

/// Script execution.
pub mod runner;

/// Terminal user interface.
pub mod tui;

/// Path and terminal utilities.
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Config;
pub use error::{Result, ScriptError};
pub use events::{EventKind, RunnerEvent};
pub use library::{ExecuteOptions, RunnerOptions, ScriptEntry, ScriptRunner};
pub use runner::{LogLevel, LogLine, LogSink};
