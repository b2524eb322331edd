//! CLI argument definitions for scriptrun.
//!
//! Uses clap with derive macros for argument parsing.
//!
//! # Example
//!
//! ```no_run
//! use scriptrun::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! println!("Explicit env: {:?}", cli.explicit_env());
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use serde_json::Value;

use crate::config::{ConfigLayer, Params};
use crate::prompt::VariableDefinition;

/// Discover and run Lua scripts with a setup/run/cleanup lifecycle.
#[derive(Parser, Debug)]
#[command(name = "scriptrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (default: ./scriptrun.config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory containing scripts
    #[arg(long, global = true, value_name = "DIR")]
    pub scripts_dir: Option<PathBuf>,

    /// Directory for temporary files
    #[arg(long, global = true, value_name = "DIR")]
    pub tmp_dir: Option<PathBuf>,

    /// Set an environment variable (can be repeated)
    #[arg(long = "env", global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,

    /// Variables to prompt for when not set (comma-separated)
    #[arg(long, global = true, value_name = "NAMES", value_delimiter = ',')]
    pub env_prompts: Vec<String>,

    /// Change to this directory before doing anything else
    #[arg(long, global = true, value_name = "DIR")]
    pub pwd: Option<PathBuf>,

    /// Do not provide ctx.console to scripts
    #[arg(long, global = true)]
    pub no_console: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a config file, a scripts directory and an example script
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Browse and run scripts interactively
    Run {
        /// List scripts non-interactively (no TUI)
        #[arg(short, long)]
        list: bool,
    },

    /// Run a single script
    Exec {
        /// Script path, absolute, relative to the working directory or to the scripts directory
        #[arg(value_name = "PATH")]
        path: String,

        /// Parameter passed as ctx.params (can be repeated, values may be JSON)
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_name = "SHELL", value_enum)]
        shell: CliShell,
    },
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    Powershell,
    /// Elvish shell
    Elvish,
}

/// Parse a `KEY=value` pair. The value may be empty or contain `=`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        Some(_) => Err(format!("missing key in `{s}`")),
        None => Err(format!("expected KEY=VALUE, no `=` found in `{s}`")),
    }
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The command to run; `run` when none is given.
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Run { list: false })
    }

    /// Directory flags as the top configuration layer.
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            scripts_dir: self.scripts_dir.clone(),
            tmp_dir: self.tmp_dir.clone(),
            ..ConfigLayer::new()
        }
    }

    /// `--env` pairs; a repeated key keeps its last value.
    pub fn explicit_env(&self) -> HashMap<String, String> {
        self.env.iter().cloned().collect()
    }

    /// `--env-prompts` names as plain-text variable definitions.
    pub fn env_prompt_definitions(&self) -> Vec<VariableDefinition> {
        self.env_prompts
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(VariableDefinition::input)
            .collect()
    }

    /// Generate shell completions and write to stdout.
    pub fn generate_completions(shell: CliShell) {
        let mut cmd = Cli::command();
        let shell = match shell {
            CliShell::Bash => Shell::Bash,
            CliShell::Zsh => Shell::Zsh,
            CliShell::Fish => Shell::Fish,
            CliShell::Powershell => Shell::PowerShell,
            CliShell::Elvish => Shell::Elvish,
        };
        generate(shell, &mut cmd, "scriptrun", &mut std::io::stdout());
    }
}

/// Turn `--param` pairs into a parameter bag.
///
/// Values that parse as JSON keep their type (`count=3` is a number);
/// anything else is a string.
pub fn params_from_pairs(pairs: &[(String, String)]) -> Params {
    pairs
        .iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect()
}
