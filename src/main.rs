//! scriptrun - Lua script runner
//!
//! Entry point for the scriptrun CLI application.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::LevelFilter;

use scriptrun::cli::{params_from_pairs, Cli, Commands};
use scriptrun::error::{exit_code, ScriptError};
use scriptrun::init::init_project;
use scriptrun::prompt::DialoguerPrompter;
use scriptrun::runner::output::stdout_sink;
use scriptrun::utils::{change_working_directory, check_terminal_size, is_interactive};
use scriptrun::{ExecuteOptions, RunnerOptions, ScriptEntry, ScriptRunner};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Our own errors already carry a readable message
            if let Some(script_err) = err.downcast_ref::<ScriptError>() {
                print_error(&script_err.to_string());
                return ExitCode::from(script_err.exit_code() as u8);
            }
            print_error(&format!("{err:#}"));
            ExitCode::from(exit_code::FAILURE as u8)
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn print_error(message: &str) {
    eprintln!();
    eprintln!("{} {}", "Error:".red().bold(), message.red());
    eprintln!();
}

fn run(cli: Cli) -> Result<i32> {
    let command = cli.command_or_default();

    // Handle shell completions early
    if let Commands::Completions { shell } = command {
        Cli::generate_completions(shell);
        return Ok(exit_code::SUCCESS);
    }

    // Must happen before config and env files are resolved
    if let Some(dir) = &cli.pwd {
        change_working_directory(dir)?;
    }

    if cli.debug {
        print_debug_header(&cli);
    }

    match command {
        Commands::Init { force } => init(force),
        Commands::Run { list: true } => list_scripts(&build_runner(&cli)?),
        Commands::Run { list: false } => {
            if !is_interactive() {
                bail!("The TUI needs an interactive terminal; use `scriptrun run --list` or `scriptrun exec <path>`");
            }
            build_runner(&cli)?.run_tui()?;
            Ok(exit_code::SUCCESS)
        }
        Commands::Exec { path, params } => {
            let runner = build_runner(&cli)?;
            exec_script(&runner, &path, &params)
        }
        Commands::Completions { .. } => Ok(exit_code::SUCCESS),
    }
}

fn build_runner(cli: &Cli) -> Result<ScriptRunner> {
    let runner = ScriptRunner::new(RunnerOptions {
        config_path: cli.config.clone(),
        initial_env: cli.explicit_env(),
        env_prompts: cli.env_prompt_definitions(),
        console_interception: !cli.no_console,
        prompter: Box::new(DialoguerPrompter::new()),
        cli_overrides: cli.config_layer(),
        ..RunnerOptions::default()
    })?;

    if cli.debug {
        print_debug_config(&runner);
    }

    Ok(runner)
}

fn init(force: bool) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let report = init_project(&cwd, force)?;

    for path in &report.created {
        println!("  {} {}", "created".green(), display_relative(&cwd, path));
    }
    for path in &report.skipped {
        println!(
            "  {} {} (use --force to overwrite)",
            "exists".yellow(),
            display_relative(&cwd, path)
        );
    }

    println!();
    println!("Run {} to try it.", "scriptrun exec example.lua".cyan());
    Ok(exit_code::SUCCESS)
}

fn exec_script(runner: &ScriptRunner, name: &str, params: &[(String, String)]) -> Result<i32> {
    let path = runner.resolve_script_path(name)?;
    let options = ExecuteOptions {
        params: params_from_pairs(params),
        ..ExecuteOptions::default()
    };

    let result = runner.execute_script(&path, options, Some(stdout_sink()))?;

    println!();
    println!("{}", "Script completed successfully".green().bold());
    if !result.is_null() {
        let pretty =
            serde_json::to_string_pretty(&result).context("Failed to format script result")?;
        println!("{pretty}");
    }

    Ok(exit_code::SUCCESS)
}

/// List scripts in a nice format (non-TUI mode).
fn list_scripts(runner: &ScriptRunner) -> Result<i32> {
    let entries = runner.script_entries()?;

    println!(
        "{}",
        format!(
            "Available scripts in {}:",
            runner.config().scripts_dir.display()
        )
        .cyan()
        .bold()
    );
    println!();

    // Find the longest script name for alignment
    let max_name_len = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(40);

    for ScriptEntry {
        name, description, ..
    } in &entries
    {
        let padded = format!("{:width$}", name, width = max_name_len);
        match description {
            Some(desc) => println!(
                "  {}  {}",
                padded.green().bold(),
                truncate_string(desc, 60).dimmed()
            ),
            None => println!("  {}", padded.green().bold()),
        }
    }

    println!();
    let noun = if entries.len() == 1 { "script" } else { "scripts" };
    println!("{}", format!("{} {} found", entries.len(), noun).dimmed());

    Ok(exit_code::SUCCESS)
}

/// Truncate a string to a maximum length, adding ellipsis if needed.
/// Handles Unicode characters properly.
fn truncate_string(s: &str, max_len: usize) -> String {
    if max_len < 4 {
        return s.chars().take(max_len).collect();
    }

    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

fn display_relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ==================== Debug Functions ====================

/// Print debug header with version info.
fn print_debug_header(cli: &Cli) {
    eprintln!("=== scriptrun debug mode ===");
    eprintln!("Version: {}", env!("CARGO_PKG_VERSION"));
    match check_terminal_size() {
        Some(size) => eprintln!("Terminal: {}x{}", size.width, size.height),
        None => eprintln!("Terminal: <not a terminal>"),
    }
    eprintln!("Debug: CLI arguments = {cli:#?}");
    eprintln!();
}

/// Print the effective configuration.
fn print_debug_config(runner: &ScriptRunner) {
    let config = runner.config();
    eprintln!("Debug: Effective configuration:");
    match &config.config_path {
        Some(path) => eprintln!("  Config file: {}", path.display()),
        None => eprintln!("  Config file: <none, using defaults>"),
    }
    eprintln!("  Scripts dir: {}", config.scripts_dir.display());
    eprintln!("  Tmp dir: {}", config.tmp_dir.display());
    for file in &config.env_files {
        eprintln!("  Env file: {} (exists: {})", file.display(), file.exists());
    }
    if !config.exclude_patterns.is_empty() {
        eprintln!("  Exclude: {}", config.exclude_patterns.join(", "));
    }
    eprintln!("  Environment variables: {}", runner.environment().len());
    eprintln!();
}
