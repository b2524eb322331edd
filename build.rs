//! Build script for scriptrun.
//!
//! Generates a man page using clap_mangen.

use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

/// Mirror of the CLI definition for man page generation.
///
/// The library is not available to build scripts, so the flags are repeated here.
#[derive(Parser)]
#[command(name = "scriptrun")]
#[command(
    author,
    version,
    about = "Discover and run Lua scripts with a setup/run/cleanup lifecycle"
)]
#[command(
    long_about = "scriptrun discovers Lua scripts in a project, loads scriptrun.config.toml \
    and .env files, asks for missing variables and runs each script through \
    tearUp, execute (or default) and tearDown.\n\n\
    Run without arguments to open the interactive TUI. Use `scriptrun exec <path>` to run \
    one script, or `scriptrun run --list` to list them."
)]
struct Cli {
    /// Path to config file (default: ./scriptrun.config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory containing scripts
    #[arg(long, global = true, value_name = "DIR")]
    scripts_dir: Option<PathBuf>,

    /// Directory for temporary files
    #[arg(long, global = true, value_name = "DIR")]
    tmp_dir: Option<PathBuf>,

    /// Set an environment variable (can be repeated)
    #[arg(long = "env", global = true, value_name = "KEY=VALUE")]
    env: Vec<String>,

    /// Variables to prompt for when not set (comma-separated)
    #[arg(long, global = true, value_name = "NAMES", value_delimiter = ',')]
    env_prompts: Vec<String>,

    /// Change to this directory before doing anything else
    #[arg(long, global = true, value_name = "DIR")]
    pwd: Option<PathBuf>,

    /// Do not provide ctx.console to scripts
    #[arg(long, global = true)]
    no_console: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
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
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_name = "SHELL", value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SCRIPTRUN_GEN_MANPAGE");

    // Only generate man pages for release builds or when explicitly requested
    let profile = env::var("PROFILE").unwrap_or_default();
    if profile != "release" && env::var("SCRIPTRUN_GEN_MANPAGE").is_err() {
        return;
    }

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };

    let man = clap_mangen::Man::new(Cli::command());
    let mut buffer = Vec::new();
    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to generate man page: {e}");
        return;
    }

    let man_path = out_dir.join("scriptrun.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {e}");
        return;
    }

    // Also copy to docs directory for distribution
    if let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR") {
        let docs_dir = PathBuf::from(manifest_dir).join("docs");
        if docs_dir.exists() {
            let _ = fs::copy(&man_path, docs_dir.join("scriptrun.1"));
        }
    }
}
