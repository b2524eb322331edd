//! Configuration file loading and layer resolution.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::{absolute_from, Config, ConfigLayer};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "scriptrun.config.toml";

/// Load a configuration layer from the specified path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_layer(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let layer: ConfigLayer = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(layer)
}

/// Resolve the effective configuration relative to the process working directory.
///
/// See [`resolve_config_in`] for the merge order.
pub fn resolve_config(
    explicit_path: Option<&Path>,
    cli_overrides: ConfigLayer,
    defaults_override: ConfigLayer,
) -> Config {
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_in(&base_dir, explicit_path, cli_overrides, defaults_override)
}

/// Resolve the effective configuration.
///
/// Layers, lowest to highest priority:
/// 1. built-in defaults
/// 2. `defaults_override` (programmatic caller defaults)
/// 3. the config file (`explicit_path`, or `scriptrun.config.toml` in `base_dir`)
/// 4. `cli_overrides`
///
/// Relative paths are resolved against `base_dir` after merging. A missing
/// config file is not an error, and a broken one degrades to the other layers
/// with a warning.
pub fn resolve_config_in(
    base_dir: &Path,
    explicit_path: Option<&Path>,
    cli_overrides: ConfigLayer,
    defaults_override: ConfigLayer,
) -> Config {
    let mut config = Config::default();
    config.apply(defaults_override);

    let config_path = match explicit_path {
        Some(path) => absolute_from(base_dir, path),
        None => base_dir.join(CONFIG_FILE_NAME),
    };

    if config_path.is_file() {
        match load_config_layer(&config_path) {
            Ok(user_layer) => {
                log::debug!("Loaded config from {}", config_path.display());
                config.apply(user_layer);
                config.config_path = Some(config_path);
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config at {}, using defaults: {:#}",
                    config_path.display(),
                    e
                );
            }
        }
    } else {
        log::debug!(
            "No config file at {}, using defaults",
            config_path.display()
        );
    }

    config.apply(cli_overrides);
    config.absolutize(base_dir);
    config
}

/// Generate an example configuration file with all options documented.
pub fn generate_example_config() -> String {
    r#"# scriptrun configuration
# Place this file as scriptrun.config.toml in the directory you run scriptrun from.

# Directory containing your .lua scripts
scriptsDir = "scripts"

# Scratch directory handed to scripts as ctx.tmpDir
tmpDir = "tmp"

# Env files loaded in order; later files override earlier ones
envFiles = [".env"]

# Glob patterns (relative to scriptsDir) to hide from discovery
excludePatterns = [
    # "helpers/**",
    # "*.test.lua",
]

# Parameters spread into every script context.
# ${NAME} is replaced with the value of NAME from the environment.
[defaultParams]
# apiUrl = "${API_HOST}/v1"

# TUI appearance
[appearance]
# Color theme: "default", "minimal", "none"
theme = "default"
"#
    .to_string()
}
