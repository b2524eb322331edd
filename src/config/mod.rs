//! Configuration module for scriptrun.
//!
//! Resolves the effective configuration from multiple layers:
//! - CLI overrides (highest priority)
//! - `scriptrun.config.toml` (or the `--config` path)
//! - Programmatic defaults supplied by library callers
//! - Built-in defaults

pub mod file;
mod types;

pub use file::{
    generate_example_config, load_config_layer, resolve_config, resolve_config_in,
    CONFIG_FILE_NAME,
};
pub use types::{
    AppearanceConfig, Config, ConfigLayer, Params, Theme, DEFAULT_ENV_FILE, DEFAULT_SCRIPTS_DIR,
    DEFAULT_TMP_DIR,
};
