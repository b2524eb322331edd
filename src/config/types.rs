//! Configuration type definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Free-form parameter mapping (`defaultParams`, caller params, overrides).
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Default scripts directory, relative to the working directory.
pub const DEFAULT_SCRIPTS_DIR: &str = "scripts";

/// Default temp directory, relative to the working directory.
pub const DEFAULT_TMP_DIR: &str = "tmp";

/// Default env file.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Color theme for the TUI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Full color theme.
    #[default]
    Default,
    /// Minimal colors.
    Minimal,
    /// No colors (monochrome).
    None,
}

/// Appearance configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Color theme.
    #[serde(default)]
    pub theme: Theme,
}

/// One partial configuration layer.
///
/// Every field is optional; a set field replaces the value of any layer below it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    /// Directory containing the scripts.
    #[serde(default, alias = "scripts_dir")]
    pub scripts_dir: Option<PathBuf>,
    /// Directory handed to scripts for scratch files.
    #[serde(default, alias = "tmp_dir")]
    pub tmp_dir: Option<PathBuf>,
    /// Env files, later files override earlier ones.
    #[serde(default, alias = "env_files")]
    pub env_files: Option<Vec<PathBuf>>,
    /// Default parameters, may contain `${VAR}` placeholders.
    #[serde(default, alias = "default_params")]
    pub default_params: Option<Params>,
    /// Glob patterns excluded from discovery.
    #[serde(default, alias = "exclude_patterns")]
    pub exclude_patterns: Option<Vec<String>>,
    /// TUI appearance.
    #[serde(default)]
    pub appearance: Option<AppearanceConfig>,
}

impl ConfigLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The effective configuration after all layers have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Scripts directory (absolute once resolved).
    pub scripts_dir: PathBuf,
    /// Temp directory (absolute once resolved).
    pub tmp_dir: PathBuf,
    /// Env files in load order.
    pub env_files: Vec<PathBuf>,
    /// Default parameters, not yet interpolated.
    pub default_params: Params,
    /// Exclusion globs, relative to the scripts directory.
    pub exclude_patterns: Vec<String>,
    /// TUI appearance.
    pub appearance: AppearanceConfig,
    /// Config file the user layer came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
            tmp_dir: PathBuf::from(DEFAULT_TMP_DIR),
            env_files: vec![PathBuf::from(DEFAULT_ENV_FILE)],
            default_params: Params::new(),
            exclude_patterns: Vec::new(),
            appearance: AppearanceConfig::default(),
            config_path: None,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a layer on top of this configuration.
    pub fn apply(&mut self, layer: ConfigLayer) {
        if let Some(dir) = layer.scripts_dir {
            self.scripts_dir = dir;
        }
        if let Some(dir) = layer.tmp_dir {
            self.tmp_dir = dir;
        }
        if let Some(files) = layer.env_files {
            self.env_files = files;
        }
        if let Some(params) = layer.default_params {
            self.default_params = params;
        }
        if let Some(patterns) = layer.exclude_patterns {
            self.exclude_patterns = patterns;
        }
        if let Some(appearance) = layer.appearance {
            self.appearance = appearance;
        }
    }

    /// Resolve every relative path against `base_dir`.
    pub fn absolutize(&mut self, base_dir: &Path) {
        self.scripts_dir = absolute_from(base_dir, &self.scripts_dir);
        self.tmp_dir = absolute_from(base_dir, &self.tmp_dir);
        self.env_files = self
            .env_files
            .iter()
            .map(|file| absolute_from(base_dir, file))
            .collect();
    }
}

/// Join `path` onto `base_dir` unless it is already absolute.
pub(crate) fn absolute_from(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
