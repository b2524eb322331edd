//! Env file loading and layer merging.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::interpolate::interpolate_params;
use super::EnvironmentSnapshot;
use crate::config::Params;

/// Result of environment loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedEnvironment {
    /// Fully merged snapshot, interpolated parameters included.
    pub env: EnvironmentSnapshot,
    /// Default parameters after `${NAME}` interpolation, with their JSON types kept.
    pub params: Params,
}

/// Load the environment using the current process environment as the ambient layer.
///
/// Precedence, lowest to highest: env files (later files win), the process
/// environment, `explicit`, then the interpolated `default_params`.
pub fn load_environment(
    env_files: &[PathBuf],
    explicit: &HashMap<String, String>,
    default_params: &Params,
) -> LoadedEnvironment {
    load_environment_with(env_files, process_env(), explicit, default_params)
}

/// Load the environment with an explicit ambient layer.
pub fn load_environment_with<I>(
    env_files: &[PathBuf],
    ambient: I,
    explicit: &HashMap<String, String>,
    default_params: &Params,
) -> LoadedEnvironment
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut env = EnvironmentSnapshot::new();

    for file in env_files {
        if let Some(vars) = read_env_file(file) {
            log::debug!("Loaded {} variables from {}", vars.len(), file.display());
            env.extend(vars);
        }
    }

    env.extend(ambient);
    env.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));

    // Placeholders only see the environment computed so far
    let params = interpolate_params(default_params, &env);
    env.extend(
        params
            .iter()
            .filter_map(|(key, value)| param_env_value(value).map(|v| (key.clone(), v))),
    );

    LoadedEnvironment { env, params }
}

/// Read a `KEY=value` env file without touching the process environment.
///
/// Returns `None` when the file does not exist. Unparsable lines are skipped.
pub fn read_env_file(path: &Path) -> Option<Vec<(String, String)>> {
    if !path.is_file() {
        return None;
    }

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            log::warn!("Failed to read env file {}: {}", path.display(), e);
            return None;
        }
    };

    let mut vars = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => vars.push(pair),
            Err(e) => log::warn!("Skipping invalid line in {}: {}", path.display(), e),
        }
    }
    Some(vars)
}

/// String form of a parameter as it appears in the environment snapshot.
fn param_env_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn process_env() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}
