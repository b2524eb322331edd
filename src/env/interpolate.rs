//! `${NAME}` placeholder expansion inside default parameters.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use super::EnvironmentSnapshot;
use crate::config::Params;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Replace every `${NAME}` in `template` with the value of `NAME`.
///
/// Unknown names expand to an empty string.
pub fn interpolate_str(template: &str, env: &EnvironmentSnapshot) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            env.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

/// Interpolate every string inside `value`, descending into arrays and objects.
///
/// Object keys are left untouched.
pub fn interpolate_value(value: &Value, env: &EnvironmentSnapshot) -> Value {
    match value {
        Value::String(s) => Value::String(interpolate_str(s, env)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| interpolate_value(item, env))
                .collect(),
        ),
        Value::Object(map) => Value::Object(interpolate_params(map, env)),
        other => other.clone(),
    }
}

/// Interpolate a whole parameter mapping.
pub fn interpolate_params(params: &Params, env: &EnvironmentSnapshot) -> Params {
    params
        .iter()
        .map(|(key, value)| (key.clone(), interpolate_value(value, env)))
        .collect()
}
