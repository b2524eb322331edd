//! Decide which variables still need a value and collect them.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::variables::VariableDefinition;
use crate::env::EnvironmentSnapshot;
use crate::error::ScriptError;

/// Failure while asking for values.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The user aborted the prompt.
    #[error("prompt cancelled")]
    Cancelled,

    /// The prompter could not collect values.
    #[error("{0}")]
    Failed(String),
}

impl From<PromptError> for ScriptError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Cancelled => ScriptError::PromptCancelled,
            PromptError::Failed(message) => ScriptError::Prompt { message },
        }
    }
}

/// Obtains values for variables that are not yet set.
///
/// Implementations only decide *how* to ask; which variables to ask for is
/// decided by [`pending_variables`].
pub trait Prompter {
    /// Collect values for `variables`. `env` is the environment known so far.
    fn prompt(
        &mut self,
        variables: &[VariableDefinition],
        env: &EnvironmentSnapshot,
    ) -> Result<HashMap<String, String>, PromptError>;
}

impl<F> Prompter for F
where
    F: FnMut(&[VariableDefinition], &EnvironmentSnapshot) -> Result<HashMap<String, String>, PromptError>,
{
    fn prompt(
        &mut self,
        variables: &[VariableDefinition],
        env: &EnvironmentSnapshot,
    ) -> Result<HashMap<String, String>, PromptError> {
        self(variables, env)
    }
}

/// Prompter that never collects anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPrompter;

impl Prompter for NoopPrompter {
    fn prompt(
        &mut self,
        _variables: &[VariableDefinition],
        _env: &EnvironmentSnapshot,
    ) -> Result<HashMap<String, String>, PromptError> {
        Ok(HashMap::new())
    }
}

/// Variables that still need a value, caller declarations first.
///
/// When both sources declare a name, the caller's definition is kept. Names
/// already present in `env` with a non-empty value are dropped.
pub fn pending_variables(
    caller: &[VariableDefinition],
    script: &[VariableDefinition],
    env: &EnvironmentSnapshot,
) -> Vec<VariableDefinition> {
    let mut seen = HashSet::new();
    caller
        .iter()
        .chain(script)
        .filter(|def| seen.insert(def.name.clone()))
        .filter(|def| !env.contains_non_empty(&def.name))
        .cloned()
        .collect()
}

/// Collect values for every pending variable through `prompter`.
///
/// The prompter is not called when nothing is pending. Values returned for
/// names that were not pending are discarded.
///
/// # Errors
///
/// Returns [`ScriptError::PromptCancelled`] if the user aborts.
pub fn negotiate(
    caller: &[VariableDefinition],
    script: &[VariableDefinition],
    env: &EnvironmentSnapshot,
    prompter: &mut dyn Prompter,
) -> crate::Result<HashMap<String, String>> {
    let pending = pending_variables(caller, script, env);
    if pending.is_empty() {
        return Ok(HashMap::new());
    }

    log::debug!(
        "Prompting for {} variable(s): {}",
        pending.len(),
        pending
            .iter()
            .map(|def| def.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut collected = prompter.prompt(&pending, env)?;
    collected.retain(|name, _| pending.iter().any(|def| &def.name == name));
    Ok(collected)
}

/// Make collected values visible to the invocation.
///
/// Values go into `env` and, so scripts reading the process environment
/// directly see them too, into the process environment.
pub fn apply_collected(collected: &HashMap<String, String>, env: &mut EnvironmentSnapshot) {
    for (name, value) in collected {
        std::env::set_var(name, value);
        env.insert(name.clone(), value.clone());
    }
}
