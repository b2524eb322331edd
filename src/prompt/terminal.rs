//! Line-oriented prompter for the CLI.

use std::collections::HashMap;
use std::io;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use super::negotiator::{PromptError, Prompter};
use super::variables::{VariableDefinition, VariableKind};
use crate::env::EnvironmentSnapshot;

/// Asks for each variable on the terminal, in order.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn prompt(
        &mut self,
        variables: &[VariableDefinition],
        _env: &EnvironmentSnapshot,
    ) -> Result<HashMap<String, String>, PromptError> {
        let mut collected = HashMap::with_capacity(variables.len());

        for variable in variables {
            let value = match variable.kind {
                VariableKind::Input => Input::<String>::with_theme(&self.theme)
                    .with_prompt(&variable.message)
                    .allow_empty(true)
                    .interact_text(),
                VariableKind::Password => Password::with_theme(&self.theme)
                    .with_prompt(&variable.message)
                    .allow_empty_password(true)
                    .interact(),
            }
            .map_err(map_dialoguer_error)?;

            collected.insert(variable.name.clone(), value);
        }

        Ok(collected)
    }
}

fn map_dialoguer_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => PromptError::Cancelled,
        other => PromptError::Failed(other.to_string()),
    }
}
