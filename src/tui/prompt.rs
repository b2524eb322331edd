//! Modal form for collecting variables inside the TUI.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::prompt::{VariableDefinition, VariableKind};

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    /// Still collecting.
    Editing,
    /// Every variable has a value.
    Submitted,
    /// The user aborted; nothing should run.
    Cancelled,
}

/// Asks for one variable at a time.
#[derive(Debug, Clone)]
pub struct PromptForm {
    variables: Vec<VariableDefinition>,
    current: usize,
    input: String,
    values: HashMap<String, String>,
}

impl PromptForm {
    pub fn new(variables: Vec<VariableDefinition>) -> Self {
        Self {
            variables,
            current: 0,
            input: String::new(),
            values: HashMap::new(),
        }
    }

    /// The variable being asked for.
    pub fn current(&self) -> Option<&VariableDefinition> {
        self.variables.get(self.current)
    }

    /// 1-based position and total, for the dialog title.
    pub fn progress(&self) -> (usize, usize) {
        ((self.current + 1).min(self.variables.len()), self.variables.len())
    }

    /// The input as it should be shown; passwords are masked.
    pub fn display_input(&self) -> String {
        match self.current().map(|v| v.kind) {
            Some(VariableKind::Password) => "*".repeat(self.input.chars().count()),
            _ => self.input.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.variables.len()
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormStatus {
        if self.is_complete() {
            return FormStatus::Submitted;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                return FormStatus::Cancelled;
            }
            (KeyCode::Enter, _) => {
                if let Some(variable) = self.variables.get(self.current) {
                    let value = std::mem::take(&mut self.input);
                    self.values.insert(variable.name.clone(), value);
                }
                self.current += 1;
                if self.is_complete() {
                    return FormStatus::Submitted;
                }
            }
            (KeyCode::Backspace, _) => {
                self.input.pop();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.input.clear(),
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }

        FormStatus::Editing
    }

    /// Collected values, keyed by variable name.
    pub fn into_values(self) -> HashMap<String, String> {
        self.values
    }
}
