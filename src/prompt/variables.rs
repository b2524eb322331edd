//! Variable definitions declared by scripts or callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a variable is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Plain text input.
    #[default]
    Input,
    /// Masked input for secrets.
    Password,
}

impl VariableKind {
    /// Parse the `type` field of a declaration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "input" => Some(VariableKind::Input),
            "password" => Some(VariableKind::Password),
            _ => None,
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Input => write!(f, "input"),
            VariableKind::Password => write!(f, "password"),
        }
    }
}

/// A variable a script needs before it can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDefinition {
    /// Environment variable name.
    pub name: String,
    /// Prompt shown to the user.
    pub message: String,
    /// Input kind.
    pub kind: VariableKind,
}

impl VariableDefinition {
    /// Plain-text variable with the default message.
    pub fn input(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            message: default_message(&name),
            name,
            kind: VariableKind::Input,
        }
    }

    /// Secret variable with the default message.
    pub fn password(name: impl Into<String>) -> Self {
        Self {
            kind: VariableKind::Password,
            ..Self::input(name)
        }
    }

    /// Replace the prompt message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// A declaration as written in a script: a bare name or a full record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableDeclaration {
    /// Shorthand: just the name.
    Name(String),
    /// Full form; missing fields take defaults.
    Full {
        name: String,
        message: Option<String>,
        kind: Option<String>,
    },
}

impl VariableDeclaration {
    /// Normalize to the full definition.
    pub fn normalize(self) -> VariableDefinition {
        match self {
            VariableDeclaration::Name(name) => VariableDefinition::input(name),
            VariableDeclaration::Full {
                name,
                message,
                kind,
            } => {
                let kind = match kind.as_deref() {
                    None => VariableKind::Input,
                    Some(raw) => VariableKind::parse(raw).unwrap_or_else(|| {
                        log::warn!("Unknown variable type '{}' for {}, using input", raw, name);
                        VariableKind::Input
                    }),
                };
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| default_message(&name));
                VariableDefinition {
                    name,
                    message,
                    kind,
                }
            }
        }
    }
}

/// Prompt text used when a declaration does not provide one.
pub fn default_message(name: &str) -> String {
    format!("Enter value for {name}")
}
