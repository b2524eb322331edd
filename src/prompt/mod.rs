//! Interactive collection of missing variables.
//!
//! Scripts and callers declare variables they need. Before a script runs,
//! any that are not already set are collected through a [`Prompter`] and
//! written into the environment.

mod negotiator;
mod terminal;
mod variables;

pub use negotiator::{
    apply_collected, negotiate, pending_variables, NoopPrompter, PromptError, Prompter,
};
pub use terminal::DialoguerPrompter;
pub use variables::{default_message, VariableDeclaration, VariableDefinition, VariableKind};
