//! Custom widgets for the TUI.

mod filter;
mod footer;
mod header;
mod output;
mod prompt;
mod scripts;

pub use filter::Filter;
pub use footer::Footer;
pub use header::{truncate_with_ellipsis, Header};
pub use output::OutputPanel;
pub use prompt::PromptDialog;
pub use scripts::{EmptyScripts, ScriptList};
