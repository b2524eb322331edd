//! Terminal user interface.
//!
//! Lists the discovered scripts, runs the selected one in place and shows
//! its log lines and result in an output panel.

mod app;
mod input;
mod layout;
mod prompt;
mod theme;
mod ui;
pub mod widgets;

pub use app::{App, AppMode, OutputLine};
pub use input::handle_event;
pub use layout::{centered_rect_fixed, MainLayout, MIN_HEIGHT, MIN_WIDTH};
pub use prompt::{FormStatus, PromptForm};
pub use theme::Theme;
pub use ui::{render, run, TerminalGuard};
