//! Path and terminal helpers.

mod paths;
mod terminal;

pub use paths::{change_working_directory, find_script_file};
pub use terminal::{check_terminal_size, is_interactive, TerminalSize};
