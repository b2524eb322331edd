//! Terminal utilities.

use std::io::{self, IsTerminal};

use crossterm::terminal;

use crate::tui::{MIN_HEIGHT, MIN_WIDTH};

/// Terminal size information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl TerminalSize {
    /// Big enough for the full TUI layout.
    pub fn is_valid(&self) -> bool {
        self.width >= MIN_WIDTH && self.height >= MIN_HEIGHT
    }
}

/// Current terminal size, or None if it cannot be determined.
pub fn check_terminal_size() -> Option<TerminalSize> {
    terminal::size()
        .ok()
        .map(|(width, height)| TerminalSize { width, height })
}

/// Whether both stdin and stdout are attached to a terminal.
///
/// The TUI and interactive prompts need both.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}
