//! Footer widget for the TUI.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::AppMode;
use crate::tui::theme::Theme;

/// Footer widget showing keybinding hints.
pub struct Footer<'a> {
    mode: &'a AppMode,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(mode: &'a AppMode, theme: &'a Theme) -> Self {
        Self { mode, theme }
    }

    /// Keybinding hints for the current mode.
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        match self.mode {
            AppMode::Normal => vec![
                ("j/k", "move"),
                ("Enter", "run"),
                ("/", "filter"),
                ("c", "clear"),
                ("PgUp/PgDn", "scroll"),
                ("?", "help"),
                ("q", "quit"),
            ],
            AppMode::Filter { .. } => vec![("↑/↓", "move"), ("Enter", "run"), ("Esc", "cancel")],
            AppMode::Help => vec![("any key", "close")],
        }
    }

    /// Build the footer line, dropping action names when space is short.
    fn build_line(&self, width: u16) -> Line<'a> {
        let hints = self.hints();
        let full_width: usize = hints
            .iter()
            .map(|(key, action)| key.chars().count() + action.len() + 3)
            .sum();

        let mut spans = vec![Span::raw(" ")];

        if (width as usize) >= full_width + 2 {
            for (i, (key, action)) in hints.iter().enumerate() {
                spans.push(Span::styled(*key, self.theme.key()));
                spans.push(Span::styled(format!(" {} ", action), self.theme.footer()));
                if i < hints.len() - 1 {
                    spans.push(Span::styled(" ", self.theme.footer()));
                }
            }
        } else {
            let max_hints = ((width as usize) / 6).max(1).min(hints.len());
            for (i, (key, _)) in hints.iter().take(max_hints).enumerate() {
                spans.push(Span::styled(*key, self.theme.key()));
                if i < max_hints - 1 {
                    spans.push(Span::styled(" ", self.theme.footer()));
                }
            }
        }

        Line::from(spans)
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        Paragraph::new(self.build_line(area.width)).render(area, buf);
    }
}
