//! Output panel widget for the TUI.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::app::OutputLine;
use crate::tui::theme::Theme;

/// Shows log lines and outcomes of script runs, newest at the bottom.
pub struct OutputPanel<'a> {
    lines: &'a [OutputLine],
    title: Option<&'a str>,
    scroll_back: usize,
    theme: &'a Theme,
}

impl<'a> OutputPanel<'a> {
    pub fn new(lines: &'a [OutputLine], theme: &'a Theme) -> Self {
        Self {
            lines,
            title: None,
            scroll_back: 0,
            theme,
        }
    }

    /// Title shown on the border, usually the selected script's description.
    pub fn title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }

    /// Number of lines scrolled back from the bottom.
    pub fn scroll_back(mut self, lines: usize) -> Self {
        self.scroll_back = lines;
        self
    }

    fn text(line: &OutputLine) -> String {
        match line {
            OutputLine::Banner(s) | OutputLine::Result(s) | OutputLine::Failure(s) => s.clone(),
            OutputLine::Log(log) => log.message.clone(),
        }
    }

    /// Window of lines that fits in `height` rows.
    fn visible_lines(&self, height: usize) -> &'a [OutputLine] {
        let end = self.lines.len().saturating_sub(self.scroll_back);
        let start = end.saturating_sub(height);
        &self.lines[start..end]
    }

    fn build_lines(&self, height: usize) -> Vec<Line<'a>> {
        if self.lines.is_empty() {
            return vec![Line::from(Span::styled(
                "Press Enter to run the selected script",
                self.theme.filter_placeholder(),
            ))];
        }

        self.visible_lines(height)
            .iter()
            .flat_map(|line| {
                let style = self.theme.output_line(line);
                Self::text(line)
                    .lines()
                    .map(|text| Line::from(Span::styled(text.to_string(), style)))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl Widget for OutputPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let title = match self.title {
            Some(title) if !title.is_empty() => format!(" {} ", title),
            _ => " Output ".to_string(),
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(self.theme.separator());
        if self.scroll_back > 0 {
            block = block.title_bottom(format!(" ↑ {} ", self.scroll_back));
        }

        let inner_height = block.inner(area).height as usize;
        let mut lines = self.build_lines(inner_height);
        // Messages with embedded newlines can exceed the window
        if lines.len() > inner_height {
            lines.drain(..lines.len() - inner_height);
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
