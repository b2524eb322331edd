//! Modal dialog asking for one variable.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::tui::prompt::PromptForm;
use crate::tui::theme::Theme;

pub struct PromptDialog<'a> {
    form: &'a PromptForm,
    theme: &'a Theme,
    blink_state: bool,
}

impl<'a> PromptDialog<'a> {
    pub fn new(form: &'a PromptForm, theme: &'a Theme) -> Self {
        Self {
            form,
            theme,
            blink_state: true,
        }
    }

    pub fn blink(mut self, state: bool) -> Self {
        self.blink_state = state;
        self
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let Some(variable) = self.form.current() else {
            return Vec::new();
        };
        let cursor = if self.blink_state { "_" } else { " " };

        vec![
            Line::from(Span::styled(variable.message.clone(), self.theme.bold())),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", self.theme.key()),
                Span::styled(self.form.display_input(), self.theme.filter_active()),
                Span::styled(cursor, self.theme.filter_active()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", self.theme.key()),
                Span::styled(" confirm  ", self.theme.footer()),
                Span::styled("Esc", self.theme.key()),
                Span::styled(" cancel run", self.theme.footer()),
            ]),
        ]
    }
}

impl Widget for PromptDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(variable) = self.form.current() else {
            return;
        };
        let (position, total) = self.form.progress();

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ({}/{}) ", variable.name, position, total))
            .border_style(self.theme.key());

        Paragraph::new(self.build_lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
