//! Header widget for the TUI.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Header widget showing the project name and script count.
pub struct Header<'a> {
    project_name: &'a str,
    script_count: usize,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(project_name: &'a str, script_count: usize, theme: &'a Theme) -> Self {
        Self {
            project_name,
            script_count,
            theme,
        }
    }

    fn build_line(&self, width: u16) -> Line<'a> {
        let help_hint = "[?]";
        let noun = if self.script_count == 1 {
            "script"
        } else {
            "scripts"
        };
        let count_part = format!(" {} {} ", self.script_count, noun);

        let fixed = count_part.chars().count() + help_hint.len() + 4;
        let max_project_len = (width as usize).saturating_sub(fixed);
        let project_display = truncate_with_ellipsis(self.project_name, max_project_len);

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(project_display, self.theme.header()),
        ];

        // Right-align the count and help hint
        let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let right_len = count_part.chars().count() + help_hint.len() + 1;
        let padding_len = (width as usize).saturating_sub(left_len + right_len);
        if padding_len > 0 {
            spans.push(Span::styled(" ".repeat(padding_len), self.theme.header()));
        }

        spans.push(Span::styled(count_part, self.theme.header_detail()));
        spans.push(Span::styled(help_hint, self.theme.header()));
        spans.push(Span::raw(" "));

        Line::from(spans)
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let line = self.build_line(area.width);
        Paragraph::new(line)
            .style(self.theme.header())
            .render(area, buf);
    }
}

/// Truncate a string with ellipsis if it exceeds max length.
///
/// Counts characters, not bytes.
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_len {
        s.to_string()
    } else if max_len == 0 {
        String::new()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}
