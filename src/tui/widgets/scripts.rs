//! Script list widget for the TUI.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::filter::match_indices;
use crate::library::ScriptEntry;
use crate::tui::layout::scroll_offset;
use crate::tui::theme::Theme;
use crate::tui::widgets::header::truncate_with_ellipsis;

/// Vertical list of scripts with the selection marker and filter highlights.
pub struct ScriptList<'a> {
    entries: &'a [&'a ScriptEntry],
    selected: usize,
    query: &'a str,
    theme: &'a Theme,
}

impl<'a> ScriptList<'a> {
    pub fn new(entries: &'a [&'a ScriptEntry], selected: usize, theme: &'a Theme) -> Self {
        Self {
            entries,
            selected,
            query: "",
            theme,
        }
    }

    /// Highlight characters matched by `query`.
    pub fn highlight(mut self, query: &'a str) -> Self {
        self.query = query;
        self
    }

    /// Spans for one row. `index` is the position in the filtered list.
    fn render_entry(
        &self,
        entry: &ScriptEntry,
        index: usize,
        is_selected: bool,
        max_width: u16,
    ) -> Vec<Span<'static>> {
        // Numbers match the 1-9 quick-run keys
        let num_str = if index < 9 {
            format!("{}", index + 1)
        } else {
            " ".to_string()
        };
        let marker = if is_selected { ">" } else { " " };

        let prefix_len = 5;
        let name_width = (max_width as usize).saturating_sub(prefix_len);
        let name_style = if is_selected {
            self.theme.selected()
        } else {
            self.theme.script()
        };

        let mut spans = vec![
            Span::styled(format!(" {} ", num_str), self.theme.number()),
            Span::styled(format!("{} ", marker), self.theme.cursor()),
        ];
        spans.extend(self.name_spans(&entry.name, name_width, name_style));
        spans
    }

    /// Split the name into plain and matched runs.
    fn name_spans(&self, name: &str, width: usize, base: Style) -> Vec<Span<'static>> {
        let display = truncate_with_ellipsis(name, width);
        let matched: HashSet<usize> = if display == name {
            match_indices(self.query, name).into_iter().collect()
        } else {
            HashSet::new()
        };

        if matched.is_empty() {
            return vec![Span::styled(display, base)];
        }

        let highlight = base.patch(self.theme.matched());
        let mut spans = Vec::new();
        let mut run = String::new();
        let mut run_matched = false;

        for (i, c) in display.chars().enumerate() {
            let is_match = matched.contains(&i);
            if is_match != run_matched && !run.is_empty() {
                let style = if run_matched { highlight } else { base };
                spans.push(Span::styled(std::mem::take(&mut run), style));
            }
            run_matched = is_match;
            run.push(c);
        }
        if !run.is_empty() {
            let style = if run_matched { highlight } else { base };
            spans.push(Span::styled(run, style));
        }

        spans
    }
}

impl Widget for ScriptList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Scripts ")
            .border_style(self.theme.separator());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 || self.entries.is_empty() {
            return;
        }

        let rows = inner.height as usize;
        let start = scroll_offset(self.selected, rows);
        let end = (start + rows).min(self.entries.len());

        for (row, index) in (start..end).enumerate() {
            let spans = self.render_entry(
                self.entries[index],
                index,
                index == self.selected,
                inner.width,
            );
            buf.set_line(inner.x, inner.y + row as u16, &Line::from(spans), inner.width);
        }
    }
}

/// Shown instead of the list when there is nothing to show.
pub struct EmptyScripts<'a> {
    message: &'a str,
    hint: &'a str,
    theme: &'a Theme,
}

impl<'a> EmptyScripts<'a> {
    pub fn no_scripts(theme: &'a Theme) -> Self {
        Self {
            message: "No scripts found",
            hint: "Add .lua files to the scripts directory",
            theme,
        }
    }

    pub fn no_matches(theme: &'a Theme) -> Self {
        Self {
            message: "No scripts match the filter",
            hint: "Press Escape to clear the filter",
            theme,
        }
    }
}

impl Widget for EmptyScripts<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Scripts ")
            .border_style(self.theme.separator());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let has_hint = inner.height >= 3;
        let y = if has_hint {
            inner.y + inner.height / 2 - 1
        } else {
            inner.y + inner.height / 2
        };

        let msg_len = self.message.chars().count() as u16;
        let x = inner.x + inner.width.saturating_sub(msg_len) / 2;
        let line = Line::from(Span::styled(self.message, self.theme.description()));
        buf.set_line(x, y, &line, inner.width.saturating_sub(x - inner.x));

        if has_hint {
            let hint_y = y + 2;
            if hint_y < inner.y + inner.height {
                let hint_len = self.hint.chars().count() as u16;
                let hint_x = inner.x + inner.width.saturating_sub(hint_len) / 2;
                let hint_line = Line::from(Span::styled(self.hint, self.theme.filter_placeholder()));
                buf.set_line(
                    hint_x,
                    hint_y,
                    &hint_line,
                    inner.width.saturating_sub(hint_x - inner.x),
                );
            }
        }
    }
}
