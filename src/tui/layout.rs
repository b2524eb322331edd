//! Layout calculations for the TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Minimum terminal dimensions.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Below this width the output panel goes under the script list.
pub const SIDE_BY_SIDE_WIDTH: u16 = 80;

/// Main layout areas.
#[derive(Debug, Clone, Copy)]
pub struct MainLayout {
    pub header: Rect,
    pub filter: Rect,
    /// Script list.
    pub scripts: Rect,
    /// Output panel for the last run.
    pub output: Rect,
    pub footer: Rect,
}

impl MainLayout {
    /// Calculate the main layout for the given area.
    pub fn new(area: Rect) -> Self {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return Self::minimal_layout(area);
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Filter
                Constraint::Min(3),    // Body
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let body = if area.width >= SIDE_BY_SIDE_WIDTH {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(rows[2])
        } else {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(rows[2])
        };

        Self {
            header: rows[0],
            filter: rows[1],
            scripts: body[0],
            output: body[1],
            footer: rows[3],
        }
    }

    /// Tiny terminals: no output panel, list only.
    fn minimal_layout(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(0),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: chunks[0],
            filter: chunks[1],
            scripts: chunks[2],
            output: chunks[3],
            footer: chunks[4],
        }
    }
}

/// Create a fixed-size centered rectangle for popups/overlays.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let actual_width = width.min(area.width);
    let actual_height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(actual_width)) / 2;
    let y = area.y + (area.height.saturating_sub(actual_height)) / 2;

    Rect::new(x, y, actual_width, actual_height)
}

/// First list row to draw so that `selected` stays visible.
pub fn scroll_offset(selected: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    (selected + 1).saturating_sub(visible_rows)
}
