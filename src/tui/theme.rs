//! Color theme for the TUI.

use ratatui::style::{Color, Modifier, Style};

use super::app::OutputLine;
use crate::config::Theme as ThemeConfig;
use crate::runner::LogLevel;

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    // Header
    header_bg: Color,
    header_fg: Color,

    // Filter
    filter_fg: Color,
    filter_placeholder_fg: Color,

    // Scripts
    number_fg: Color,
    script_fg: Color,
    selected_bg: Color,
    selected_fg: Color,
    cursor_fg: Color,
    match_fg: Color,

    // Output panel
    description_fg: Color,
    separator_fg: Color,
    info_fg: Color,
    debug_fg: Color,

    // Footer
    footer_fg: Color,
    key_fg: Color,

    // Status
    error_fg: Color,
    success_fg: Color,
    warning_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(&ThemeConfig::Default)
    }
}

impl Theme {
    /// Create a theme from configuration.
    pub fn new(config: &ThemeConfig) -> Self {
        match config {
            ThemeConfig::Default => Self::default_theme(),
            ThemeConfig::Minimal => Self::minimal_theme(),
            ThemeConfig::None => Self::no_color_theme(),
        }
    }

    fn default_theme() -> Self {
        Self {
            header_bg: Color::Blue,
            header_fg: Color::White,
            filter_fg: Color::Yellow,
            filter_placeholder_fg: Color::DarkGray,
            number_fg: Color::Cyan,
            script_fg: Color::White,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            cursor_fg: Color::Green,
            match_fg: Color::Yellow,
            description_fg: Color::Gray,
            separator_fg: Color::DarkGray,
            info_fg: Color::Cyan,
            debug_fg: Color::DarkGray,
            footer_fg: Color::DarkGray,
            key_fg: Color::Cyan,
            error_fg: Color::Red,
            success_fg: Color::Green,
            warning_fg: Color::Yellow,
        }
    }

    /// Keeps status colors, greys out the rest and drops backgrounds.
    fn minimal_theme() -> Self {
        Self {
            header_bg: Color::Reset,
            filter_fg: Color::White,
            number_fg: Color::Gray,
            selected_bg: Color::Reset,
            selected_fg: Color::Cyan,
            cursor_fg: Color::White,
            match_fg: Color::White,
            info_fg: Color::Gray,
            key_fg: Color::Gray,
            ..Self::default_theme()
        }
    }

    /// Monochrome.
    fn no_color_theme() -> Self {
        Self::uniform(Color::Reset)
    }

    fn uniform(color: Color) -> Self {
        Self {
            header_bg: color,
            header_fg: color,
            filter_fg: color,
            filter_placeholder_fg: color,
            number_fg: color,
            script_fg: color,
            selected_bg: color,
            selected_fg: color,
            cursor_fg: color,
            match_fg: color,
            description_fg: color,
            separator_fg: color,
            info_fg: color,
            debug_fg: color,
            footer_fg: color,
            key_fg: color,
            error_fg: color,
            success_fg: color,
            warning_fg: color,
        }
    }

    // ==================== Header Styles ====================

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Secondary header text (script count).
    pub fn header_detail(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    // ==================== Filter Styles ====================

    pub fn filter(&self) -> Style {
        Style::default().fg(self.filter_fg)
    }

    pub fn filter_active(&self) -> Style {
        Style::default()
            .fg(self.filter_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn filter_placeholder(&self) -> Style {
        Style::default()
            .fg(self.filter_placeholder_fg)
            .add_modifier(Modifier::ITALIC)
    }

    // ==================== Script Styles ====================

    pub fn number(&self) -> Style {
        Style::default()
            .fg(self.number_fg)
            .add_modifier(Modifier::DIM)
    }

    pub fn script(&self) -> Style {
        Style::default().fg(self.script_fg)
    }

    pub fn selected(&self) -> Style {
        if self.selected_bg == Color::Reset {
            Style::default()
                .fg(self.selected_fg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
                .fg(self.selected_fg)
                .bg(self.selected_bg)
                .add_modifier(Modifier::BOLD)
        }
    }

    pub fn cursor(&self) -> Style {
        Style::default()
            .fg(self.cursor_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Characters matched by the filter query.
    pub fn matched(&self) -> Style {
        Style::default()
            .fg(self.match_fg)
            .add_modifier(Modifier::BOLD)
    }

    // ==================== Output Styles ====================

    pub fn description(&self) -> Style {
        Style::default().fg(self.description_fg)
    }

    pub fn separator(&self) -> Style {
        Style::default().fg(self.separator_fg)
    }

    /// Style for a script log line of the given level.
    pub fn log_level(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Log => Style::default().fg(self.script_fg),
            LogLevel::Info => Style::default().fg(self.info_fg),
            LogLevel::Warn => Style::default().fg(self.warning_fg),
            LogLevel::Error => Style::default().fg(self.error_fg),
            LogLevel::Debug => Style::default()
                .fg(self.debug_fg)
                .add_modifier(Modifier::DIM),
        }
    }

    /// Style for a line of the output panel.
    pub fn output_line(&self, line: &OutputLine) -> Style {
        match line {
            OutputLine::Banner(_) => self.bold(),
            OutputLine::Log(log) => self.log_level(log.level),
            OutputLine::Result(_) => self.success(),
            OutputLine::Failure(_) => self.error(),
        }
    }

    // ==================== Footer Styles ====================

    pub fn footer(&self) -> Style {
        Style::default().fg(self.footer_fg)
    }

    pub fn key(&self) -> Style {
        Style::default()
            .fg(self.key_fg)
            .add_modifier(Modifier::BOLD)
    }

    // ==================== Status Styles ====================

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    // ==================== Text Styles ====================

    pub fn bold(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}
