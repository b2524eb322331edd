//! Application state for the TUI.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::AppearanceConfig;
use crate::error::ScriptError;
use crate::library::ScriptEntry;
use crate::runner::LogLine;

/// Lines kept in the output panel before the oldest are dropped.
pub const MAX_OUTPUT_LINES: usize = 2000;

/// Application mode/state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppMode {
    /// Normal navigation mode.
    #[default]
    Normal,
    /// Filter/search mode.
    Filter { query: String },
    /// Help overlay.
    Help,
}

/// One line of the output panel.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputLine {
    /// Marks the start of a run.
    Banner(String),
    /// A log line produced by the script.
    Log(LogLine),
    /// Successful completion and the returned value.
    Result(String),
    /// The run failed.
    Failure(String),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    entries: Vec<ScriptEntry>,
    project_name: String,
    scripts_dir: PathBuf,
    appearance: AppearanceConfig,

    mode: AppMode,
    /// Position within `visible_indices`.
    selected: usize,
    filter_text: String,
    visible_indices: Vec<usize>,

    output: Vec<OutputLine>,
    /// Lines scrolled back from the bottom of the output panel.
    output_scroll: usize,
    last_run: Option<String>,

    run_request: Option<usize>,
    should_quit: bool,
}

impl App {
    /// Create a new application over discovered scripts.
    pub fn new(
        entries: Vec<ScriptEntry>,
        project_name: impl Into<String>,
        scripts_dir: impl Into<PathBuf>,
        appearance: AppearanceConfig,
    ) -> Self {
        let visible_indices = (0..entries.len()).collect();
        Self {
            entries,
            project_name: project_name.into(),
            scripts_dir: scripts_dir.into(),
            appearance,
            mode: AppMode::Normal,
            selected: 0,
            filter_text: String::new(),
            visible_indices,
            output: Vec::new(),
            output_scroll: 0,
            last_run: None,
            run_request: None,
            should_quit: false,
        }
    }

    // ==================== Getters ====================

    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    pub fn appearance(&self) -> &AppearanceConfig {
        &self.appearance
    }

    /// Total number of discovered scripts.
    pub fn script_count(&self) -> usize {
        self.entries.len()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn visible_count(&self) -> usize {
        self.visible_indices.len()
    }

    pub fn output(&self) -> &[OutputLine] {
        &self.output
    }

    pub fn output_scroll(&self) -> usize {
        self.output_scroll
    }

    /// Name of the script that produced the current output.
    pub fn last_run(&self) -> Option<&str> {
        self.last_run.as_deref()
    }

    // ==================== Script Access ====================

    /// Scripts left after filtering, best match first.
    pub fn visible_entries(&self) -> Vec<&ScriptEntry> {
        self.visible_indices
            .iter()
            .filter_map(|&i| self.entries.get(i))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&ScriptEntry> {
        self.visible_indices
            .get(self.selected)
            .and_then(|&i| self.entries.get(i))
    }

    /// Script by index into the full list.
    pub fn entry(&self, index: usize) -> Option<&ScriptEntry> {
        self.entries.get(index)
    }

    // ==================== Mode Management ====================

    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    /// Toggle help overlay.
    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
    }

    // ==================== Filter Management ====================

    /// Set the filter text and stay in filter mode.
    pub fn set_filter(&mut self, text: String) {
        self.filter_text = text.clone();
        self.mode = AppMode::Filter { query: text };
        self.update_visible_scripts();
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.update_visible_scripts();
    }

    /// Recompute the visible scripts from the filter text.
    pub fn update_visible_scripts(&mut self) {
        self.visible_indices = crate::filter::filter_scripts(&self.filter_text, &self.entries, true)
            .into_iter()
            .map(|(idx, _score)| idx)
            .collect();

        if self.selected >= self.visible_indices.len() {
            self.selected = self.visible_indices.len().saturating_sub(1);
        }
    }

    // ==================== Navigation ====================

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible_indices.len() {
            self.selected += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_last(&mut self) {
        self.selected = self.visible_indices.len().saturating_sub(1);
    }

    // ==================== Actions ====================

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Ask the main loop to run the selected script.
    pub fn run_selected(&mut self) {
        self.run_request = self.visible_indices.get(self.selected).copied();
    }

    /// Select and run a script by its number in the list (1-9).
    pub fn run_numbered(&mut self, num: usize) {
        if num > 0 && num <= self.visible_indices.len() {
            self.selected = num - 1;
            self.run_selected();
        }
    }

    /// Take the pending run request, if any.
    pub fn take_run_request(&mut self) -> Option<usize> {
        self.run_request.take()
    }

    // ==================== Output ====================

    /// Start a new run of `entry` in the output panel.
    pub fn begin_run(&mut self, entry: &ScriptEntry) {
        if !self.output.is_empty() {
            self.output.push(OutputLine::Banner(String::new()));
        }
        self.output
            .push(OutputLine::Banner(format!("▶ {}", entry.name)));
        self.last_run = Some(entry.name.clone());
        self.output_scroll = 0;
        self.trim_output();
    }

    /// Append the buffered log lines and the outcome of a run.
    pub fn finish_run(&mut self, lines: Vec<LogLine>, outcome: Result<Value, ScriptError>) {
        self.output.extend(lines.into_iter().map(OutputLine::Log));

        match outcome {
            Ok(value) => {
                self.output
                    .push(OutputLine::Result("✔ Script completed successfully".to_string()));
                if !value.is_null() {
                    let pretty =
                        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                    self.output
                        .extend(pretty.lines().map(|l| OutputLine::Result(l.to_string())));
                }
            }
            Err(err) => {
                self.output.push(OutputLine::Failure(format!("✖ {err}")));
            }
        }

        self.output_scroll = 0;
        self.trim_output();
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
        self.output_scroll = 0;
        self.last_run = None;
    }

    pub fn scroll_output_up(&mut self, lines: usize) {
        let max = self.output.len().saturating_sub(1);
        self.output_scroll = (self.output_scroll + lines).min(max);
    }

    pub fn scroll_output_down(&mut self, lines: usize) {
        self.output_scroll = self.output_scroll.saturating_sub(lines);
    }

    fn trim_output(&mut self) {
        if self.output.len() > MAX_OUTPUT_LINES {
            let excess = self.output.len() - MAX_OUTPUT_LINES;
            self.output.drain(..excess);
        }
    }
}
