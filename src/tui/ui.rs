//! Main UI rendering and TUI loop.

use std::collections::HashMap;
use std::io::{self, stdout, Stdout};
use std::panic;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::PoisonError;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use super::app::{App, AppMode};
use super::input::handle_event;
use super::layout::{centered_rect_fixed, MainLayout};
use super::prompt::{FormStatus, PromptForm};
use super::theme::Theme;
use super::widgets::{EmptyScripts, Filter, Footer, Header, OutputPanel, PromptDialog, ScriptList};
use crate::env::EnvironmentSnapshot;
use crate::error::Result;
use crate::library::{ExecuteOptions, ScriptRunner};
use crate::prompt::{PromptError, Prompter, VariableDefinition};
use crate::runner::output::collecting_sink;

/// Blink interval for cursor (in milliseconds).
const CURSOR_BLINK_MS: u64 = 530;

/// Event poll interval.
const POLL_MS: u64 = 50;

/// Global flag to track if terminal is in raw mode.
static TERMINAL_RAW_MODE: AtomicBool = AtomicBool::new(false);

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// RAII guard for terminal state.
/// Ensures terminal is properly restored even on panic.
pub struct TerminalGuard {
    terminal: CrosstermTerminal,
}

impl TerminalGuard {
    /// Set up the terminal for the TUI.
    pub fn new() -> io::Result<Self> {
        // Set up panic hook before entering raw mode
        setup_panic_hook();

        enable_raw_mode()?;
        TERMINAL_RAW_MODE.store(true, Ordering::SeqCst);

        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut CrosstermTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        TERMINAL_RAW_MODE.store(false, Ordering::SeqCst);
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        );
    }
}

/// Set up a panic hook that restores the terminal.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if TERMINAL_RAW_MODE.load(Ordering::SeqCst) {
            let _ = disable_raw_mode();
            let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
        }

        original_hook(panic_info);
    }));
}

/// Run the TUI over the runner's scripts until the user quits.
///
/// # Errors
///
/// Fails if the scripts directory is missing or the terminal cannot be
/// driven. Script failures are shown in the output panel instead.
pub fn run(runner: &ScriptRunner) -> Result<()> {
    let entries = runner.script_entries()?;
    let config = runner.config();
    let mut app = App::new(
        entries,
        project_name(config.scripts_dir.as_path()),
        config.scripts_dir.clone(),
        config.appearance.clone(),
    );
    let theme = Theme::new(&config.appearance.theme);

    let mut guard = TerminalGuard::new()?;
    run_loop(guard.terminal(), &mut app, runner, &theme)
}

/// Name shown in the header: the directory holding the scripts directory.
fn project_name(scripts_dir: &Path) -> String {
    scripts_dir
        .parent()
        .and_then(|p| p.file_name())
        .or_else(|| scripts_dir.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "scriptrun".to_string())
}

/// Main TUI loop.
fn run_loop(
    terminal: &mut CrosstermTerminal,
    app: &mut App,
    runner: &ScriptRunner,
    theme: &Theme,
) -> Result<()> {
    let mut blink = Blink::new();

    loop {
        let blink_state = blink.tick();
        terminal.draw(|frame| render(frame, app, theme, blink_state))?;

        if event::poll(Duration::from_millis(POLL_MS))? {
            let event = event::read()?;
            if handle_event(app, event) {
                break;
            }
            blink.reset();
        }

        if let Some(index) = app.take_run_request() {
            execute_entry(terminal, app, runner, theme, index)?;
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Run one script on the UI thread and append its output.
fn execute_entry(
    terminal: &mut CrosstermTerminal,
    app: &mut App,
    runner: &ScriptRunner,
    theme: &Theme,
    index: usize,
) -> Result<()> {
    let Some(entry) = app.entry(index).cloned() else {
        return Ok(());
    };

    app.begin_run(&entry);
    terminal.draw(|frame| render(frame, app, theme, true))?;

    let (sink, collected) = collecting_sink();
    let outcome = {
        let mut prompter = TuiPrompter {
            terminal: &mut *terminal,
            app: &*app,
            theme,
        };
        runner.execute_script_with_prompter(
            &entry.path,
            ExecuteOptions::default(),
            Some(sink),
            &mut prompter,
        )
    };

    let lines = collected
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    if let Err(e) = &outcome {
        log::debug!("{} failed: {}", entry.name, e);
    }
    app.finish_run(lines, outcome);
    Ok(())
}

/// Collects variables through a modal drawn over the current screen.
struct TuiPrompter<'a> {
    terminal: &'a mut CrosstermTerminal,
    app: &'a App,
    theme: &'a Theme,
}

impl Prompter for TuiPrompter<'_> {
    fn prompt(
        &mut self,
        variables: &[VariableDefinition],
        _env: &EnvironmentSnapshot,
    ) -> std::result::Result<HashMap<String, String>, PromptError> {
        let mut form = PromptForm::new(variables.to_vec());
        let mut blink = Blink::new();
        let app = self.app;
        let theme = self.theme;

        loop {
            let blink_state = blink.tick();
            self.terminal
                .draw(|frame| {
                    render(frame, app, theme, false);
                    render_prompt(frame, &form, theme, blink_state);
                })
                .map_err(prompt_io_error)?;

            if !event::poll(Duration::from_millis(POLL_MS)).map_err(prompt_io_error)? {
                continue;
            }
            let Event::Key(key) = event::read().map_err(prompt_io_error)? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }

            blink.reset();
            match form.handle_key(key) {
                FormStatus::Editing => {}
                FormStatus::Submitted => return Ok(form.into_values()),
                FormStatus::Cancelled => return Err(PromptError::Cancelled),
            }
        }
    }
}

fn prompt_io_error(e: io::Error) -> PromptError {
    PromptError::Failed(e.to_string())
}

/// Cursor blink timer.
struct Blink {
    last: Instant,
    on: bool,
}

impl Blink {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            on: true,
        }
    }

    fn tick(&mut self) -> bool {
        if self.last.elapsed() >= Duration::from_millis(CURSOR_BLINK_MS) {
            self.on = !self.on;
            self.last = Instant::now();
        }
        self.on
    }

    fn reset(&mut self) {
        self.on = true;
        self.last = Instant::now();
    }
}

/// Render the complete UI.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, blink_state: bool) {
    let layout = MainLayout::new(frame.area());

    frame.render_widget(
        Header::new(app.project_name(), app.script_count(), theme),
        layout.header,
    );
    render_filter(frame, app, theme, layout.filter, blink_state);
    render_scripts(frame, app, theme, layout.scripts);
    render_output(frame, app, theme, layout.output);
    frame.render_widget(Footer::new(app.mode(), theme), layout.footer);

    if let AppMode::Help = app.mode() {
        render_help_overlay(frame, theme);
    }
}

fn render_filter(frame: &mut Frame, app: &App, theme: &Theme, area: Rect, blink_state: bool) {
    let filter = match app.mode() {
        AppMode::Filter { query } => Filter::new(query, true, theme).blink(blink_state),
        _ => Filter::new(app.filter_text(), false, theme),
    };
    frame.render_widget(filter, area);
}

fn render_scripts(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let visible = app.visible_entries();

    if visible.is_empty() {
        let empty = if app.filter_text().is_empty() {
            EmptyScripts::no_scripts(theme)
        } else {
            EmptyScripts::no_matches(theme)
        };
        frame.render_widget(empty, area);
        return;
    }

    let list = ScriptList::new(&visible, app.selected_index(), theme).highlight(app.filter_text());
    frame.render_widget(list, area);
}

fn render_output(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = app
        .selected_entry()
        .map(|entry| entry.description.as_deref().unwrap_or(entry.name.as_str()));
    let panel = OutputPanel::new(app.output(), theme)
        .title(title)
        .scroll_back(app.output_scroll());
    frame.render_widget(panel, area);
}

fn render_prompt(frame: &mut Frame, form: &PromptForm, theme: &Theme, blink_state: bool) {
    let area = centered_rect_fixed(60, 7, frame.area());
    frame.render_widget(PromptDialog::new(form, theme).blink(blink_state), area);
}

/// Render the help overlay.
fn render_help_overlay(frame: &mut Frame, theme: &Theme) {
    let help_area = centered_rect_fixed(50, 17, frame.area());
    frame.render_widget(Clear, help_area);

    let binding = |key: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), theme.key()),
            Span::styled(action, theme.description()),
        ])
    };

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", theme.bold())),
        Line::from(""),
        binding("j/k", "Move up/down"),
        binding("g/G", "First/last script"),
        Line::from(""),
        binding("Enter", "Run selected script"),
        binding("1-9", "Run numbered script"),
        binding("/", "Filter scripts"),
        binding("c", "Clear output"),
        binding("PgUp/PgDn", "Scroll output"),
        Line::from(""),
        binding("?", "Toggle this help"),
        binding("q/Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            theme.filter_placeholder(),
        )),
    ];

    let help = Paragraph::new(help_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(theme.description()),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(help, help_area);
}
