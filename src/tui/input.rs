//! Input handling for the TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, AppMode};

/// Lines moved by PageUp/PageDown in the output panel.
const OUTPUT_PAGE: usize = 10;

/// Handle a terminal event.
///
/// Returns `true` if the app should quit.
pub fn handle_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        _ => false,
    }
}

/// Handle a key event.
///
/// Returns true if the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return true;
    }

    match app.mode().clone() {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Filter { query } => handle_filter_mode(app, key, &query),
        AppMode::Help => app.set_mode(AppMode::Normal),
    }

    app.should_quit()
}

/// Handle keys in normal mode.
///
/// - ↑/k, ↓/j: move
/// - Home/g, End/G: first/last
/// - Enter/o: run selected script
/// - 1-9: run numbered script
/// - /: filter
/// - c: clear output
/// - PageUp/PageDown: scroll output
/// - ?: help
/// - q/Esc: quit (Esc clears an applied filter first)
fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Home | KeyCode::Char('g') => app.move_to_first(),
        KeyCode::End | KeyCode::Char('G') => app.move_to_last(),

        KeyCode::Enter | KeyCode::Char('o') => app.run_selected(),

        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            if let Some(num) = c.to_digit(10) {
                app.run_numbered(num as usize);
            }
        }

        KeyCode::Char('/') => {
            let query = app.filter_text().to_string();
            app.set_mode(AppMode::Filter { query });
        }

        KeyCode::Char('c') => app.clear_output(),
        KeyCode::PageUp => app.scroll_output_up(OUTPUT_PAGE),
        KeyCode::PageDown => app.scroll_output_down(OUTPUT_PAGE),

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Esc if !app.filter_text().is_empty() => app.clear_filter(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        _ => {}
    }
}

/// Handle keys in filter mode.
///
/// - Printable characters: append to filter
/// - Backspace: remove last character
/// - Escape: clear filter and leave filter mode
/// - Enter: keep the filter, leave filter mode and run the selection
fn handle_filter_mode(app: &mut App, key: KeyEvent, current_query: &str) {
    match key.code {
        KeyCode::Esc => {
            app.clear_filter();
            app.set_mode(AppMode::Normal);
        }

        KeyCode::Enter => {
            app.set_mode(AppMode::Normal);
            app.run_selected();
        }

        KeyCode::Backspace => {
            let mut query = current_query.to_string();
            query.pop();
            if query.is_empty() {
                app.clear_filter();
                app.set_mode(AppMode::Normal);
            } else {
                app.set_filter(query);
            }
        }

        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),

        KeyCode::Char(c) => {
            let mut query = current_query.to_string();
            query.push(c);
            app.set_filter(query);
        }

        _ => {}
    }
}
