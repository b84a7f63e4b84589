//! Keyboard input dispatch: overlay → global keys → horizon field.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay};

/// Rows moved by PgUp / PgDn.
pub const PAGE_ROWS: usize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // Any key closes the help overlay.
    if app.overlay == Overlay::Help {
        app.overlay = Overlay::None;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('r') => app.reload_model(),
        KeyCode::Enter => app.submit_forecast(),
        KeyCode::Char(c) if c.is_ascii_digit() => app.horizon.push_digit(c),
        KeyCode::Backspace => app.horizon.backspace(),
        KeyCode::Up | KeyCode::Char('+') => app.horizon.increment(),
        KeyCode::Down | KeyCode::Char('-') => app.horizon.decrement(),
        KeyCode::Char('j') => app.scroll_down(1),
        KeyCode::Char('k') => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(PAGE_ROWS),
        KeyCode::PageUp => app.scroll_up(PAGE_ROWS),
        KeyCode::Home => app.table_scroll = 0,
        _ => {}
    }
}
