//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions, per mode.  Adding a new
//! keybinding is a match arm here plus a hint in
//! [`crate::ui::draw_status_bar`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, Mode};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.mode {
        Mode::Normal => handle_normal(app, key.code),
        Mode::Organize => handle_organize(app, key.code),
        Mode::Sources => handle_sources(app, key.code),
    }
}

fn handle_normal(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.select_next_card(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.select_previous_card(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_item(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_item(),
        KeyCode::Enter => app.open_selected_item(),
        KeyCode::Char('o') => app.enter_organize(),
        KeyCode::Char('s') => app.open_sources(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('d') => app.toggle_dnd(),
        KeyCode::Char('m') => app.toggle_listing_mode(),
        _ => {}
    }
}

fn handle_organize(app: &mut App, code: KeyCode) {
    match code {
        // Esc is the cancellation signal, Enter/o the explicit exit; the
        // moves already made stay either way.
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('o') => app.exit_organize(),
        KeyCode::Left | KeyCode::Char('h') => app.move_card(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_card(1),
        _ => {}
    }
}

fn handle_sources(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('s') => app.close_sources(),
        KeyCode::Down | KeyCode::Char('j') => app.sources_cursor_down(),
        KeyCode::Up | KeyCode::Char('k') => app.sources_cursor_up(),
        KeyCode::Char(' ') => app.toggle_source(),
        _ => {}
    }
}
