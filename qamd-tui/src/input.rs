//! Input handling and keybindings

use crate::app::App;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Handle a key event with the viewport height for scroll commands
pub fn handle_input(app: &mut App, key: KeyEvent, viewport_height: usize) -> Result<Action> {
    if !matches!(key.code, KeyCode::Modifier(_)) {
        app.clear_status_message();
    }

    // Quit: q or Ctrl+C
    if matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    ) {
        app.quit();
        return Ok(Action::Quit);
    }

    // Help dialog swallows everything except its close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        return Ok(Action::Continue);
    }

    match key.code {
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            app.reveal_selected(viewport_height);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            app.reveal_selected(viewport_height);
        }
        KeyCode::Char('y') | KeyCode::Char('c') | KeyCode::Enter => app.copy_selected(),
        KeyCode::PageDown => app.scroll_down(viewport_height.max(1)),
        KeyCode::PageUp => app.scroll_up(viewport_height.max(1)),
        _ => {}
    }

    Ok(Action::Continue)
}
