//! Key mapping from terminal events to engine keys.

use crate::types::InputKey;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key code to an engine key.
pub fn key_to_input(code: KeyCode) -> Option<InputKey> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') => Some(InputKey::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') => Some(InputKey::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') => Some(InputKey::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') => {
            Some(InputKey::Right)
        }

        KeyCode::Enter | KeyCode::Char(' ') => Some(InputKey::Confirm),
        KeyCode::Esc | KeyCode::Backspace => Some(InputKey::Cancel),

        _ => None,
    }
}

/// Map a key press to an engine key. Release events map to nothing.
pub fn handle_key_event(key: KeyEvent) -> Option<InputKey> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    key_to_input(key.code)
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
