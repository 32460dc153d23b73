//! Keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::sort::SortState;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// The sort mode changed; run an immediate refresh cycle.
    Refresh,
}

/// Handles key input. The sort cursor is only ever moved from here, through
/// the `SortState` methods; the loop reads it but never writes it.
pub fn handle_key(sort: &mut SortState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('>') => {
            sort.advance();
            KeyAction::Refresh
        }
        KeyCode::Char('<') => {
            sort.retreat();
            KeyAction::Refresh
        }
        _ => KeyAction::None,
    }
}
