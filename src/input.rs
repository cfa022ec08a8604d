//! Key bindings: arrows, space and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press. `Duck` is level-triggered: the driver calls
/// `duck(true)` on press and `duck(false)` on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Duck,
    Restart,
    Quit,
    None,
}

/// Map key event to game action. Jump doubles as "start" on the title
/// and game-over screens.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('k') | KeyCode::Enter => Action::Jump,
        KeyCode::Down | KeyCode::Char('j') => Action::Duck,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Restart,
        _ => Action::None,
    }
}
