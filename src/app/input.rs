//! Key mapping

use crossterm::event::{KeyCode, KeyModifiers};

/// Map a key on a navigation screen to an action
pub fn key_to_action(key: KeyCode, vim_mode: bool) -> Option<Action> {
    let vim = match key {
        KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Char('h') => Some(Action::Left),
        KeyCode::Char('l') => Some(Action::Right),
        _ => None,
    };
    if vim_mode && vim.is_some() {
        return vim;
    }

    match key {
        KeyCode::Down => Some(Action::Down),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Tab => Some(Action::Next),
        KeyCode::BackTab => Some(Action::Previous),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(c @ '1'..='9') => Some(Action::Choose(c as usize - '1' as usize)),
        KeyCode::Char(':') => Some(Action::Command),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('s') => Some(Action::Submit),
        KeyCode::Char('t') => Some(Action::Stats),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('e') => Some(Action::Email),
        KeyCode::Char('c') => Some(Action::ChangeTechnology),
        KeyCode::Char('y') => Some(Action::Share),
        KeyCode::Char('d') => Some(Action::Download),
        _ => None,
    }
}

/// Keys that work everywhere, including while typing
pub fn global_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('n') => Some(Action::ToggleForm),
            _ => None,
        }
    } else {
        None
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Left,
    Right,
    Next,
    Previous,

    // Selection
    Select,
    /// Pick an option by number (0-based)
    Choose(usize),
    Back,

    // Screen actions
    Submit,
    Stats,
    Refresh,
    Email,
    ChangeTechnology,
    Share,
    Download,
    ToggleForm,

    // Modes
    Command,
    Help,
    Quit,
}
