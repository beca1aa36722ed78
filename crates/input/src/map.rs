//! Key mapping from terminal events to engine commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to a command. Unbound keys give `None`.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    let KeyCode::Char(c) = key.code else {
        return match key.code {
            KeyCode::Left => Some(Command::MoveLeft),
            KeyCode::Right => Some(Command::MoveRight),
            KeyCode::Down => Some(Command::SoftDrop),
            KeyCode::Up => Some(Command::RotateCw),
            _ => None,
        };
    };

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match c.to_ascii_lowercase() {
        'h' | 'a' => Some(Command::MoveLeft),
        'l' | 'd' => Some(Command::MoveRight),
        'j' | 's' => Some(Command::SoftDrop),
        'k' | 'w' | 'x' => Some(Command::RotateCw),
        'z' | 'y' => Some(Command::RotateCcw),
        _ => None,
    }
}

/// `q`, `Esc` or Ctrl-C
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
