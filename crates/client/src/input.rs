//! Keyboard mapping for the terminal client.
//!
//! Owns the key bindings so the event loop only sees [`KeyAction`]s.

use crossterm::event::{KeyCode, KeyEvent};

use pairs_core::Difficulty;

use crate::state::Direction;

/// High-level outcome of processing a keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Move(Direction),
    /// Flip the card under the cursor.
    Flip,
    /// Start a session; `None` reuses the selected difficulty.
    Start(Option<Difficulty>),
    PowerUp,
    Reset,
    ToggleTheme,
    None,
}

/// Translates `KeyEvent`s into client commands.
pub fn handle_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char(ch) => handle_char(ch),
        KeyCode::Left => KeyAction::Move(Direction::Left),
        KeyCode::Right => KeyAction::Move(Direction::Right),
        KeyCode::Up => KeyAction::Move(Direction::Up),
        KeyCode::Down => KeyAction::Move(Direction::Down),
        KeyCode::Enter => KeyAction::Flip,
        KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

fn handle_char(raw: char) -> KeyAction {
    match raw.to_ascii_lowercase() {
        'q' => KeyAction::Quit,
        'h' | 'a' => KeyAction::Move(Direction::Left),
        'j' | 's' => KeyAction::Move(Direction::Down),
        'k' | 'w' => KeyAction::Move(Direction::Up),
        'l' | 'd' => KeyAction::Move(Direction::Right),
        ' ' => KeyAction::Flip,
        '1' => KeyAction::Start(Some(Difficulty::Easy)),
        '2' => KeyAction::Start(Some(Difficulty::Medium)),
        '3' => KeyAction::Start(Some(Difficulty::Hard)),
        'n' => KeyAction::Start(None),
        'p' => KeyAction::PowerUp,
        'r' => KeyAction::Reset,
        't' => KeyAction::ToggleTheme,
        _ => KeyAction::None,
    }
}
