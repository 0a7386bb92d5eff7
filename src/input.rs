//! Terminal events to game input
//!
//! Any key press or mouse button press is a tap. Touch screens reach us as
//! mouse presses through the terminal emulator.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Activate,
    Quit,
    Resize(u16, u16),
}

pub fn map_event(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(map_key(key)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(Action::Activate),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Action::Resize(*cols, *rows)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        _ => Action::Activate,
    }
}

/// Feed one event to the game. Returns the action so the caller can handle
/// quit and resize.
pub fn dispatch(event: &Event, game: &mut GameState, now: Instant) -> Option<Action> {
    let action = map_event(event)?;
    if action == Action::Activate {
        game.on_input(now);
    }
    Some(action)
}
