//! Key bindings: `q` quits, `w` toggles pause. Everything else is ignored.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePause,
}

pub fn action_for(key: &KeyEvent) -> Option<Action> {
    // Some terminals report releases too; act on the press only
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('w') => Some(Action::TogglePause),
        _ => None,
    }
}

/// Convenience for raw terminal events; non-key events map to nothing.
pub fn action_for_event(ev: &Event) -> Option<Action> {
    match ev {
        Event::Key(k) => action_for(k),
        _ => None,
    }
}
