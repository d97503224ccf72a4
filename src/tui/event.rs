use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::list::MoveDirection;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Always handled, regardless of mode
    ForceQuit, // Ctrl+C
    Resize,

    Submit,
    Escape,
    NextTab,

    // Text editing
    InputChar(char),
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    Home,
    End,

    // List navigation
    CursorUp,
    CursorDown,
    /// Alt+arrow: reorder or re-nest the selected book
    Move(MoveDirection),
}

/// Translate one key press. Release/repeat reports are ignored.
pub fn map_key(key: KeyEvent) -> Option<TuiEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::ALT, KeyCode::Up) => Some(TuiEvent::Move(MoveDirection::Up)),
        (KeyModifiers::ALT, KeyCode::Down) => Some(TuiEvent::Move(MoveDirection::Down)),
        (KeyModifiers::ALT, KeyCode::Right) => Some(TuiEvent::Move(MoveDirection::Right)),
        (KeyModifiers::ALT, KeyCode::Left) => Some(TuiEvent::Move(MoveDirection::Left)),
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Delete) => Some(TuiEvent::Delete),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Tab) => Some(TuiEvent::NextTab),
        (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
        (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
        (_, KeyCode::Home) => Some(TuiEvent::Home),
        (_, KeyCode::End) => Some(TuiEvent::End),
        _ => None,
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`. Terminal read errors are
/// logged and treated as "no event".
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(Event::Key(key_event)) => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            map_key(key_event)
        }
        Ok(Event::Paste(data)) => Some(TuiEvent::Paste(data)),
        Ok(Event::Resize(_, _)) => Some(TuiEvent::Resize),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_c_is_force_quit() {
        assert_eq!(
            map_key(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(TuiEvent::ForceQuit)
        );
    }

    #[test]
    fn test_alt_arrows_move() {
        assert_eq!(
            map_key(key(KeyModifiers::ALT, KeyCode::Right)),
            Some(TuiEvent::Move(MoveDirection::Right))
        );
        assert_eq!(
            map_key(key(KeyModifiers::ALT, KeyCode::Up)),
            Some(TuiEvent::Move(MoveDirection::Up))
        );
        assert_eq!(
            map_key(key(KeyModifiers::NONE, KeyCode::Up)),
            Some(TuiEvent::CursorUp)
        );
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            map_key(key(KeyModifiers::SHIFT, KeyCode::Char('D'))),
            Some(TuiEvent::InputChar('D'))
        );
        assert_eq!(
            map_key(key(KeyModifiers::NONE, KeyCode::Tab)),
            Some(TuiEvent::NextTab)
        );
        assert_eq!(map_key(key(KeyModifiers::NONE, KeyCode::F(5))), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut release = key(KeyModifiers::NONE, KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }
}
