//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Everything a key press can ask the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Backspace,
    Submit,
    ToggleTimer,
    ResetTimer,
    Cancel,
    ScrollUp,
    ScrollDown,
    Quit,
}

/// Translate a terminal key event. Releases and repeats map to nothing.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('s') => Some(Action::ToggleTimer),
            KeyCode::Char('r') => Some(Action::ResetTimer),
            KeyCode::Char('x') => Some(Action::Cancel),
            _ => None,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::PageUp | KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::PageDown | KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::Char(c) => Some(Action::Insert(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_control_chords() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(map_key(press(KeyCode::Char('s'), ctrl)), Some(Action::ToggleTimer));
        assert_eq!(map_key(press(KeyCode::Char('r'), ctrl)), Some(Action::ResetTimer));
        assert_eq!(map_key(press(KeyCode::Char('x'), ctrl)), Some(Action::Cancel));
        assert_eq!(map_key(press(KeyCode::Char('c'), ctrl)), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Char('q'), ctrl)), None);
    }

    #[test]
    fn test_plain_keys() {
        let none = KeyModifiers::NONE;
        assert_eq!(map_key(press(KeyCode::Enter, none)), Some(Action::Submit));
        assert_eq!(map_key(press(KeyCode::Esc, none)), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Char('s'), none)), Some(Action::Insert('s')));
        assert_eq!(
            map_key(press(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            Some(Action::Insert('S'))
        );
        assert_eq!(map_key(press(KeyCode::PageUp, none)), Some(Action::ScrollUp));
        assert_eq!(map_key(press(KeyCode::Down, none)), Some(Action::ScrollDown));
        assert_eq!(map_key(press(KeyCode::Tab, none)), None);
        assert_eq!(map_key(press(KeyCode::Char('x'), KeyModifiers::ALT)), None);
    }

    #[test]
    fn test_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }
}
