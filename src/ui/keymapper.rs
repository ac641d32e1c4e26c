//! Key mapping for session input
//!
//! Converts crossterm key events into session keys or host actions.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::session::KeyInput;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// What the host should do with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    /// Forward to the session
    Key(KeyInput),
    /// Paste the clipboard into the input line
    Paste,
    /// Tear the session down and exit
    Quit,
}

/// Key mapper for converting key events to session input
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent. Releases and unsupported keys map to `None`.
    pub fn map(event: &KeyEvent) -> Option<HostInput> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        let mods = Modifiers::from(event.modifiers);

        match event.code {
            KeyCode::Char(ch) => Self::map_char(ch, mods),
            KeyCode::Enter => Some(HostInput::Key(KeyInput::Enter)),
            KeyCode::Backspace => Some(HostInput::Key(KeyInput::Backspace)),
            KeyCode::Esc => Some(HostInput::Quit),
            _ => None,
        }
    }

    /// Map a character with modifiers
    fn map_char(ch: char, mods: Modifiers) -> Option<HostInput> {
        if mods.contains(Modifiers::CTRL) {
            return match ch.to_ascii_lowercase() {
                'c' | 'd' => Some(HostInput::Quit),
                'v' => Some(HostInput::Paste),
                'h' => Some(HostInput::Key(KeyInput::Backspace)),
                'm' | 'j' => Some(HostInput::Key(KeyInput::Enter)),
                _ => None,
            };
        }
        if mods.contains(Modifiers::ALT) || ch.is_control() {
            return None;
        }
        Some(HostInput::Key(KeyInput::Char(ch)))
    }

    /// Keys for pasted text: the first line, without control characters
    pub fn paste_keys(text: &str) -> Vec<KeyInput> {
        text.lines()
            .next()
            .unwrap_or("")
            .chars()
            .filter(|ch| !ch.is_control())
            .map(KeyInput::Char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Key(KeyInput::Char('a'))));

        // Shifted characters arrive already uppercased
        let event = key_event(KeyCode::Char('X'), KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Key(KeyInput::Char('X'))));

        let event = key_event(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Key(KeyInput::Char(' '))));

        // Alt+x is not text
        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_line_keys() {
        let event = key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Key(KeyInput::Enter)));

        let event = key_event(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Key(KeyInput::Backspace)));

        let event = key_event(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Key(KeyInput::Backspace)));

        let event = key_event(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_host_keys() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Quit));

        let event = key_event(KeyCode::Char('D'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Quit));

        let event = key_event(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Quit));

        let event = key_event(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(HostInput::Paste));
    }

    #[test]
    fn test_release_ignored() {
        let event = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_paste_keys() {
        assert_eq!(
            KeyMapper::paste_keys("switch\tlab42\nsecond line"),
            "switchlab42".chars().map(KeyInput::Char).collect::<Vec<_>>()
        );
        assert!(KeyMapper::paste_keys("").is_empty());
    }
}
