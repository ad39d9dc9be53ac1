//! Keyboard input handling.
//!
//! Terminal key events are normalized into [`KeyMsg`] values whose
//! `Display` form ("up", "tab", "ctrl+r", "a") is what key bindings match on.

use std::fmt;

use crossterm::event::{KeyCode, KeyModifiers};

/// Keyboard key event message.
///
/// # Example
///
/// ```rust
/// use tea_core::{KeyMsg, KeyType};
///
/// assert_eq!(KeyMsg::from_type(KeyType::Down).to_string(), "down");
/// assert_eq!(KeyMsg::from_char('x').to_string(), "x");
/// assert_eq!(KeyMsg::ctrl('r').to_string(), "ctrl+r");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMsg {
    /// The kind of key pressed.
    pub key_type: KeyType,
    /// Characters typed, for [`KeyType::Runes`].
    pub runes: Vec<char>,
    /// Whether Alt was held.
    pub alt: bool,
}

impl KeyMsg {
    /// Creates a key message for a non-character key.
    pub fn from_type(key_type: KeyType) -> Self {
        Self {
            key_type,
            runes: Vec::new(),
            alt: false,
        }
    }

    /// Creates a key message for a typed character.
    pub fn from_char(c: char) -> Self {
        Self::from_runes(vec![c])
    }

    /// Creates a key message for several characters at once (paste, IME).
    pub fn from_runes(runes: Vec<char>) -> Self {
        Self {
            key_type: KeyType::Runes,
            runes,
            alt: false,
        }
    }

    /// Creates a Ctrl+`c` key message.
    pub fn ctrl(c: char) -> Self {
        Self::from_type(KeyType::Ctrl(c.to_ascii_lowercase()))
    }

    /// Marks the Alt modifier as held.
    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Returns true for plain character input.
    pub fn is_runes(&self) -> bool {
        self.key_type == KeyType::Runes && !self.runes.is_empty()
    }
}

impl fmt::Display for KeyMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alt {
            write!(f, "alt+")?;
        }
        if self.key_type == KeyType::Runes {
            for c in &self.runes {
                write!(f, "{c}")?;
            }
            Ok(())
        } else {
            write!(f, "{}", self.key_type)
        }
    }
}

/// The keys a combobox-style application cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Regular character input.
    Runes,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Shift+Tab.
    ShiftTab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Escape.
    Esc,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PgUp,
    /// Page down.
    PgDown,
    /// Ctrl plus a lowercase ASCII letter.
    Ctrl(char),
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Runes => "runes",
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::ShiftTab => "shift+tab",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Esc => "esc",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
            Self::End => "end",
            Self::PgUp => "pgup",
            Self::PgDown => "pgdown",
            Self::Ctrl(c) => return write!(f, "ctrl+{c}"),
        };
        f.write_str(name)
    }
}

/// Converts a crossterm key event into a [`KeyMsg`].
///
/// Returns `None` for keys the runtime does not model (function keys,
/// media keys, lone modifiers).
pub fn from_crossterm_key(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyMsg> {
    let alt = modifiers.contains(KeyModifiers::ALT);
    let key = match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => KeyMsg::ctrl(c),
        KeyCode::Char(c) => KeyMsg::from_char(c),
        KeyCode::Enter => KeyMsg::from_type(KeyType::Enter),
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => {
            KeyMsg::from_type(KeyType::ShiftTab)
        }
        KeyCode::Tab => KeyMsg::from_type(KeyType::Tab),
        KeyCode::BackTab => KeyMsg::from_type(KeyType::ShiftTab),
        KeyCode::Backspace => KeyMsg::from_type(KeyType::Backspace),
        KeyCode::Delete => KeyMsg::from_type(KeyType::Delete),
        KeyCode::Esc => KeyMsg::from_type(KeyType::Esc),
        KeyCode::Up => KeyMsg::from_type(KeyType::Up),
        KeyCode::Down => KeyMsg::from_type(KeyType::Down),
        KeyCode::Left => KeyMsg::from_type(KeyType::Left),
        KeyCode::Right => KeyMsg::from_type(KeyType::Right),
        KeyCode::Home => KeyMsg::from_type(KeyType::Home),
        KeyCode::End => KeyMsg::from_type(KeyType::End),
        KeyCode::PageUp => KeyMsg::from_type(KeyType::PgUp),
        KeyCode::PageDown => KeyMsg::from_type(KeyType::PgDown),
        _ => return None,
    };
    Some(if alt { key.with_alt() } else { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(KeyMsg::from_type(KeyType::Enter).to_string(), "enter");
        assert_eq!(KeyMsg::from_type(KeyType::ShiftTab).to_string(), "shift+tab");
        assert_eq!(KeyMsg::ctrl('U').to_string(), "ctrl+u");
        assert_eq!(KeyMsg::from_runes(vec!['a', 'b']).to_string(), "ab");
        assert_eq!(KeyMsg::from_char('f').with_alt().to_string(), "alt+f");
    }

    #[test]
    fn test_from_crossterm_chars() {
        let key = from_crossterm_key(KeyCode::Char('q'), KeyModifiers::NONE).unwrap();
        assert!(key.is_runes());
        assert_eq!(key.runes, vec!['q']);

        let key = from_crossterm_key(KeyCode::Char('c'), KeyModifiers::CONTROL).unwrap();
        assert_eq!(key.key_type, KeyType::Ctrl('c'));
    }

    #[test]
    fn test_from_crossterm_navigation() {
        let key = from_crossterm_key(KeyCode::Tab, KeyModifiers::SHIFT).unwrap();
        assert_eq!(key.key_type, KeyType::ShiftTab);
        let key = from_crossterm_key(KeyCode::BackTab, KeyModifiers::SHIFT).unwrap();
        assert_eq!(key.key_type, KeyType::ShiftTab);
        let key = from_crossterm_key(KeyCode::Down, KeyModifiers::NONE).unwrap();
        assert_eq!(key.to_string(), "down");
    }

    #[test]
    fn test_from_crossterm_unmodelled() {
        assert!(from_crossterm_key(KeyCode::F(5), KeyModifiers::NONE).is_none());
    }
}
