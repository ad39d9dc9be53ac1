//! Key bindings.
//!
//! A [`Binding`] is a set of key names (as produced by `KeyMsg`'s `Display`,
//! e.g. "down", "ctrl+r", "tab") plus help text. [`KeyMap`] holds every
//! binding the combobox reacts to, so hosts can remap or disable keys.
//!
//! ```rust
//! use combobox::key::{Binding, matches};
//!
//! let next = Binding::new().keys(&["down", "ctrl+n"]).help("↓", "next");
//! assert!(matches("ctrl+n", &[&next]));
//! assert!(!matches("up", &[&next]));
//! ```

use std::fmt;

/// Help information for a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// The key(s) as shown to the user (e.g. "↑/↓").
    pub key: String,
    /// What the binding does.
    pub desc: String,
}

impl Help {
    pub fn new(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            desc: desc.into(),
        }
    }
}

/// A key binding with help text.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<String>,
    help: Help,
    disabled: bool,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keys that trigger this binding.
    #[must_use]
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help::new(key, desc);
        self
    }

    pub fn get_keys(&self) -> &[String] {
        &self.keys
    }

    pub const fn get_help(&self) -> &Help {
        &self.help
    }

    /// A binding is enabled when it is not disabled and has keys.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Removes keys and help entirely.
    pub fn unbind(&mut self) {
        self.keys.clear();
        self.help = Help::default();
    }
}

/// Returns true if `key` triggers any enabled binding.
pub fn matches<K: fmt::Display>(key: K, bindings: &[&Binding]) -> bool {
    let key = key.to_string();
    bindings
        .iter()
        .filter(|b| b.enabled())
        .any(|b| b.keys.iter().any(|k| *k == key))
}

/// Keys the combobox reacts to.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Move the highlight down (opens a closed panel).
    pub next: Binding,
    /// Move the highlight up.
    pub prev: Binding,
    /// Select the highlighted item, or submit the query in search mode.
    pub select: Binding,
    /// Close the panel and restore the field.
    pub close: Binding,
    /// Accept the ghost completion.
    pub accept_ghost: Binding,
    /// Retry a failed search.
    pub retry: Binding,
    /// Clear the value.
    pub clear: Binding,
    pub cursor_left: Binding,
    pub cursor_right: Binding,
    pub line_start: Binding,
    pub line_end: Binding,
    /// Delete before the cursor; on an empty multi-select field, remove the
    /// last chip.
    pub delete_backward: Binding,
    pub delete_forward: Binding,
    pub delete_before_cursor: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next: Binding::new().keys(&["down", "ctrl+n"]).help("↓", "next"),
            prev: Binding::new().keys(&["up", "ctrl+p"]).help("↑", "previous"),
            select: Binding::new().keys(&["enter"]).help("enter", "select"),
            close: Binding::new().keys(&["esc"]).help("esc", "close"),
            accept_ghost: Binding::new()
                .keys(&["tab", "right"])
                .help("tab", "complete"),
            retry: Binding::new().keys(&["ctrl+r"]).help("ctrl+r", "retry"),
            clear: Binding::new().keys(&["ctrl+l"]).help("ctrl+l", "clear"),
            cursor_left: Binding::new().keys(&["left", "ctrl+b"]),
            cursor_right: Binding::new().keys(&["right", "ctrl+f"]),
            line_start: Binding::new().keys(&["home", "ctrl+a"]),
            line_end: Binding::new().keys(&["end", "ctrl+e"]),
            delete_backward: Binding::new().keys(&["backspace", "ctrl+h"]),
            delete_forward: Binding::new().keys(&["delete", "ctrl+d"]),
            delete_before_cursor: Binding::new().keys(&["ctrl+u"]),
        }
    }
}

impl KeyMap {
    /// Bindings worth listing in a one-line help footer.
    pub fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.next,
            &self.prev,
            &self.select,
            &self.accept_ghost,
            &self.close,
        ]
    }
}

/// Renders bindings as "key desc • key desc".
pub fn help_line(bindings: &[&Binding]) -> String {
    bindings
        .iter()
        .filter(|b| b.enabled() && !b.get_help().key.is_empty())
        .map(|b| format!("{} {}", b.help.key, b.help.desc))
        .collect::<Vec<_>>()
        .join(" • ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tea_core::{KeyMsg, KeyType};

    #[test]
    fn test_matches_key_messages() {
        let keymap = KeyMap::default();
        assert!(matches(KeyMsg::from_type(KeyType::Down), &[&keymap.next]));
        assert!(matches(KeyMsg::ctrl('r'), &[&keymap.retry]));
        assert!(matches(KeyMsg::from_type(KeyType::Tab), &[&keymap.accept_ghost]));
        assert!(!matches(KeyMsg::from_char('j'), &[&keymap.next]));
    }

    #[test]
    fn test_disabled_and_unbound() {
        let mut b = Binding::new().keys(&["x"]);
        b.set_enabled(false);
        assert!(!matches("x", &[&b]));
        b.set_enabled(true);
        assert!(matches("x", &[&b]));
        b.unbind();
        assert!(!b.enabled());
    }

    #[test]
    fn test_help_line() {
        let keymap = KeyMap::default();
        let line = help_line(&keymap.short_help());
        assert!(line.starts_with("↓ next • ↑ previous"));
        assert!(line.contains("tab complete"));
    }
}
