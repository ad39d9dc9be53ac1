//! Selection state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::option::DropdownOption;

/// What happened when an option was applied to a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The option is now selected.
    Selected,
    /// The option was already selected and has been removed (multi only).
    Deselected,
    /// The selection is full; nothing changed.
    Rejected,
    /// There was nothing to select.
    Unchanged,
}

impl SelectOutcome {
    /// Returns true when the selection changed.
    pub const fn changed(self) -> bool {
        matches!(self, Self::Selected | Self::Deselected)
    }
}

/// The host-facing value of a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    /// Single and search modes: one value, empty for none.
    Single(String),
    /// Multi-select: selected values in insertion order.
    Multi(Vec<String>),
}

impl SelectionValue {
    /// Returns true when nothing is selected.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(v) => v.is_empty(),
            Self::Multi(v) => v.is_empty(),
        }
    }
}

impl Default for SelectionValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

/// Selected options, by mode.
///
/// Multi selections are ordered by insertion and unique by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// At most one option.
    Single(Option<DropdownOption>),
    /// Any number of options up to `max`.
    Multi {
        options: Vec<DropdownOption>,
        max: Option<usize>,
    },
}

impl Default for Selection {
    fn default() -> Self {
        Self::Single(None)
    }
}

impl Selection {
    /// An empty multi selection with an optional cap.
    pub const fn multi(max: Option<usize>) -> Self {
        Self::Multi {
            options: Vec::new(),
            max,
        }
    }

    /// Applies `option`: single replaces, multi toggles.
    ///
    /// A full multi selection rejects new options and stays unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use combobox::{DropdownOption, SelectOutcome, Selection};
    ///
    /// let mut sel = Selection::multi(Some(1));
    /// let a = DropdownOption::new("a", "A");
    /// assert_eq!(sel.apply(a.clone()), SelectOutcome::Selected);
    /// assert_eq!(sel.apply(DropdownOption::new("b", "B")), SelectOutcome::Rejected);
    /// assert_eq!(sel.apply(a), SelectOutcome::Deselected);
    /// assert!(sel.is_empty());
    /// ```
    pub fn apply(&mut self, option: DropdownOption) -> SelectOutcome {
        match self {
            Self::Single(slot) => {
                debug!(value = option.value(), "option selected");
                *slot = Some(option);
                SelectOutcome::Selected
            }
            Self::Multi { options, max } => {
                if let Some(pos) = options.iter().position(|o| o.value() == option.value()) {
                    options.remove(pos);
                    debug!(value = option.value(), "option deselected");
                    return SelectOutcome::Deselected;
                }
                if max.is_some_and(|max| options.len() >= max) {
                    debug!(value = option.value(), max = ?max, "selection full, rejecting");
                    return SelectOutcome::Rejected;
                }
                debug!(value = option.value(), "option selected");
                options.push(option);
                SelectOutcome::Selected
            }
        }
    }

    /// Removes the option with `value`, returning it.
    pub fn remove(&mut self, value: &str) -> Option<DropdownOption> {
        match self {
            Self::Single(slot) => {
                if slot.as_ref().is_some_and(|o| o.value() == value) {
                    slot.take()
                } else {
                    None
                }
            }
            Self::Multi { options, .. } => {
                let pos = options.iter().position(|o| o.value() == value)?;
                Some(options.remove(pos))
            }
        }
    }

    /// Removes the most recently added option.
    pub fn pop(&mut self) -> Option<DropdownOption> {
        match self {
            Self::Single(slot) => slot.take(),
            Self::Multi { options, .. } => options.pop(),
        }
    }

    /// Removes everything. Returns true when something was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.is_empty();
        match self {
            Self::Single(slot) => *slot = None,
            Self::Multi { options, .. } => options.clear(),
        }
        had_any
    }

    /// Replaces the selected options, keeping the first of any duplicate
    /// values and honoring the cap.
    pub fn replace(&mut self, new: Vec<DropdownOption>) {
        match self {
            Self::Single(slot) => *slot = new.into_iter().next(),
            Self::Multi { options, max } => {
                let mut deduped = crate::option::dedup_by_value(new);
                if let Some(max) = *max {
                    deduped.truncate(max);
                }
                *options = deduped;
            }
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value() == value)
    }

    /// Selected options in insertion order.
    pub fn options(&self) -> &[DropdownOption] {
        match self {
            Self::Single(slot) => slot.as_slice(),
            Self::Multi { options, .. } => options,
        }
    }

    /// Selected values in insertion order.
    pub fn values(&self) -> Vec<&str> {
        self.options().iter().map(DropdownOption::value).collect()
    }

    pub fn len(&self) -> usize {
        self.options().len()
    }

    pub fn is_empty(&self) -> bool {
        self.options().is_empty()
    }

    /// Returns true when a multi selection has reached its cap.
    pub fn is_full(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::Multi { options, max } => max.is_some_and(|max| options.len() >= max),
        }
    }

    pub const fn is_multi(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    /// The value to hand to the host.
    pub fn value(&self) -> SelectionValue {
        match self {
            Self::Single(slot) => SelectionValue::Single(
                slot.as_ref()
                    .map(|o| o.value().to_string())
                    .unwrap_or_default(),
            ),
            Self::Multi { options, .. } => {
                SelectionValue::Multi(options.iter().map(|o| o.value().to_string()).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(v: &str) -> DropdownOption {
        DropdownOption::new(v, v.to_uppercase())
    }

    #[test]
    fn test_single_replaces() {
        let mut sel = Selection::default();
        assert_eq!(sel.apply(opt("a")), SelectOutcome::Selected);
        assert_eq!(sel.apply(opt("b")), SelectOutcome::Selected);
        assert_eq!(sel.values(), vec!["b"]);
        assert_eq!(sel.value(), SelectionValue::Single("b".into()));
    }

    #[test]
    fn test_multi_toggle_and_cap() {
        let mut sel = Selection::multi(Some(2));
        sel.apply(opt("a"));
        sel.apply(opt("b"));
        assert!(sel.is_full());
        assert_eq!(sel.apply(opt("c")), SelectOutcome::Rejected);
        assert_eq!(sel.values(), vec!["a", "b"]);

        // Toggling off an existing value works even when full.
        assert_eq!(sel.apply(opt("a")), SelectOutcome::Deselected);
        assert_eq!(sel.apply(opt("c")), SelectOutcome::Selected);
        assert_eq!(sel.values(), vec!["b", "c"]);
    }

    #[test]
    fn test_pop_removes_latest() {
        let mut sel = Selection::multi(None);
        sel.apply(opt("a"));
        sel.apply(opt("b"));
        assert_eq!(sel.pop().map(|o| o.value().to_string()), Some("b".into()));
        assert_eq!(sel.values(), vec!["a"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut sel = Selection::multi(None);
        sel.apply(opt("a"));
        sel.apply(opt("b"));
        assert!(sel.remove("zzz").is_none());
        assert!(sel.remove("a").is_some());
        assert!(sel.clear());
        assert!(!sel.clear());
        assert_eq!(sel.value(), SelectionValue::Multi(vec![]));
    }

    #[test]
    fn test_replace_dedups_and_truncates() {
        let mut sel = Selection::multi(Some(2));
        sel.replace(vec![opt("a"), opt("a"), opt("b"), opt("c")]);
        assert_eq!(sel.values(), vec!["a", "b"]);
    }

    #[test]
    fn test_selection_value_json() {
        let v: SelectionValue = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(v, SelectionValue::Multi(vec!["x".into(), "y".into()]));
        let v: SelectionValue = serde_json::from_str(r#""x""#).unwrap();
        assert_eq!(v, SelectionValue::Single("x".into()));
    }
}
