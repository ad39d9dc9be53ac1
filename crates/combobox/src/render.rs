//! Presentation leaves.
//!
//! Everything here is a pure function of its arguments: option rows, the
//! empty-panel message and the search footer. Layout works on unstyled text
//! measured with `unicode-width`; styles are applied last so escape codes
//! never count towards a width.

use std::fmt;

use crossterm::style::ContentStyle;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Mode;
use crate::error::SearchError;
use crate::option::{DropdownOption, OptionKind};
use crate::theme::{Theme, paint};

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Truncates `s` to at most `width` columns, ending with an ellipsis when
/// anything was cut.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Pads `s` with spaces to exactly `width` columns, truncating if needed.
pub fn pad(s: &str, width: usize) -> String {
    let mut out = truncate(s, width);
    let w = out.width();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(w)));
    out
}

/// A line built from styled segments.
///
/// Segments keep their raw text until [`Spans::render`], so the line can be
/// measured, truncated and padded first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spans {
    parts: Vec<(String, ContentStyle)>,
}

impl Spans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment.
    pub fn push(&mut self, text: impl Into<String>, style: ContentStyle) {
        let text = text.into();
        if !text.is_empty() {
            self.parts.push((text, style));
        }
    }

    /// Display width in columns.
    pub fn width(&self) -> usize {
        self.parts.iter().map(|(t, _)| t.width()).sum()
    }

    /// The text without styles.
    pub fn plain(&self) -> String {
        self.parts.iter().map(|(t, _)| t.as_str()).collect()
    }

    /// Cuts the line to `width` columns, ending with an ellipsis.
    pub fn truncate(&mut self, width: usize) {
        if self.width() <= width {
            return;
        }
        let mut kept = Vec::new();
        let mut used = 0;
        let budget = width.saturating_sub(1);
        let mut last_style = ContentStyle::default();
        for (text, style) in self.parts.drain(..) {
            last_style = style;
            let w = text.width();
            if used + w <= budget {
                used += w;
                kept.push((text, style));
                continue;
            }
            let mut cut = String::new();
            for c in text.chars() {
                let cw = c.width().unwrap_or(0);
                if used + cw > budget {
                    break;
                }
                cut.push(c);
                used += cw;
            }
            if !cut.is_empty() {
                kept.push((cut, style));
            }
            break;
        }
        if width > 0 {
            kept.push((ELLIPSIS.to_string(), last_style));
        }
        self.parts = kept;
    }

    /// Pads with unstyled spaces to `width` columns (truncating first).
    pub fn pad(&mut self, width: usize) {
        self.truncate(width);
        let fill = width.saturating_sub(self.width());
        if fill > 0 {
            self.parts
                .push((" ".repeat(fill), ContentStyle::default()));
        }
    }

    /// Joins the segments, applying their styles.
    pub fn render(&self) -> String {
        self.parts.iter().map(|(t, s)| paint(*s, t)).collect()
    }
}

/// Renders one option row of the panel.
pub trait ItemDelegate: Send {
    /// Renders `item` at `index` into exactly `width` columns.
    fn render(
        &self,
        item: &DropdownOption,
        index: usize,
        highlighted: bool,
        selected: bool,
        width: usize,
        theme: &Theme,
    ) -> String;
}

/// The stock row renderer.
///
/// Select and multi-select rows show the label, with a check mark on
/// selected multi-select rows. Search rows show a `›` marker and a "Help"
/// badge for [`OptionKind::Query`] items.
#[derive(Debug, Clone, Copy)]
pub struct DefaultDelegate {
    mode: Mode,
}

impl DefaultDelegate {
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl ItemDelegate for DefaultDelegate {
    fn render(
        &self,
        item: &DropdownOption,
        _index: usize,
        highlighted: bool,
        selected: bool,
        width: usize,
        theme: &Theme,
    ) -> String {
        let row_style = if selected && self.mode == Mode::Select {
            theme.selected
        } else if highlighted {
            theme.highlighted
        } else {
            theme.item
        };

        let (marker, trailer) = match self.mode {
            Mode::Search => (if highlighted { "› " } else { "  " }, "›"),
            Mode::MultiSelect => (" ", if selected { "✓" } else { " " }),
            Mode::Select => (" ", " "),
        };
        let badge = if self.mode == Mode::Search && item.kind() == Some(OptionKind::Query) {
            " Help "
        } else {
            ""
        };

        let fixed = marker.width() + trailer.width() + badge.width() + 2;
        let label_width = width.saturating_sub(fixed);
        let label = truncate(item.label(), label_width);

        let mut line = Spans::new();
        line.push(marker, row_style);
        line.push(label, row_style);
        if !badge.is_empty() {
            line.push(" ", row_style);
            line.push(badge, theme.badge);
        }
        let used = line.width();
        let gap = width.saturating_sub(used + trailer.width() + 1);
        line.push(" ".repeat(gap), row_style);
        line.push(trailer, row_style);
        line.push(" ", row_style);
        line.pad(width);
        line.render()
    }
}

/// Inputs of the empty-panel message.
#[derive(Debug, Clone, Copy)]
pub struct EmptyState<'a> {
    pub loading: bool,
    pub error: Option<&'a SearchError>,
    pub min_chars: usize,
    /// Length of the current query in characters.
    pub query_len: usize,
    /// Whether items come from a remote source.
    pub remote: bool,
    pub mode: Mode,
}

impl EmptyState<'_> {
    /// Decides which message to show.
    pub fn view(&self) -> EmptyView {
        if self.loading {
            return EmptyView::Loading;
        }
        if let Some(err) = self.error {
            return EmptyView::Error(err.to_string());
        }
        if (self.remote || self.mode == Mode::Search) && self.query_len < self.min_chars {
            return EmptyView::TypeMore(self.min_chars);
        }
        if self.mode.is_choice() {
            EmptyView::NoOptions
        } else {
            EmptyView::NoSuggestions
        }
    }
}

/// What an empty panel says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyView {
    Loading,
    /// A failed search, with a retry hint.
    Error(String),
    /// The query is shorter than the minimum.
    TypeMore(usize),
    NoOptions,
    NoSuggestions,
}

impl fmt::Display for EmptyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading..."),
            Self::Error(msg) => write!(f, "{msg}  [ctrl+r] Retry"),
            Self::TypeMore(n) => write!(
                f,
                "Type at least {n} character{} to search",
                if *n == 1 { "" } else { "s" }
            ),
            Self::NoOptions => f.write_str("No options found"),
            Self::NoSuggestions => f.write_str("No suggestions found"),
        }
    }
}

/// Renders the empty-panel message as plain text.
///
/// # Example
///
/// ```rust
/// use combobox::{Mode, render::{EmptyState, render_empty}};
///
/// let state = EmptyState {
///     loading: false,
///     error: None,
///     min_chars: 2,
///     query_len: 1,
///     remote: true,
///     mode: Mode::Search,
/// };
/// assert_eq!(render_empty(&state), "Type at least 2 characters to search");
/// ```
pub fn render_empty(state: &EmptyState<'_>) -> String {
    state.view().to_string()
}

/// The "search for the literal query" footer, shown in search mode when the
/// input is not blank.
pub fn render_footer(input: &str, mode: Mode) -> Option<String> {
    if mode != Mode::Search || input.trim().is_empty() {
        return None;
    }
    Some(format!("Search for \"{input}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("hello", 0), "");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abc…");
    }

    #[test]
    fn test_wide_chars_measured_by_columns() {
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(pad("日本", 5).width(), 5);
    }

    #[test]
    fn test_spans_truncate_across_segments() {
        let mut line = Spans::new();
        line.push("abc", ContentStyle::default());
        line.push("defgh", ContentStyle::default());
        line.truncate(6);
        assert_eq!(line.plain(), "abcde…");
        line.pad(8);
        assert_eq!(line.plain(), "abcde…  ");
    }

    #[test]
    fn test_default_rows_fill_width() {
        let theme = Theme::plain();
        let item = DropdownOption::new("1", "Apple");
        for mode in [Mode::Select, Mode::Search, Mode::MultiSelect] {
            let row = DefaultDelegate::new(mode).render(&item, 0, true, true, 20, &theme);
            assert_eq!(row.width(), 20, "{mode}");
            assert!(row.contains("Apple"));
        }
    }

    #[test]
    fn test_multiselect_row_marks_selected() {
        let theme = Theme::plain();
        let item = DropdownOption::new("1", "Apple");
        let delegate = DefaultDelegate::new(Mode::MultiSelect);
        assert!(delegate.render(&item, 0, false, true, 20, &theme).contains('✓'));
        assert!(!delegate.render(&item, 0, false, false, 20, &theme).contains('✓'));
    }

    #[test]
    fn test_search_row_badge_for_queries() {
        let theme = Theme::plain();
        let item = DropdownOption::new("q", "How to return").with_kind(OptionKind::Query);
        let row = DefaultDelegate::new(Mode::Search).render(&item, 0, true, false, 30, &theme);
        assert!(row.starts_with("› How to return"));
        assert!(row.contains("Help"));
    }

    #[test]
    fn test_empty_views() {
        let err = SearchError::Transport("timeout".into());
        let mut state = EmptyState {
            loading: true,
            error: Some(&err),
            min_chars: 1,
            query_len: 0,
            remote: true,
            mode: Mode::Search,
        };
        assert_eq!(render_empty(&state), "Loading...");
        state.loading = false;
        assert_eq!(render_empty(&state), "API request failed: timeout  [ctrl+r] Retry");
        state.error = None;
        assert_eq!(render_empty(&state), "Type at least 1 character to search");
        state.query_len = 3;
        assert_eq!(render_empty(&state), "No suggestions found");
        state.mode = Mode::Select;
        assert_eq!(render_empty(&state), "No options found");
    }

    #[test]
    fn test_footer() {
        assert_eq!(
            render_footer("red shoes", Mode::Search).as_deref(),
            Some("Search for \"red shoes\"")
        );
        assert_eq!(render_footer("  ", Mode::Search), None);
        assert_eq!(render_footer("x", Mode::Select), None);
    }
}
