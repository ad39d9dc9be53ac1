//! The combobox view.
//!
//! [`Combobox`] binds a [`DropdownState`] to terminal input and output. It
//! implements [`Model`]: key messages edit the text and drive the
//! controller, debounce and search messages are forwarded to it, and `view`
//! draws the label, the field, the panel and the error line.
//!
//! Pointer-style events have no terminal counterpart, so they are exposed as
//! methods the host calls directly ([`Combobox::click_item`],
//! [`Combobox::click_clear`], ...).
//!
//! Value changes are reported to the host as messages: [`ChangeMsg`] when the
//! value changes and [`SearchSubmitMsg`] when a query is submitted. Each
//! carries the combobox id so a form with several fields can tell them apart.
//!
//! # Example
//!
//! ```rust
//! use combobox::{Combobox, ComboboxConfig, DropdownOption, Mode};
//! use tea_core::{KeyMsg, KeyType, Message, Model};
//!
//! let config = ComboboxConfig::new(Mode::Select)
//!     .with_label("Department")
//!     .with_options(vec![
//!         DropdownOption::new("eng", "Engineering"),
//!         DropdownOption::new("ops", "Operations"),
//!     ]);
//! let mut field = Combobox::new(config).unwrap();
//! field.focus();
//! field.update(Message::new(KeyMsg::from_type(KeyType::Down)));
//! field.update(Message::new(KeyMsg::from_type(KeyType::Enter)));
//! assert_eq!(field.state().input_text(), "Engineering");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::style::ContentStyle;
use tea_core::{Cmd, KeyMsg, Message, Model, batch};
use tracing::debug;

use crate::config::{ComboboxConfig, Mode};
use crate::controller::{Direction, DropdownState, ItemSource};
use crate::error::{ConfigError, ValidationError};
use crate::key::{KeyMap, matches};
use crate::option::{DropdownOption, dedup_by_value};
use crate::render::{DefaultDelegate, EmptyState, EmptyView, ItemDelegate, Spans, render_footer};
use crate::search::{SearchClient, SearchSource};
use crate::selection::{SelectOutcome, SelectionValue};
use crate::theme::{Theme, paint};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// The value of a combobox changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMsg {
    /// Id of the combobox that changed.
    pub id: u64,
    /// The new value: the text in search mode, the selected value(s) otherwise.
    pub value: SelectionValue,
    /// The options behind the value, when there are any.
    pub options: Vec<DropdownOption>,
}

/// A search query was submitted (search mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSubmitMsg {
    /// Id of the combobox.
    pub id: u64,
    pub query: String,
}

enum Action {
    AcceptGhost,
    Close,
    PopChip,
    Move(Direction),
    Select,
    Retry,
    Clear,
    CursorLeft,
    CursorRight,
    LineStart,
    LineEnd,
    DeleteBackward,
    DeleteForward,
    DeleteBeforeCursor,
    Insert(Vec<char>),
}

/// A searchable dropdown, select or multi-select field.
pub struct Combobox {
    id: u64,
    state: DropdownState,
    label: Option<String>,
    placeholder: String,
    error: Option<String>,
    required: bool,
    clearable: bool,
    enable_autocomplete: bool,
    width: usize,
    max_height: usize,
    theme: Theme,
    keymap: KeyMap,
    delegate: Box<dyn ItemDelegate>,
    focused: bool,
    cursor: usize,
}

impl Combobox {
    /// Builds a combobox from `config`.
    ///
    /// With `config.api` set, items come from that endpoint; otherwise
    /// `config.options` are filtered locally.
    pub fn new(config: ComboboxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let source = match &config.api {
            Some(api) => ItemSource::Remote(SearchClient::new(
                api.build_source(config.max_suggestions)?,
            )),
            None => ItemSource::Static(dedup_by_value(config.options.clone())),
        };
        Ok(Self::build(config, source))
    }

    /// Builds a combobox whose items come from `source`.
    ///
    /// `config.options` and `config.api` are ignored; the minimum query
    /// length defaults to 1 as for any remote source.
    pub fn with_source(
        mut config: ComboboxConfig,
        source: impl SearchSource,
    ) -> Result<Self, ConfigError> {
        config.api = None;
        config.validate()?;
        if config.min_chars_for_search.is_none() {
            config.min_chars_for_search = Some(1);
        }
        Ok(Self::build(
            config,
            ItemSource::Remote(SearchClient::new(source)),
        ))
    }

    fn build(config: ComboboxConfig, source: ItemSource) -> Self {
        let state = DropdownState::from_config(&config, source);
        let id = next_id();
        debug!(id, mode = %config.mode, remote = state.is_remote(), "combobox created");
        Self {
            id,
            state,
            label: config.label,
            placeholder: config.placeholder,
            error: config.error,
            required: config.required,
            clearable: config.clearable,
            enable_autocomplete: config.enable_autocomplete,
            width: usize::from(config.width.max(8)),
            max_height: config.max_height.max(1),
            theme: Theme::from_variant(config.theme),
            keymap: KeyMap::default(),
            delegate: Box::new(DefaultDelegate::new(config.mode)),
            focused: false,
            cursor: 0,
        }
    }

    /// Replaces the theme.
    #[must_use]
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Replaces the key map.
    #[must_use]
    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Replaces the row renderer.
    #[must_use]
    pub fn with_delegate(mut self, delegate: impl ItemDelegate + 'static) -> Self {
        self.delegate = Box::new(delegate);
        self
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The underlying controller state.
    pub const fn state(&self) -> &DropdownState {
        &self.state
    }

    pub const fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Cursor position in characters.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The current value as the host sees it.
    pub fn value(&self) -> SelectionValue {
        match self.state.mode() {
            Mode::Search => SelectionValue::Single(self.state.input_text().to_string()),
            Mode::Select | Mode::MultiSelect => self.state.selection().value(),
        }
    }

    /// Returns true when there is nothing to submit.
    pub fn is_empty(&self) -> bool {
        match self.state.mode() {
            Mode::Search => self.state.input_text().trim().is_empty(),
            Mode::Select | Mode::MultiSelect => self.state.selection().is_empty(),
        }
    }

    /// Checks the required flag.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.required && self.is_empty() {
            return Err(ValidationError::Required {
                field: self
                    .label
                    .clone()
                    .unwrap_or_else(|| "This field".to_string()),
            });
        }
        Ok(())
    }

    /// Sets or clears the host error shown under the field.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enables or disables the field. Disabling also blurs it.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.state.set_disabled(disabled);
        if disabled {
            self.focused = false;
        }
    }

    /// Replaces the static options.
    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        self.state.set_options(dedup_by_value(options));
    }

    /// Reflects a value set by the host, without searching or emitting.
    pub fn set_value(&mut self, value: SelectionValue) {
        let mode = self.state.mode();
        let values = match value {
            SelectionValue::Single(v) if v.is_empty() => Vec::new(),
            SelectionValue::Single(v) => vec![v],
            SelectionValue::Multi(vs) => vs,
        };
        match mode {
            Mode::Search => {
                let text = values.into_iter().next().unwrap_or_default();
                self.state.set_input_value_silent(text);
            }
            Mode::Select => {
                let option = values
                    .first()
                    .and_then(|v| self.state.find_option(v))
                    .cloned();
                let label = option
                    .as_ref()
                    .map(|o| o.label().to_string())
                    .unwrap_or_default();
                self.state.set_selection(option.into_iter().collect());
                if !self.state.is_open() {
                    self.state.set_input_value_silent(label);
                }
            }
            Mode::MultiSelect => {
                let options: Vec<DropdownOption> = values
                    .iter()
                    .map(|v| {
                        self.state
                            .find_option(v)
                            .cloned()
                            .unwrap_or_else(|| DropdownOption::new(v.clone(), v.clone()))
                    })
                    .collect();
                self.state.set_selection(options);
            }
        }
        self.cursor = self.text_len();
    }

    // ---- ghost ----

    fn ghost_candidate(&self) -> Option<(&DropdownOption, &str)> {
        if !self.enable_autocomplete || !self.focused || self.state.is_disabled() {
            return None;
        }
        let input = self.state.input_text();
        if input.trim().is_empty() || self.cursor != self.text_len() {
            return None;
        }
        let folded = fold_case(input);
        self.state.items().iter().find_map(|item| {
            completion_rest(item.label(), &folded)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (item, rest))
        })
    }

    /// The ghost completion: the rest of the first item whose label starts
    /// with the input.
    pub fn ghost(&self) -> Option<String> {
        self.ghost_candidate().map(|(_, rest)| rest.to_string())
    }

    /// Returns true when Tab would accept a completion.
    pub fn has_ghost(&self) -> bool {
        self.ghost_candidate().is_some()
    }

    fn accept_ghost(&mut self) -> Option<Cmd> {
        let item = self.ghost_candidate()?.0.clone();
        debug!(id = self.id, label = item.label(), "ghost completion accepted");
        self.state.set_input_value_silent(item.label());
        self.cursor = self.text_len();
        // Multi-select completes the text only; Enter toggles the chip.
        match self.state.mode() {
            Mode::Select => {
                let outcome = self.state.select_item(item);
                self.after_select(outcome)
            }
            Mode::Search | Mode::MultiSelect => None,
        }
    }

    // ---- host events ----

    /// Gives the field keyboard focus.
    ///
    /// Select and multi-select open their panel; search mode reopens only
    /// when there is text with results.
    pub fn focus(&mut self) {
        if self.state.is_disabled() {
            return;
        }
        self.focused = true;
        self.cursor = self.text_len();
        let has_results =
            !self.state.input_text().trim().is_empty() && !self.state.items().is_empty();
        if self.state.mode().is_choice() || has_results {
            self.state.open();
        }
    }

    /// Removes focus, closing the panel and restoring the display text.
    pub fn blur(&mut self) {
        self.focused = false;
        self.close_and_restore();
    }

    /// A click anywhere outside the field.
    pub fn click_outside(&mut self) {
        self.blur();
    }

    /// A click on the text field.
    pub fn click_input(&mut self) {
        if self.state.is_disabled() {
            return;
        }
        if !self.focused {
            self.focus();
        }
        if !self.state.is_open() {
            self.state.open();
        }
    }

    /// A click on the chevron.
    pub fn click_toggle(&mut self) {
        if self.state.is_disabled() {
            return;
        }
        if self.state.is_open() {
            self.close_and_restore();
        } else {
            self.focused = true;
            self.state.open();
        }
    }

    /// A click on the `index`-th visible item.
    pub fn click_item(&mut self, index: usize) -> Option<Cmd> {
        if self.state.is_disabled() || !self.state.is_open() {
            return None;
        }
        let item = self.state.items().get(index)?.clone();
        let outcome = self.state.select_item(item);
        self.after_select(outcome)
    }

    /// The pointer moved over the `index`-th item.
    pub fn hover(&mut self, index: usize) {
        self.state.set_highlighted(Some(index));
    }

    /// A click on a chip's remove button.
    pub fn remove_chip(&mut self, value: &str) -> Option<Cmd> {
        if self.state.is_disabled() || !self.state.remove_selection(value) {
            return None;
        }
        Some(self.change_cmd())
    }

    /// Whether the clear button is shown.
    pub fn can_clear(&self) -> bool {
        if self.state.is_disabled() {
            return false;
        }
        match self.state.mode() {
            Mode::Search => !self.state.input_text().is_empty(),
            Mode::Select | Mode::MultiSelect => {
                self.clearable && !self.state.selection().is_empty()
            }
        }
    }

    /// A click on the clear button.
    pub fn click_clear(&mut self) -> Option<Cmd> {
        if !self.can_clear() {
            return None;
        }
        self.state.clear();
        self.cursor = 0;
        debug!(id = self.id, "value cleared");
        Some(self.change_cmd())
    }

    /// A click on the retry button of a failed search.
    pub fn click_retry(&mut self) -> Option<Cmd> {
        self.state.retry()
    }

    /// A click on the "Search for ..." footer.
    pub fn click_footer(&mut self) -> Option<Cmd> {
        let query = self.state.input_text().to_string();
        render_footer(&query, self.state.mode())?;
        self.state.close();
        Some(self.submit_cmd(query))
    }

    // ---- internals ----

    fn text_len(&self) -> usize {
        self.state.input_text().chars().count()
    }

    fn close_and_restore(&mut self) {
        self.state.close();
        match self.state.mode() {
            Mode::Select => {
                let label = self
                    .state
                    .selection()
                    .options()
                    .first()
                    .map(|o| o.label().to_string())
                    .unwrap_or_default();
                self.state.set_input_value_silent(label);
            }
            Mode::MultiSelect => self.state.set_input_value_silent(""),
            Mode::Search => {}
        }
        self.cursor = self.text_len();
    }

    fn change_cmd(&self) -> Cmd {
        Cmd::message(ChangeMsg {
            id: self.id,
            value: self.value(),
            options: self.state.selection().options().to_vec(),
        })
    }

    fn submit_cmd(&self, query: String) -> Cmd {
        debug!(id = self.id, query = %query, "search submitted");
        Cmd::message(SearchSubmitMsg { id: self.id, query })
    }

    fn after_select(&mut self, outcome: SelectOutcome) -> Option<Cmd> {
        self.cursor = self.text_len();
        if !outcome.changed() {
            return None;
        }
        match self.state.mode() {
            Mode::Search => {
                let label = self.state.input_text().to_string();
                batch(vec![Some(self.change_cmd()), Some(self.submit_cmd(label))])
            }
            Mode::Select | Mode::MultiSelect => Some(self.change_cmd()),
        }
    }

    fn text_changed(&mut self, text: String) -> Option<Cmd> {
        let cmd = self.state.set_input_value(text);
        if self.state.mode() == Mode::Search {
            batch(vec![cmd, Some(self.change_cmd())])
        } else {
            cmd
        }
    }

    fn action_for(&self, key: &KeyMsg) -> Option<Action> {
        let km = &self.keymap;
        let empty = self.state.input_text().is_empty();

        if matches(key, &[&km.accept_ghost]) && self.has_ghost() {
            return Some(Action::AcceptGhost);
        }
        if matches(key, &[&km.close]) {
            return Some(Action::Close);
        }
        if matches(key, &[&km.delete_backward])
            && empty
            && self.state.mode() == Mode::MultiSelect
            && !self.state.selection().is_empty()
        {
            return Some(Action::PopChip);
        }
        let action = if matches(key, &[&km.next]) {
            Action::Move(Direction::Down)
        } else if matches(key, &[&km.prev]) {
            Action::Move(Direction::Up)
        } else if matches(key, &[&km.select]) {
            Action::Select
        } else if matches(key, &[&km.retry]) {
            Action::Retry
        } else if matches(key, &[&km.clear]) {
            Action::Clear
        } else if matches(key, &[&km.cursor_left]) {
            Action::CursorLeft
        } else if matches(key, &[&km.cursor_right]) {
            Action::CursorRight
        } else if matches(key, &[&km.line_start]) {
            Action::LineStart
        } else if matches(key, &[&km.line_end]) {
            Action::LineEnd
        } else if matches(key, &[&km.delete_backward]) {
            Action::DeleteBackward
        } else if matches(key, &[&km.delete_forward]) {
            Action::DeleteForward
        } else if matches(key, &[&km.delete_before_cursor]) {
            Action::DeleteBeforeCursor
        } else if key.is_runes() && !key.alt {
            Action::Insert(key.runes.clone())
        } else {
            return None;
        };
        Some(action)
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        let action = self.action_for(key)?;
        let mut chars: Vec<char> = self.state.input_text().chars().collect();
        let cursor = self.cursor.min(chars.len());

        match action {
            Action::AcceptGhost => self.accept_ghost(),
            Action::Close => {
                self.close_and_restore();
                None
            }
            Action::PopChip => {
                self.state.pop_selection()?;
                Some(self.change_cmd())
            }
            Action::Move(direction) => {
                self.state.move_highlight(direction);
                None
            }
            Action::Select => {
                if self.state.is_open() && self.state.highlighted().is_some() {
                    let outcome = self.state.select_highlighted();
                    return self.after_select(outcome);
                }
                self.click_footer()
            }
            Action::Retry => self.state.retry(),
            Action::Clear => self.click_clear(),
            Action::CursorLeft => {
                self.cursor = cursor.saturating_sub(1);
                None
            }
            Action::CursorRight => {
                self.cursor = (cursor + 1).min(chars.len());
                None
            }
            Action::LineStart => {
                self.cursor = 0;
                None
            }
            Action::LineEnd => {
                self.cursor = chars.len();
                None
            }
            Action::DeleteBackward => {
                if cursor == 0 {
                    return None;
                }
                chars.remove(cursor - 1);
                self.cursor = cursor - 1;
                self.text_changed(chars.into_iter().collect())
            }
            Action::DeleteForward => {
                if cursor >= chars.len() {
                    return None;
                }
                chars.remove(cursor);
                self.cursor = cursor;
                self.text_changed(chars.into_iter().collect())
            }
            Action::DeleteBeforeCursor => {
                if cursor == 0 {
                    return None;
                }
                chars.drain(..cursor);
                self.cursor = 0;
                self.text_changed(chars.into_iter().collect())
            }
            Action::Insert(runes) => {
                let added = runes.len();
                for (i, c) in runes.into_iter().enumerate() {
                    chars.insert(cursor + i, c);
                }
                self.cursor = cursor + added;
                self.text_changed(chars.into_iter().collect())
            }
        }
    }

    // ---- rendering ----

    fn border_style(&self) -> ContentStyle {
        if self.error.is_some() {
            self.theme.border_error
        } else if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        }
    }

    fn field_line(&self, inner: usize) -> String {
        let theme = &self.theme;
        let disabled = self.state.is_disabled();
        let text_style = if disabled { theme.disabled } else { theme.text };
        let mode = self.state.mode();

        let mut left = Spans::new();
        left.push(" ", ContentStyle::default());
        if mode == Mode::Search {
            let icon = if self.state.is_loading() { "↻ " } else { "⌕ " };
            left.push(icon, theme.icon);
        }
        if mode == Mode::MultiSelect {
            for opt in self.state.selection().options() {
                left.push(format!("[{} ×]", opt.label()), theme.chip);
                left.push(" ", ContentStyle::default());
            }
        }

        let text = self.state.input_text();
        if text.is_empty() {
            let placeholder = if mode == Mode::MultiSelect && !self.state.selection().is_empty() {
                "Add more..."
            } else {
                self.placeholder.as_str()
            };
            if self.focused {
                let mut chars = placeholder.chars();
                let first = chars.next().map_or_else(|| " ".to_string(), String::from);
                left.push(first, theme.cursor);
                left.push(chars.collect::<String>(), theme.placeholder);
            } else {
                left.push(placeholder, theme.placeholder);
            }
        } else if self.focused {
            let chars: Vec<char> = text.chars().collect();
            let cursor = self.cursor.min(chars.len());
            left.push(chars[..cursor].iter().collect::<String>(), text_style);
            match chars.get(cursor) {
                Some(c) => {
                    left.push(c.to_string(), theme.cursor);
                    left.push(chars[cursor + 1..].iter().collect::<String>(), text_style);
                }
                None => match self.ghost() {
                    Some(ghost) => {
                        let mut rest = ghost.chars();
                        let first = rest.next().map_or_else(|| " ".to_string(), String::from);
                        left.push(first, theme.cursor);
                        left.push(rest.collect::<String>(), theme.ghost);
                    }
                    None => left.push(" ", theme.cursor),
                },
            }
        } else {
            left.push(text, text_style);
        }

        let mut right = Spans::new();
        if self.can_clear() {
            right.push(" ✕", theme.icon);
        }
        if mode.is_choice() {
            right.push(if self.state.is_open() { " ▴" } else { " ▾" }, theme.icon);
        }
        right.push(" ", ContentStyle::default());

        left.pad(inner.saturating_sub(right.width()));
        format!("{}{}", left.render(), right.render())
    }

    fn panel_lines(&self, inner: usize) -> Vec<String> {
        let theme = &self.theme;
        let items = self.state.items();
        let mut lines = Vec::new();

        if items.is_empty() {
            let empty = EmptyState {
                loading: self.state.is_loading(),
                error: self.state.error(),
                min_chars: self.state.min_chars(),
                query_len: self.state.input_text().trim().chars().count(),
                remote: self.state.is_remote(),
                mode: self.state.mode(),
            }
            .view();
            let style = match empty {
                EmptyView::Error(_) => theme.error,
                _ => theme.muted,
            };
            let mut line = Spans::new();
            line.push(format!(" {empty}"), style);
            line.pad(inner);
            lines.push(line.render());
        } else {
            let visible = self.max_height;
            let highlighted = self.state.highlighted();
            let offset = highlighted.map_or(0, |h| (h + 1).saturating_sub(visible));
            let selection = self.state.selection();
            for (i, item) in items.iter().enumerate().skip(offset).take(visible) {
                lines.push(self.delegate.render(
                    item,
                    i,
                    highlighted == Some(i),
                    selection.contains(item.value()),
                    inner,
                    theme,
                ));
            }
            if items.len() > visible {
                let end = (offset + visible).min(items.len());
                let mut line = Spans::new();
                line.push(format!(" {}-{} of {}", offset + 1, end, items.len()), theme.muted);
                line.pad(inner);
                lines.push(line.render());
            }
        }
        lines
    }
}

impl fmt::Debug for Combobox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combobox")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("label", &self.label)
            .field("focused", &self.focused)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Model for Combobox {
    fn init(&self) -> Option<Cmd> {
        None
    }

    fn update(&mut self, msg: Message) -> Option<Cmd> {
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if !self.focused || self.state.is_disabled() {
                return None;
            }
            return self.handle_key(key);
        }
        self.state.handle(&msg)
    }

    fn view(&self) -> String {
        let theme = &self.theme;
        let inner = self.width.saturating_sub(2);
        let border = self.border_style();
        let rule = "─".repeat(inner);
        let side = paint(border, "│");
        let mut lines = Vec::new();

        if let Some(label) = &self.label {
            let mut line = Spans::new();
            line.push(label.as_str(), theme.label);
            if self.required {
                line.push(" *", theme.required_mark);
            }
            lines.push(line.render());
        }

        lines.push(paint(border, &format!("╭{rule}╮")));
        lines.push(format!("{side}{}{side}", self.field_line(inner)));

        if self.state.is_open() {
            lines.push(paint(border, &format!("├{rule}┤")));
            for row in self.panel_lines(inner) {
                lines.push(format!("{side}{row}{side}"));
            }
            if let Some(footer) = render_footer(self.state.input_text(), self.state.mode()) {
                let mut line = Spans::new();
                line.push(format!(" ⌕ {footer}"), theme.footer);
                line.pad(inner);
                lines.push(paint(border, &format!("├{rule}┤")));
                lines.push(format!("{side}{}{side}", line.render()));
            }
        }
        lines.push(paint(border, &format!("╰{rule}╯")));

        if let Some(error) = &self.error {
            lines.push(paint(theme.error, error));
        }
        lines.join("\n")
    }
}

/// Lowercases char by char, so prefix lengths line up with [`completion_rest`].
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// The part of `label` after the prefix whose case fold equals `folded`.
fn completion_rest<'a>(label: &'a str, folded: &str) -> Option<&'a str> {
    let mut seen = String::new();
    for (i, c) in label.char_indices() {
        if seen.len() >= folded.len() {
            return (seen == folded).then(|| &label[i..]);
        }
        seen.extend(c.to_lowercase());
    }
    (seen == folded).then_some("")
}
