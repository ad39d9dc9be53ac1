//! Dropdown state controller.
//!
//! [`DropdownState`] owns everything about an open or closed dropdown: the
//! input text, the candidate items, the highlighted row, loading and error
//! state, and the selection. It is mutated only through its operations; the
//! view reads it and forwards events.
//!
//! Items come from an [`ItemSource`]. A static list is filtered in place on
//! every keystroke. A remote source is searched through a debounced
//! [`SearchClient`]; the operations that may start a search return a
//! [`Cmd`] for the host to run, and the resulting messages come back through
//! [`DropdownState::handle`].
//!
//! Invariants:
//!
//! - `highlighted` is `None` or a valid index into `items`, and is reset
//!   whenever `items` is replaced.
//! - `is_loading` is true only while the request for the current query is
//!   outstanding. Superseded requests are aborted and their results, should
//!   one slip through, are rejected by generation.
//!
//! Dropping the state cancels the pending debounce timer and aborts any
//! request in flight.

use tea_core::{Cmd, Message};
use tracing::{debug, trace};

use crate::config::{ComboboxConfig, Mode};
use crate::debounce::{Debounced, Debouncer};
use crate::error::SearchError;
use crate::option::DropdownOption;
use crate::search::{SearchClient, SearchResultMsg};
use crate::selection::{SelectOutcome, Selection};

/// Where the candidate items come from.
#[derive(Debug)]
pub enum ItemSource {
    /// A fixed list filtered locally.
    Static(Vec<DropdownOption>),
    /// A remote search.
    Remote(SearchClient),
}

/// Highlight movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Filters a static list the way the dropdown does.
///
/// An empty query lists everything in select and multi-select modes and
/// nothing in search mode. Otherwise labels are matched case-insensitively by
/// substring, and search mode keeps at most `max_suggestions` matches.
///
/// # Example
///
/// ```rust
/// use combobox::{DropdownOption, Mode, filter_options};
///
/// let all = vec![
///     DropdownOption::new("1", "Apple"),
///     DropdownOption::new("2", "Banana"),
/// ];
/// assert_eq!(filter_options(&all, "an", Mode::Select, 15).len(), 1);
/// assert_eq!(filter_options(&all, "", Mode::Select, 15).len(), 2);
/// assert!(filter_options(&all, "", Mode::Search, 15).is_empty());
/// ```
pub fn filter_options(
    options: &[DropdownOption],
    query: &str,
    mode: Mode,
    max_suggestions: usize,
) -> Vec<DropdownOption> {
    if query.trim().is_empty() {
        return if mode.is_choice() {
            options.to_vec()
        } else {
            Vec::new()
        };
    }
    let needle = query.to_lowercase();
    let limit = if mode == Mode::Search {
        max_suggestions
    } else {
        usize::MAX
    };
    options
        .iter()
        .filter(|opt| opt.label().to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}

/// State and operations of one dropdown.
#[derive(Debug)]
pub struct DropdownState {
    mode: Mode,
    is_open: bool,
    input_text: String,
    highlighted: Option<usize>,
    items: Vec<DropdownOption>,
    is_loading: bool,
    error: Option<SearchError>,
    last_query: String,
    selection: Selection,
    source: ItemSource,
    debouncer: Debouncer<String>,
    min_chars: usize,
    max_suggestions: usize,
    disabled: bool,
}

impl DropdownState {
    /// Creates a closed dropdown with default timing and limits.
    pub fn new(mode: Mode, source: ItemSource) -> Self {
        let config = ComboboxConfig::new(mode);
        let min_chars = match source {
            ItemSource::Static(_) => 2,
            ItemSource::Remote(_) => 1,
        };
        Self::from_config(&config, source).with_min_chars(min_chars)
    }

    /// Creates a closed dropdown using the timing and limits of `config`.
    ///
    /// The item source is passed separately; `config.options` and
    /// `config.api` are not consulted.
    pub fn from_config(config: &ComboboxConfig, source: ItemSource) -> Self {
        let selection = match config.mode {
            Mode::MultiSelect => Selection::multi(config.max_selections),
            Mode::Select | Mode::Search => Selection::default(),
        };
        let mut state = Self {
            mode: config.mode,
            is_open: false,
            input_text: String::new(),
            highlighted: None,
            items: Vec::new(),
            is_loading: false,
            error: None,
            last_query: String::new(),
            selection,
            source,
            debouncer: Debouncer::new(config.debounce()),
            min_chars: config.min_chars(),
            max_suggestions: config.max_suggestions,
            disabled: config.disabled,
        };
        state.refilter();
        state
    }

    /// Sets how many trimmed characters a search-mode query needs before
    /// suggestions appear.
    #[must_use]
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self.refilter();
        self
    }

    /// Sets the quiet period before a remote search fires.
    #[must_use]
    pub fn with_debounce(mut self, delay: std::time::Duration) -> Self {
        self.debouncer.set_delay(delay);
        self
    }

    /// Caps the number of suggestions shown in search mode.
    #[must_use]
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self.refilter();
        self
    }

    /// Caps the chips in multi-select mode. Other modes ignore it.
    #[must_use]
    pub fn with_max_selections(mut self, max: usize) -> Self {
        if let Selection::Multi { max: cap, .. } = &mut self.selection {
            *cap = Some(max);
        }
        self
    }

    // ---- accessors ----

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The highlighted item, if any.
    pub fn highlighted_item(&self) -> Option<&DropdownOption> {
        self.highlighted.and_then(|i| self.items.get(i))
    }

    /// Current candidates: the filtered static list or the latest results.
    pub fn items(&self) -> &[DropdownOption] {
        &self.items
    }

    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub const fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    /// The last query whose results are shown, empty if none.
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub const fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub const fn is_remote(&self) -> bool {
        matches!(self.source, ItemSource::Remote(_))
    }

    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns true while a debounced search is waiting to start.
    pub const fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Looks up an option by value among the static list, the current items
    /// and the selection.
    pub fn find_option(&self, value: &str) -> Option<&DropdownOption> {
        let statics = match &self.source {
            ItemSource::Static(all) => all.as_slice(),
            ItemSource::Remote(_) => &[],
        };
        statics
            .iter()
            .chain(self.items.iter())
            .chain(self.selection.options().iter())
            .find(|opt| opt.value() == value)
    }

    // ---- text ----

    /// Updates the input text as typed by the user.
    ///
    /// Clears the error and the highlight, opens the panel when there is
    /// something to show, then re-filters a static list or schedules a
    /// debounced remote search. A query shorter than the minimum clears the
    /// items and cancels any pending search.
    pub fn set_input_value(&mut self, text: impl Into<String>) -> Option<Cmd> {
        self.input_text = text.into();
        self.error = None;
        self.highlighted = None;
        let is_static = matches!(self.source, ItemSource::Static(_));
        if !self.disabled && (is_static || !self.input_text.trim().is_empty()) {
            self.is_open = true;
        }
        self.refresh()
    }

    /// Sets the text without filtering or searching.
    ///
    /// Used to reflect a chosen value into the field. Cancels a pending
    /// debounced search and forgets the last fetched query.
    pub fn set_input_value_silent(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
        self.highlighted = None;
        self.debouncer.cancel();
        self.last_query.clear();
        trace!(text = %self.input_text, "input set silently");
    }

    // ---- open / close / highlight ----

    /// Opens the panel. No-op when disabled.
    pub fn open(&mut self) {
        if self.disabled {
            return;
        }
        if self.mode.is_choice() && (self.input_text.is_empty() || self.shows_selected_label()) {
            // The text is not a query: list everything.
            self.show_all();
        }
        self.is_open = true;
    }

    /// Closes the panel and drops the highlight. The text is kept.
    pub fn close(&mut self) {
        self.is_open = false;
        self.highlighted = None;
    }

    /// Moves the highlight.
    ///
    /// Down on a closed panel only opens it. Movement clamps at both ends;
    /// Up with nothing highlighted does nothing.
    pub fn move_highlight(&mut self, direction: Direction) {
        match direction {
            Direction::Down => {
                if !self.is_open {
                    self.open();
                    return;
                }
                if self.items.is_empty() {
                    return;
                }
                let last = self.items.len() - 1;
                self.highlighted = Some(self.highlighted.map_or(0, |i| (i + 1).min(last)));
            }
            Direction::Up => {
                if !self.is_open {
                    return;
                }
                if let Some(i) = self.highlighted {
                    self.highlighted = Some(i.saturating_sub(1));
                }
            }
        }
    }

    /// Highlights `index` (pointer hover). Out-of-range indices, and any
    /// index while the panel is closed, are ignored.
    pub fn set_highlighted(&mut self, index: Option<usize>) {
        match index {
            Some(i) if !self.is_open || i >= self.items.len() => {}
            other => self.highlighted = other,
        }
    }

    // ---- selection ----

    /// Selects the highlighted item. No-op without a highlight.
    pub fn select_highlighted(&mut self) -> SelectOutcome {
        if !self.is_open {
            return SelectOutcome::Unchanged;
        }
        match self.highlighted_item().cloned() {
            Some(item) => self.select_item(item),
            None => SelectOutcome::Unchanged,
        }
    }

    /// Applies `option` according to the mode.
    ///
    /// Select and search modes replace the selection, put the label in the
    /// field and close. Multi-select toggles the option, clears the text and
    /// stays open; a full selection rejects the option and nothing changes.
    pub fn select_item(&mut self, option: DropdownOption) -> SelectOutcome {
        if self.disabled {
            return SelectOutcome::Unchanged;
        }
        match self.mode {
            Mode::MultiSelect => {
                let outcome = self.selection.apply(option);
                if outcome == SelectOutcome::Rejected {
                    return outcome;
                }
                self.set_input_value_silent("");
                if !self.is_remote() {
                    self.show_all();
                }
                outcome
            }
            Mode::Select | Mode::Search => {
                let label = option.label().to_string();
                let outcome = self.selection.apply(option);
                self.set_input_value_silent(label);
                self.close();
                outcome
            }
        }
    }

    /// Removes a selected option by value. Returns true when it was selected.
    pub fn remove_selection(&mut self, value: &str) -> bool {
        let removed = self.selection.remove(value).is_some();
        if removed {
            debug!(value, "selection removed");
            if self.mode == Mode::Select {
                self.set_input_value_silent("");
            }
        }
        removed
    }

    /// Removes the most recently selected option.
    pub fn pop_selection(&mut self) -> Option<DropdownOption> {
        let popped = self.selection.pop();
        if let Some(opt) = &popped {
            debug!(value = opt.value(), "selection popped");
        }
        popped
    }

    /// Replaces the selection, as when the host sets a new value.
    pub fn set_selection(&mut self, options: Vec<DropdownOption>) {
        self.selection.replace(options);
    }

    /// Clears the selection and the text and closes the panel.
    ///
    /// Returns true when anything was cleared.
    pub fn clear(&mut self) -> bool {
        let had_text = !self.input_text.is_empty();
        let had_selection = self.selection.clear();
        self.set_input_value_silent("");
        self.close();
        self.cancel_search();
        if self.is_remote() {
            self.set_items(Vec::new());
        } else {
            self.refilter();
        }
        had_text || had_selection
    }

    // ---- remote ----

    /// Re-issues the search for the current text after a failure.
    ///
    /// Only remote sources with an error and a non-blank query retry.
    pub fn retry(&mut self) -> Option<Cmd> {
        if !self.is_remote() || self.error.is_none() {
            return None;
        }
        let query = self.input_text.trim().to_string();
        if query.is_empty() {
            return None;
        }
        debug!(query = %query, "retrying search");
        self.last_query.clear();
        self.debouncer.cancel();
        self.start_search(query)
    }

    /// Consumes debounce and search result messages addressed to this
    /// dropdown. Other messages are ignored.
    pub fn handle(&mut self, msg: &Message) -> Option<Cmd> {
        if let Some(fired) = msg.downcast_ref::<Debounced<String>>() {
            if !self.debouncer.accept(fired) {
                trace!(query = %fired.value, "ignoring stale debounce");
                return None;
            }
            return self.start_search(fired.value.clone());
        }
        if let Some(result) = msg.downcast_ref::<SearchResultMsg>() {
            self.apply_result(result);
        }
        None
    }

    /// Returns true when `msg` is a debounce or search message issued by
    /// this dropdown. Hosts with several dropdowns route messages with it.
    pub fn owns_message(&self, msg: &Message) -> bool {
        if let Some(fired) = msg.downcast_ref::<Debounced<String>>() {
            return fired.id() == self.debouncer.id();
        }
        if let Some(result) = msg.downcast_ref::<SearchResultMsg>() {
            return matches!(&self.source, ItemSource::Remote(client) if client.id() == result.client_id());
        }
        false
    }

    /// Replaces the static option list.
    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        if let ItemSource::Static(all) = &mut self.source {
            *all = options;
            self.refresh();
        }
    }

    /// Enables or disables the dropdown. Disabling closes it.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close();
        }
    }

    /// Cancels the pending debounce and aborts the request in flight.
    pub fn cancel_search(&mut self) {
        self.debouncer.cancel();
        if let ItemSource::Remote(client) = &mut self.source {
            client.abort();
        }
        self.is_loading = false;
    }

    // ---- internals ----

    fn set_items(&mut self, items: Vec<DropdownOption>) {
        self.items = items;
        self.highlighted = None;
    }

    fn show_all(&mut self) {
        if let ItemSource::Static(all) = &self.source {
            let items = filter_options(all, "", self.mode, self.max_suggestions);
            self.set_items(items);
        }
    }

    fn shows_selected_label(&self) -> bool {
        self.selection
            .options()
            .first()
            .is_some_and(|opt| opt.label() == self.input_text)
    }

    fn query_too_short(&self, query: &str) -> bool {
        let len = query.chars().count();
        len == 0 || len < self.min_chars
    }

    /// Re-filters a static list for the current text.
    fn refilter(&mut self) {
        let ItemSource::Static(all) = &self.source else {
            return;
        };
        let trimmed = self.input_text.trim();
        let items = if self.mode == Mode::Search && self.query_too_short(trimmed) {
            Vec::new()
        } else {
            filter_options(all, &self.input_text, self.mode, self.max_suggestions)
        };
        self.set_items(items);
    }

    fn refresh(&mut self) -> Option<Cmd> {
        if !self.is_remote() {
            self.refilter();
            return None;
        }

        let query = self.input_text.trim().to_string();
        self.cancel_search();

        if self.query_too_short(&query) {
            trace!(query = %query, min_chars = self.min_chars, "query below minimum, clearing");
            self.last_query.clear();
            self.set_items(Vec::new());
            return None;
        }
        if query == self.last_query {
            trace!(query = %query, "results already shown for query");
            return None;
        }
        Some(self.debouncer.call(query))
    }

    fn start_search(&mut self, query: String) -> Option<Cmd> {
        let ItemSource::Remote(client) = &mut self.source else {
            return None;
        };
        self.is_loading = true;
        self.error = None;
        Some(client.start(query))
    }

    fn apply_result(&mut self, msg: &SearchResultMsg) {
        let ItemSource::Remote(client) = &mut self.source else {
            return;
        };
        if !client.accept(msg) {
            debug!(query = %msg.query, "discarding stale search result");
            return;
        }
        self.is_loading = false;

        match &msg.result {
            Ok(items) => {
                if self.input_text.trim() != msg.query {
                    debug!(query = %msg.query, "discarding result for outdated query");
                    return;
                }
                debug!(query = %msg.query, count = items.len(), "search results applied");
                self.last_query.clone_from(&msg.query);
                self.set_items(items.clone());
            }
            Err(err) => {
                debug!(query = %msg.query, error = %err, "search failed");
                self.error = Some(err.clone());
                self.last_query.clear();
                self.set_items(Vec::new());
            }
        }
    }
}
