#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # combobox
//!
//! A searchable dropdown for terminal forms, in three modes:
//!
//! - **search**: free text with suggestions from a static list or an HTTP
//!   endpoint, debounced, with ghost-text completion
//! - **select**: pick one option from a filterable list
//! - **multiselect**: pick several options, shown as removable chips
//!
//! The pieces are layered:
//!
//! - [`DropdownState`] holds the state machine (text, items, highlight,
//!   loading, error, selection) and knows nothing about terminals
//! - [`SearchClient`] and [`Debouncer`] turn keystrokes into at most one
//!   request per pause, and reject results that arrive late
//! - [`Combobox`] is a [`tea_core::Model`] that maps keys onto the state and
//!   renders it
//!
//! ## Example
//!
//! ```rust,ignore
//! use combobox::{ApiConfig, Combobox, ComboboxConfig, Mode};
//!
//! let config = ComboboxConfig::new(Mode::Search)
//!     .with_label("Product")
//!     .with_api(ApiConfig::new("https://dummyjson.com/products/search"));
//! let field = Combobox::new(config)?;
//! let field = tea_core::Program::new(field).run().await?;
//! println!("{:?}", field.value());
//! ```

pub mod combobox;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod key;
pub mod option;
pub mod render;
pub mod search;
pub mod selection;
pub mod theme;

pub use combobox::{ChangeMsg, Combobox, SearchSubmitMsg};
pub use config::{ApiConfig, ComboboxConfig, Mode};
pub use controller::{Direction, DropdownState, ItemSource, filter_options};
pub use debounce::{Debounced, Debouncer};
pub use error::{ConfigError, ErrorKind, SearchError, ValidationError};
pub use key::KeyMap;
pub use option::{DropdownOption, OptionId, OptionKind, dedup_by_value};
pub use search::{
    HttpMethod, HttpSearchSource, ResponseMapping, SearchClient, SearchResultMsg, SearchSource,
    StaticSearchSource, from_fn,
};
pub use selection::{SelectOutcome, Selection, SelectionValue};
pub use theme::{Theme, ThemeVariant};
