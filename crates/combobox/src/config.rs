//! Combobox configuration.
//!
//! [`ComboboxConfig`] is the host-facing surface: mode, static options or a
//! remote endpoint, timing and limits, and presentation. It deserializes from
//! TOML with every field optional.
//!
//! ```toml
//! mode = "search"
//! label = "Product"
//! debounce_ms = 250
//! min_chars_for_search = 2
//!
//! [api]
//! url = "https://dummyjson.com/products/search"
//! object_key = "products"
//! label_key = "title"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::option::DropdownOption;
use crate::search::{HttpMethod, HttpSearchSource, ResponseMapping};
use crate::theme::ThemeVariant;

/// How the combobox behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Pick exactly one option; the field shows its label.
    Select,
    /// Free text with suggestions; the value is the text.
    #[default]
    Search,
    /// Pick several options, shown as chips.
    #[serde(rename = "multiselect", alias = "multi")]
    MultiSelect,
}

impl Mode {
    /// Select and multi-select show a chevron and list every option when the
    /// query is empty.
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Select => "select",
            Self::Search => "search",
            Self::MultiSelect => "multiselect",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "search" => Ok(Self::Search),
            "multiselect" | "multi" => Ok(Self::MultiSelect),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

/// Remote search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    /// Key of the array in the response object.
    pub object_key: Option<String>,
    /// Key of each element's value.
    pub value_key: Option<String>,
    /// Key of each element's label.
    pub label_key: Option<String>,
}

impl ApiConfig {
    /// Creates a GET endpoint with the default response mapping.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Response mapping with defaults filled in and results capped at `limit`.
    pub fn mapping(&self, limit: usize) -> ResponseMapping {
        let defaults = ResponseMapping::default();
        ResponseMapping {
            object_key: self.object_key.clone().unwrap_or(defaults.object_key),
            value_key: self.value_key.clone().unwrap_or(defaults.value_key),
            label_key: self.label_key.clone().unwrap_or(defaults.label_key),
            limit: Some(limit),
        }
    }

    /// Builds the HTTP source described by this config.
    pub fn build_source(&self, limit: usize) -> Result<HttpSearchSource, ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingApiUrl);
        }
        let mut source = HttpSearchSource::new(&self.url)?
            .method(self.method)
            .response_mapping(self.mapping(limit));
        for (name, value) in &self.headers {
            source = source.header(name, value)?;
        }
        Ok(source)
    }
}

/// Everything a host can configure on a combobox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboboxConfig {
    pub mode: Mode,
    /// Static options. Ignored when `api` is set.
    pub options: Vec<DropdownOption>,
    /// Remote source.
    pub api: Option<ApiConfig>,
    pub debounce_ms: u64,
    /// Minimum trimmed query length before searching. Defaults to 1 for a
    /// remote source and 2 otherwise.
    pub min_chars_for_search: Option<usize>,
    /// Cap on suggestions in search mode and on remote results.
    pub max_suggestions: usize,
    /// Cap on chips in multi-select mode.
    pub max_selections: Option<usize>,
    pub clearable: bool,
    pub disabled: bool,
    pub placeholder: String,
    pub label: Option<String>,
    /// Host-provided error shown under the field.
    pub error: Option<String>,
    pub required: bool,
    pub enable_autocomplete: bool,
    /// Field width in columns, borders included.
    pub width: u16,
    /// Maximum visible rows in the panel.
    pub max_height: usize,
    pub theme: ThemeVariant,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Search,
            options: Vec::new(),
            api: None,
            debounce_ms: 300,
            min_chars_for_search: None,
            max_suggestions: 15,
            max_selections: None,
            clearable: false,
            disabled: false,
            placeholder: "Type to search...".to_string(),
            label: None,
            error: None,
            required: false,
            enable_autocomplete: true,
            width: 40,
            max_height: 8,
            theme: ThemeVariant::Light,
        }
    }
}

impl ComboboxConfig {
    /// A config for `mode` with defaults.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for contradictions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_selections == Some(0) {
            return Err(ConfigError::ZeroMaxSelections);
        }
        if let Some(api) = &self.api {
            api.build_source(self.max_suggestions)?;
        }
        Ok(())
    }

    /// Effective minimum query length.
    pub fn min_chars(&self) -> usize {
        self.min_chars_for_search
            .unwrap_or(if self.api.is_some() { 1 } else { 2 })
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<DropdownOption>) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = Some(api);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub const fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    #[must_use]
    pub const fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars_for_search = Some(min_chars);
        self
    }

    #[must_use]
    pub const fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    #[must_use]
    pub const fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = Some(max);
        self
    }

    #[must_use]
    pub const fn clearable(mut self) -> Self {
        self.clearable = true;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn with_max_height(mut self, rows: usize) -> Self {
        self.max_height = rows;
        self
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: ThemeVariant) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub const fn with_autocomplete(mut self, enabled: bool) -> Self {
        self.enable_autocomplete = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComboboxConfig::default();
        assert_eq!(config.mode, Mode::Search);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.max_suggestions, 15);
        assert_eq!(config.min_chars(), 2);
        assert_eq!(config.placeholder, "Type to search...");
        assert!(config.enable_autocomplete);

        let remote = config.with_api(ApiConfig::new("http://localhost/search"));
        assert_eq!(remote.min_chars(), 1);
    }

    #[test]
    fn test_from_toml() {
        let config = ComboboxConfig::from_toml_str(
            r#"
            mode = "multiselect"
            max_selections = 3
            label = "Skills"
            theme = "dark"

            [[options]]
            value = "rust"
            label = "Rust"

            [[options]]
            value = "go"
            label = "Go"
            type = "option"
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::MultiSelect);
        assert_eq!(config.max_selections, Some(3));
        assert_eq!(config.options.len(), 2);
        assert_eq!(config.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_api_from_toml() {
        let config = ComboboxConfig::from_toml_str(
            r#"
            [api]
            url = "https://example.com/users"
            method = "POST"
            object_key = "users"
            label_key = "name"
            headers = { Authorization = "Bearer t" }
            "#,
        )
        .unwrap();
        let api = config.api.as_ref().unwrap();
        assert_eq!(api.method, HttpMethod::Post);
        let mapping = api.mapping(config.max_suggestions);
        assert_eq!(mapping.object_key, "users");
        assert_eq!(mapping.value_key, "id");
        assert_eq!(mapping.limit, Some(15));
    }

    #[test]
    fn test_validation_errors() {
        let zero = ComboboxConfig::new(Mode::MultiSelect).with_max_selections(0);
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroMaxSelections)));

        let no_url = ComboboxConfig::default().with_api(ApiConfig::default());
        assert!(matches!(no_url.validate(), Err(ConfigError::MissingApiUrl)));

        let bad = ComboboxConfig::from_toml_str("mode = \"carousel\"");
        assert!(matches!(bad, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("MULTI".parse::<Mode>(), Ok(Mode::MultiSelect));
        assert_eq!(Mode::MultiSelect.to_string(), "multiselect");
        assert!(Mode::Select.is_choice());
        assert!(!Mode::Search.is_choice());
    }
}
