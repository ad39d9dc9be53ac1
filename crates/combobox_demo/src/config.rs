//! Demo settings: a TOML file overridden by command-line flags.
//!
//! ```toml
//! theme = "dark"
//! offline = false
//! debounce_ms = 250
//!
//! [api]
//! url = "https://dummyjson.com/products/search"
//! label_key = "title"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use combobox::{ApiConfig, ThemeVariant};
use serde::Deserialize;

use crate::cli::Cli;

/// Default product search endpoint.
pub const DEFAULT_API_URL: &str = "https://dummyjson.com/products/search";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub theme: ThemeVariant,
    pub offline: bool,
    pub debounce_ms: u64,
    pub width: u16,
    pub api: ApiConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default(),
            offline: false,
            debounce_ms: 300,
            width: 48,
            api: ApiConfig::new(DEFAULT_API_URL),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid demo config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Loads the file named by `--config`, if any, then applies the flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(theme) = cli.theme {
            self.theme = theme;
        }
        if let Some(url) = &cli.api_url {
            self.api.url.clone_from(url);
        }
        if cli.offline {
            self.offline = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert!(!config.offline);
    }

    #[test]
    fn test_file_then_flags() {
        let mut config = DemoConfig::from_toml_str(
            r#"
            theme = "dark"
            debounce_ms = 100

            [api]
            url = "http://localhost:8080/search"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, ThemeVariant::Dark);
        assert_eq!(config.debounce_ms, 100);

        let cli = Cli::parse_from(["combobox_demo", "--theme", "plain", "--offline"]);
        config.apply_cli(&cli);
        assert_eq!(config.theme, ThemeVariant::Plain);
        assert!(config.offline);
        assert_eq!(config.api.url, "http://localhost:8080/search");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(DemoConfig::from_toml_str("colour = \"red\"").is_err());
    }
}
