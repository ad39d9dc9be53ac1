//! Command-line interface for `combobox_demo`.
//!
//! # Examples
//!
//! ```bash
//! # Search products on dummyjson.com
//! combobox_demo
//!
//! # Use the built-in catalogue instead of the network
//! combobox_demo --offline --theme dark
//!
//! # Render the form once without a terminal (for CI)
//! combobox_demo --offline --self-check
//! ```

use std::path::PathBuf;

use clap::Parser;
use combobox::ThemeVariant;

/// Job-application form built from combobox fields.
///
/// A product search (remote or offline), a required department select, a
/// clearable office select and a skills multi-select.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "combobox_demo",
    author,
    version,
    about = "Terminal form demonstrating combobox search, select and multi-select"
)]
pub struct Cli {
    /// TOML file with demo settings
    #[arg(long, short = 'c', env = "COMBOBOX_DEMO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color theme: light, dark or plain
    #[arg(long, short = 't', env = "COMBOBOX_DEMO_THEME")]
    pub theme: Option<ThemeVariant>,

    /// Product search endpoint (GET, `q` parameter, `products` array)
    #[arg(long, env = "COMBOBOX_DEMO_API_URL")]
    pub api_url: Option<String>,

    /// Search the built-in catalogue with simulated latency
    #[arg(long)]
    pub offline: bool,

    /// Where log output goes; the terminal belongs to the form
    #[arg(long, default_value = "combobox_demo.log")]
    pub log_file: PathBuf,

    /// Render the form once to stdout and exit
    #[arg(long)]
    pub self_check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["combobox_demo", "--offline", "--theme", "dark"]);
        assert!(cli.offline);
        assert_eq!(cli.theme, Some(ThemeVariant::Dark));
        assert_eq!(cli.log_file, PathBuf::from("combobox_demo.log"));
        assert!(Cli::try_parse_from(["combobox_demo", "--theme", "neon"]).is_err());
    }
}
