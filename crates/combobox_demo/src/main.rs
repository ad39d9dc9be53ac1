#![forbid(unsafe_code)]

//! # combobox_demo
//!
//! A job-application form showing every combobox mode:
//!
//! - **Product**: search with debounced remote suggestions and ghost text
//! - **Department**: required select
//! - **Office**: clearable select
//! - **Skills**: multi-select capped at three chips
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p combobox_demo -- --offline
//! ```

mod app;
mod catalogue;
mod cli;
mod config;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tea_core::{Model, Program};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use config::DemoConfig;

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::resolve(&cli)?;
    let app = App::new(&config).context("building the form")?;

    if cli.self_check {
        println!("{}", app.view());
        return Ok(());
    }

    init_logging(&cli.log_file)?;
    info!(
        offline = config.offline,
        url = %config.api.url,
        theme = ?config.theme,
        "starting combobox demo"
    );

    let app = Program::new(app)
        .with_alt_screen()
        .run()
        .await
        .context("running the form")?;

    match app.summary() {
        Some(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        None => println!("Form not submitted."),
    }
    Ok(())
}
