//! PicFlow: image upload pipeline with pluggable transformers, uploaders,
//! and hooks.
//!
//! Main entry point: loads bootstrap settings, installs logging, and runs
//! the requested CLI command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use picflow_cli::Cli;
use picflow_core::config::Settings;
use picflow_core::error::AppError;

#[tokio::main]
async fn main() {
    let settings = match load_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings);

    let cli = Cli::parse();

    if let Err(e) = run(&cli, &settings).await {
        tracing::error!(error = %e, "Command failed");
        picflow_cli::output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load bootstrap settings from `PICFLOW_SETTINGS` (default `picflow.toml`)
/// and `PICFLOW__*` environment variables
fn load_settings() -> Result<Settings, AppError> {
    let settings_path =
        std::env::var("PICFLOW_SETTINGS").unwrap_or_else(|_| "picflow".to_string());
    Settings::load(&settings_path)
}

/// Initialize tracing/logging
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Run one command
async fn run(cli: &Cli, settings: &Settings) -> Result<(), AppError> {
    tracing::debug!("Starting PicFlow v{}", env!("CARGO_PKG_VERSION"));
    cli.execute(settings).await
}
