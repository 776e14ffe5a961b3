//! CLI command definitions and dispatch.

pub mod config;
pub mod plugin;
pub mod set;
pub mod upload;
pub mod use_cmd;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use picflow_builtin::{ArboardClipboard, BuiltinPlugin};
use picflow_core::config::{JsonFileStore, Settings};
use picflow_core::error::AppError;
use picflow_plugin::api::context::Context;
use picflow_plugin::loader::{LoadReport, PluginLoader};

use crate::output::{self, OutputFormat};

/// PicFlow: upload images through a pluggable pipeline
#[derive(Debug, Parser)]
#[command(name = "picflow", version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON config file (default: ~/.picflow/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload files, or the clipboard image when no file is given
    Upload(upload::UploadArgs),
    /// Choose the active uploader or transformer
    Use(use_cmd::UseArgs),
    /// Configure an uploader interactively
    Set(set::SetArgs),
    /// Read or write config values
    Config(config::ConfigArgs),
    /// Manage third-party plugins
    Plugin(plugin::PluginArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, settings: &Settings) -> Result<(), AppError> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| settings.resolve_config_path());
        let mut session = open_session(&config_path).await?;

        match &self.command {
            Commands::Upload(args) => upload::execute(args, &mut session, self.format).await,
            Commands::Use(args) => use_cmd::execute(args, &mut session).await,
            Commands::Set(args) => set::execute(args, &mut session).await,
            Commands::Config(args) => config::execute(args, &mut session, self.format).await,
            Commands::Plugin(args) => plugin::execute(args, &mut session, self.format).await,
        }
    }
}

/// A ready-to-use context and the outcome of loading its plugins.
#[derive(Debug)]
pub struct Session {
    /// Context with config read and plugins registered.
    pub ctx: Context,
    /// Plugin loading outcome.
    pub report: LoadReport,
}

/// Helper: build a context on the config file and load every plugin
pub async fn open_session(config_path: &Path) -> Result<Session, AppError> {
    let clipboard = Arc::new(ArboardClipboard::new());
    let store = Arc::new(JsonFileStore::new(config_path));
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut ctx = Context::new(store)
        .with_clipboard(clipboard.clone())
        .with_base_dir(base_dir);
    ctx.init().await?;

    let mut loader =
        PluginLoader::new().with_builtin(Arc::new(BuiltinPlugin::new().with_clipboard(clipboard)));
    let report = loader.load(&mut ctx);

    for (name, err) in &report.failed {
        warn!(plugin = %name, error = %err, "Plugin not loaded");
        output::print_warning(&format!("Plugin '{}' not loaded: {}", name, err.message));
    }
    info!(config = %config_path.display(), plugins = report.loaded.len(), "Session ready");

    Ok(Session { ctx, report })
}
