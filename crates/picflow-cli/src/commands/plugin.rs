//! Third-party plugin management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tabled::Tabled;

use picflow_core::config::KEY_PLUGINS;
use picflow_core::error::AppError;
use picflow_plugin::loader::{LoadReport, declared_plugins};

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for plugin commands
#[derive(Debug, Args)]
pub struct PluginArgs {
    /// Plugin subcommand
    #[command(subcommand)]
    pub command: PluginCommand,
}

/// Plugin subcommands
#[derive(Debug, Subcommand)]
pub enum PluginCommand {
    /// List declared plugins and their load status
    List,
    /// Enable a plugin (takes effect on the next run)
    Enable {
        /// Plugin name
        name: String,
    },
    /// Disable a plugin (takes effect on the next run)
    Disable {
        /// Plugin name
        name: String,
    },
}

/// Plugin display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct PluginRow {
    /// Plugin name
    pub name: String,
    /// Enabled in config
    pub enabled: bool,
    /// Load status of this run
    pub status: String,
}

/// Execute plugin commands
pub async fn execute(
    args: &PluginArgs,
    session: &mut Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        PluginCommand::List => {
            let declared = declared_plugins(&session.ctx);
            let rows = plugin_rows(&declared, &session.report);
            output::print_list(&rows, format);
        }
        PluginCommand::Enable { name } => {
            toggle(session, name, true).await?;
            output::print_success(&format!("Plugin '{}' enabled", name));
        }
        PluginCommand::Disable { name } => {
            toggle(session, name, false).await?;
            output::print_success(&format!("Plugin '{}' disabled", name));
        }
    }

    Ok(())
}

/// Builds one row per declared plugin, in declared order.
pub fn plugin_rows(declared: &[(String, bool)], report: &LoadReport) -> Vec<PluginRow> {
    declared
        .iter()
        .map(|(name, enabled)| {
            let status = if report.loaded.contains(name) {
                "loaded".to_string()
            } else if let Some((_, err)) = report.failed.iter().find(|(n, _)| n == name) {
                format!("failed: {}", err.message)
            } else {
                "disabled".to_string()
            };
            PluginRow {
                name: name.clone(),
                enabled: *enabled,
                status,
            }
        })
        .collect()
}

/// Rewrites the whole `picflowPlugins` map so declared order is kept and
/// names containing dots are not split into paths.
async fn toggle(session: &mut Session, name: &str, enabled: bool) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Plugin name must not be empty"));
    }

    let mut plugins: Map<String, Value> = match session.ctx.get_config(KEY_PLUGINS) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    plugins.insert(name.to_string(), Value::Bool(enabled));

    session
        .ctx
        .save_config(json!({ KEY_PLUGINS: Value::Object(plugins) }))
        .await
}
