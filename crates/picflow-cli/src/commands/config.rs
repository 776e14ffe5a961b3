//! Configuration management CLI commands.

use clap::{Args, Subcommand};
use serde_json::{Map, Value};

use picflow_core::error::AppError;

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the value at a dotted path (the whole config when omitted)
    Get {
        /// Dotted path, e.g. `picBed.uploader`
        #[arg(default_value = "")]
        path: String,
    },
    /// Save a value at a dotted path
    Set {
        /// Dotted path, e.g. `settings.autoCopy`
        path: String,
        /// JSON literal; anything that does not parse is stored as a string
        value: String,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    session: &mut Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Get { path } => match session.ctx.get_config(path) {
            Some(value) => output::print_value(value, format),
            None => {
                return Err(AppError::not_found(format!("No config value at '{}'", path)));
            }
        },
        ConfigCommand::Set { path, value } => {
            if path.trim().is_empty() {
                return Err(AppError::validation("Config path must not be empty"));
            }
            let value = parse_value(value);
            let mut partial = Map::new();
            partial.insert(path.clone(), value.clone());
            session.ctx.save_config(Value::Object(partial)).await?;

            output::print_success(&format!("Saved '{}'", path));
            output::print_kv(path, &value.to_string());
        }
    }

    Ok(())
}

/// Parses a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
