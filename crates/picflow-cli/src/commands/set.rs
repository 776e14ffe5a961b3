//! Interactive uploader configuration.

use clap::{Args, Subcommand};
use serde_json::{Map, Value, json};

use picflow_core::error::AppError;
use picflow_plugin::plugin::{ConfigField, FieldKind};

use super::Session;
use crate::output;

const KEY_PIC_BED: &str = "picBed";

/// Arguments for the set command
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Set subcommand
    #[command(subcommand)]
    pub command: SetCommand,
}

/// Set subcommands
#[derive(Debug, Subcommand)]
pub enum SetCommand {
    /// Prompt for an uploader's settings and save them under `picBed.<name>`
    Uploader {
        /// Registered uploader name
        name: String,
    },
}

/// Execute the set command
pub async fn execute(args: &SetArgs, session: &mut Session) -> Result<(), AppError> {
    match &args.command {
        SetCommand::Uploader { name } => {
            let uploader = session.ctx.helper.uploader.get(name).ok_or_else(|| {
                AppError::resolution(format!(
                    "No uploader named '{}' is registered (available: {})",
                    name,
                    session.ctx.helper.uploader.names().join(", ")
                ))
            })?;

            let schema = uploader.config_schema(&session.ctx);
            if schema.is_empty() {
                output::print_warning(&format!("Uploader '{}' has no settings", name));
                return Ok(());
            }

            let mut values = Map::new();
            for field in &schema {
                if let Some(value) = prompt(field)? {
                    values.insert(field.name.clone(), value);
                }
            }

            let pic_bed =
                with_uploader_settings(session.ctx.get_config(KEY_PIC_BED), name, values);
            session
                .ctx
                .save_config(json!({ KEY_PIC_BED: pic_bed }))
                .await?;
            output::print_success(&format!("Settings for '{}' saved", name));
        }
    }

    Ok(())
}

/// Rewrites the whole `picBed` map so names containing dots stay one key.
fn with_uploader_settings(
    current: Option<&Value>,
    name: &str,
    values: Map<String, Value>,
) -> Value {
    let mut pic_bed = match current {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    pic_bed.insert(name.to_string(), Value::Object(values));
    Value::Object(pic_bed)
}

/// Ask for one field; an empty optional answer yields `None`.
fn prompt(field: &ConfigField) -> Result<Option<Value>, AppError> {
    let input_err = |e: dialoguer::Error| AppError::internal(format!("Input error: {}", e));

    match field.kind {
        FieldKind::Input => {
            let mut input = dialoguer::Input::<String>::new()
                .with_prompt(field.prompt())
                .allow_empty(!field.required);
            if let Some(default) = field.default.as_ref().and_then(Value::as_str) {
                input = input.default(default.to_string());
            }
            let answer = input.interact_text().map_err(input_err)?;
            Ok((!answer.is_empty()).then(|| Value::String(answer)))
        }
        FieldKind::Password => {
            let answer = dialoguer::Password::new()
                .with_prompt(field.prompt())
                .allow_empty_password(!field.required)
                .interact()
                .map_err(input_err)?;
            Ok((!answer.is_empty()).then(|| Value::String(answer)))
        }
        FieldKind::List => {
            let default = field
                .default
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|d| field.choices.iter().position(|c| c == d))
                .unwrap_or(0);
            let index = dialoguer::Select::new()
                .with_prompt(field.prompt())
                .items(field.choices.as_slice())
                .default(default)
                .interact()
                .map_err(input_err)?;
            Ok(field.choices.get(index).cloned().map(Value::String))
        }
        FieldKind::Confirm => {
            let default = field
                .default
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let answer = dialoguer::Confirm::new()
                .with_prompt(field.prompt())
                .default(default)
                .interact()
                .map_err(input_err)?;
            Ok(Some(Value::Bool(answer)))
        }
    }
}
