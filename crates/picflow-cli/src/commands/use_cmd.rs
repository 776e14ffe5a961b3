//! Selecting the active uploader or transformer.

use clap::{Args, ValueEnum};
use serde_json::json;

use picflow_core::config::{KEY_TRANSFORMER, KEY_UPLOADER};
use picflow_core::error::AppError;
use picflow_plugin::hooks::definitions::Category;

use super::Session;
use crate::output;

/// Arguments for the use command
#[derive(Debug, Args)]
pub struct UseArgs {
    /// What to select
    #[arg(value_enum)]
    pub kind: UseKind,
    /// Registered name to select
    pub name: String,
}

/// Selectable plugin categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UseKind {
    /// The uploader (`picBed.uploader`)
    Uploader,
    /// The transformer (`picBed.transformer`)
    Transformer,
}

impl UseKind {
    fn category(self) -> Category {
        match self {
            Self::Uploader => Category::Uploader,
            Self::Transformer => Category::Transformer,
        }
    }

    fn config_key(self) -> &'static str {
        match self {
            Self::Uploader => KEY_UPLOADER,
            Self::Transformer => KEY_TRANSFORMER,
        }
    }
}

/// Execute the use command
pub async fn execute(args: &UseArgs, session: &mut Session) -> Result<(), AppError> {
    let category = args.kind.category();
    let helper = &session.ctx.helper;
    if !helper.contains(category, &args.name) {
        return Err(AppError::resolution(format!(
            "No {} named '{}' is registered (available: {})",
            category,
            args.name,
            helper.names(category).join(", ")
        )));
    }

    session
        .ctx
        .save_config(json!({ args.kind.config_key(): args.name }))
        .await?;

    output::print_success(&format!("Now using {} '{}'", category, args.name));
    Ok(())
}
