//! Image upload CLI command.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use picflow_core::error::AppError;
use picflow_core::types::Input;
use picflow_plugin::api::context::UploadOutcome;

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Images to upload; the clipboard image is used when none are given
    pub files: Vec<PathBuf>,
}

/// Uploaded image row for table output
#[derive(Debug, Serialize, Tabled)]
struct UploadRow {
    /// File name at the destination
    file_name: String,
    /// Destination URL
    url: String,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    session: &mut Session,
    format: OutputFormat,
) -> Result<(), AppError> {
    let inputs: Vec<Input> = args.files.iter().cloned().map(Input::from).collect();

    let subscription = session.ctx.events_mut().subscribe(output::print_event);
    let result = session.ctx.upload(inputs).await;
    session.ctx.events_mut().unsubscribe(subscription);

    match result? {
        UploadOutcome::NothingToUpload => {
            output::print_warning("Nothing was uploaded");
        }
        UploadOutcome::Uploaded(records) => {
            let rows: Vec<UploadRow> = records
                .iter()
                .map(|r| UploadRow {
                    file_name: r.file_name.clone(),
                    url: r.url.clone().unwrap_or_default(),
                })
                .collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                output::print_success(&format!("Uploaded {} image(s)", rows.len()));
            }
        }
    }

    Ok(())
}
