//! Builtin `local` uploader: copies images into a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use picflow_core::error::{AppError, ErrorKind};
use picflow_core::result::AppResult;
use picflow_core::types::ImageRecord;
use picflow_plugin::api::context::Context;
use picflow_plugin::hooks::definitions::Uploader;
use picflow_plugin::plugin::ConfigField;

/// Name of the local uploader.
pub const LOCAL_UPLOADER: &str = "local";

const KEY_PATH: &str = "picBed.local.path";
const KEY_BASE_URL: &str = "picBed.local.baseUrl";

/// Writes each record into `picBed.local.path`.
///
/// The URL is `picBed.local.baseUrl/<fileName>` when a base URL is set and a
/// `file://` URL of the written file otherwise.
#[derive(Debug, Default)]
pub struct LocalUploader;

impl LocalUploader {
    fn target_dir(ctx: &Context) -> AppResult<PathBuf> {
        let dir = ctx
            .get_config_str(KEY_PATH)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::configuration(format!("'{KEY_PATH}' must be set to use the local uploader"))
            })?;
        let dir = PathBuf::from(dir);
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(ctx.base_dir().join(dir))
        }
    }
}

#[async_trait]
impl Uploader for LocalUploader {
    async fn upload(&self, ctx: &mut Context, mut record: ImageRecord) -> AppResult<ImageRecord> {
        let dir = Self::target_dir(ctx)?;
        let data = record.buffer.clone().ok_or_else(|| {
            AppError::validation(format!("Record '{}' has no data to upload", record.file_name))
        })?;

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory {}", dir.display()),
                e,
            )
        })?;

        let file_name = safe_file_name(&record.file_name);
        let target = dir.join(&file_name);
        tokio::fs::write(&target, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write {}", target.display()),
                e,
            )
        })?;
        debug!(path = %target.display(), size = data.len(), "Image written");

        let url = match ctx.get_config_str(KEY_BASE_URL).filter(|s| !s.is_empty()) {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), file_name),
            None => file_url(&target),
        };
        info!(file_name = %file_name, url = %url, "Image stored locally");

        record.rename(file_name);
        record.url = Some(url);
        Ok(record)
    }

    fn config_schema(&self, ctx: &Context) -> Vec<ConfigField> {
        let mut path = ConfigField::input("path")
            .required()
            .with_message("Directory to store images in");
        if let Some(current) = ctx.get_config_str(KEY_PATH) {
            path = path.with_default(current);
        }

        let mut base_url =
            ConfigField::input("baseUrl").with_message("URL prefix for stored images (optional)");
        if let Some(current) = ctx.get_config_str(KEY_BASE_URL) {
            base_url = base_url.with_default(current);
        }

        vec![path, base_url]
    }
}

/// Strips path separators so a record cannot escape the target directory.
fn safe_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .replace(['/', '\\'], "_");
    if name.is_empty() { "image".to_string() } else { name }
}

fn file_url(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let display = absolute.to_string_lossy().replace('\\', "/");
    if display.starts_with('/') {
        format!("file://{display}")
    } else {
        format!("file:///{display}")
    }
}
