//! Builtin hooks: timestamp renaming and copying URLs to the clipboard.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{debug, warn};

use picflow_core::events::Notification;
use picflow_core::result::AppResult;
use picflow_core::traits::ClipboardSink;
use picflow_core::types::ImageRecord;
use picflow_plugin::api::context::Context;
use picflow_plugin::hooks::definitions::{AfterUploadHook, BeforeUploadHook};

/// Name of the rename hook.
pub const RENAME_HOOK: &str = "rename";
/// Name of the copy-url hook.
pub const COPY_URL_HOOK: &str = "copy-url";

/// Enables [`RenameHook`].
pub const KEY_AUTO_RENAME: &str = "settings.autoRename";
/// Enables [`CopyUrlHook`].
pub const KEY_AUTO_COPY: &str = "settings.autoCopy";

/// Renames records to their upload timestamp when `settings.autoRename` is on.
///
/// A batch of more than one record gets an index suffix so names stay unique.
#[derive(Debug, Default)]
pub struct RenameHook;

impl RenameHook {
    fn timestamped(now: DateTime<Local>, index: usize, total: usize, extname: &str) -> String {
        let stamp = now.format("%Y%m%d%H%M%S");
        if total > 1 {
            format!("{stamp}-{index}{extname}")
        } else {
            format!("{stamp}{extname}")
        }
    }
}

#[async_trait]
impl BeforeUploadHook for RenameHook {
    async fn handle(&self, ctx: &mut Context, batch: &mut Vec<ImageRecord>) -> AppResult<()> {
        if !ctx.get_config_as::<bool>(KEY_AUTO_RENAME).unwrap_or(false) {
            return Ok(());
        }

        let now = Local::now();
        let total = batch.len();
        for (index, record) in batch.iter_mut().enumerate() {
            let name = Self::timestamped(now, index, total, &record.extname);
            debug!(from = %record.file_name, to = %name, "Renaming record");
            record.rename(name);
        }
        Ok(())
    }
}

/// Copies the uploaded URLs (newline-joined) when `settings.autoCopy` is on.
///
/// A clipboard failure does not fail the upload; it is logged and reported as
/// a notification.
pub struct CopyUrlHook {
    sink: Option<Arc<dyn ClipboardSink>>,
}

impl CopyUrlHook {
    /// Creates the hook; without a sink it only logs.
    pub fn new(sink: Option<Arc<dyn ClipboardSink>>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl AfterUploadHook for CopyUrlHook {
    async fn handle(&self, ctx: &mut Context, batch: &mut [ImageRecord]) -> AppResult<()> {
        if !ctx.get_config_as::<bool>(KEY_AUTO_COPY).unwrap_or(false) {
            return Ok(());
        }

        let urls: Vec<&str> = batch.iter().filter_map(|r| r.url.as_deref()).collect();
        if urls.is_empty() {
            return Ok(());
        }

        let Some(sink) = &self.sink else {
            warn!("No clipboard available, URLs not copied");
            return Ok(());
        };

        match sink.write_text(&urls.join("\n")).await {
            Ok(()) => debug!(count = urls.len(), "URLs copied to clipboard"),
            Err(e) => {
                warn!(error = %e, "Failed to copy URLs to clipboard");
                ctx.notify(Notification::new("copy to clipboard failed", e.message.clone()));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for CopyUrlHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyUrlHook")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
