//! The builtin plugin, which registers every handler shipped with PicFlow.

use std::sync::Arc;

use picflow_core::result::AppResult;
use picflow_core::traits::ClipboardSink;
use picflow_plugin::api::context::Context;
use picflow_plugin::plugin::{ConfigField, Plugin, PluginInfo};
use picflow_plugin::plugin_info;

use crate::hooks::{COPY_URL_HOOK, CopyUrlHook, KEY_AUTO_COPY, KEY_AUTO_RENAME, RENAME_HOOK, RenameHook};
use crate::transformer::{BASE64_TRANSFORMER, Base64Transformer, PATH_TRANSFORMER, PathTransformer};
use crate::uploader::{LOCAL_UPLOADER, LocalUploader};

/// Name the builtin plugin registers under.
pub const BUILTIN_PLUGIN: &str = "builtin";

/// Registers the `path` and `base64` transformers, the `local` uploader, the
/// `rename` before-upload hook, and the `copy-url` after-upload hook.
#[derive(Default)]
pub struct BuiltinPlugin {
    clipboard: Option<Arc<dyn ClipboardSink>>,
}

impl BuiltinPlugin {
    /// Creates the plugin without clipboard output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets where `copy-url` writes URLs.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }
}

impl Plugin for BuiltinPlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(
            name: BUILTIN_PLUGIN,
            version: env!("CARGO_PKG_VERSION"),
            description: "Builtin transformers, local uploader, and hooks",
            author: "PicFlow Team"
        )
    }

    fn register(&self, ctx: &mut Context) -> AppResult<()> {
        let helper = &mut ctx.helper;
        helper
            .transformer
            .register(PATH_TRANSFORMER, Arc::new(PathTransformer))?;
        helper
            .transformer
            .register(BASE64_TRANSFORMER, Arc::new(Base64Transformer))?;
        helper
            .uploader
            .register(LOCAL_UPLOADER, Arc::new(LocalUploader))?;
        helper
            .before_upload_plugins
            .register(RENAME_HOOK, Arc::new(RenameHook))?;
        helper.after_upload_plugins.register(
            COPY_URL_HOOK,
            Arc::new(CopyUrlHook::new(self.clipboard.clone())),
        )?;
        Ok(())
    }

    fn config_schema(&self, ctx: &Context) -> Vec<ConfigField> {
        let current = |key: &str| ctx.get_config_as::<bool>(key).unwrap_or(false);
        vec![
            ConfigField::confirm(KEY_AUTO_RENAME)
                .with_message("Rename images to their upload time")
                .with_default(current(KEY_AUTO_RENAME)),
            ConfigField::confirm(KEY_AUTO_COPY)
                .with_message("Copy URLs to the clipboard after upload")
                .with_default(current(KEY_AUTO_COPY)),
        ]
    }
}

impl std::fmt::Debug for BuiltinPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinPlugin")
            .field("clipboard", &self.clipboard.is_some())
            .finish()
    }
}
