//! Integration tests for plugin loading.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use picflow_builtin::BuiltinPlugin;
use picflow_core::error::{AppError, ErrorKind};
use picflow_core::result::AppResult;
use picflow_plugin::api::context::Context;
use picflow_plugin::hooks::definitions::Category;
use picflow_plugin::loader::PluginLoader;
use picflow_plugin::plugin::{ConfigField, Plugin, PluginInfo};
use picflow_plugin::plugin_info;

use helpers::{CallLog, RecordingHook, RecordingUploader, TestApp};

/// Registers an uploader and an after-upload hook under `name`.
struct HostPlugin {
    name: &'static str,
    calls: CallLog,
}

impl Plugin for HostPlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(name: self.name, version: "1.2.3", description: "test host")
    }

    fn register(&self, ctx: &mut Context) -> AppResult<()> {
        ctx.helper
            .uploader
            .register(self.name, Arc::new(RecordingUploader::new(&self.calls)))?;
        ctx.helper
            .after_upload_plugins
            .register(self.name, Arc::new(RecordingHook::new(self.name, &self.calls)))
    }

    fn config_schema(&self, _ctx: &Context) -> Vec<ConfigField> {
        vec![ConfigField::input("token").required()]
    }
}

/// Registers a hook, then fails.
struct BrokenPlugin;

impl Plugin for BrokenPlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(name: "broken", version: "0.0.1", description: "always fails")
    }

    fn register(&self, ctx: &mut Context) -> AppResult<()> {
        let calls = CallLog::default();
        ctx.helper
            .before_upload_plugins
            .register("broken", Arc::new(RecordingHook::new("broken", &calls)))?;
        Err(AppError::configuration("missing api key"))
    }
}

#[tokio::test]
async fn test_builtins_then_enabled_plugins_in_declared_order() {
    let mut app = TestApp::new(json!({
        "picflowPlugins": { "zeta": true, "alpha": true, "off": false }
    }))
    .await;
    let calls = app.calls.clone();

    let mut loader = PluginLoader::new()
        .with_builtin(Arc::new(BuiltinPlugin::new()))
        .with_plugin(Arc::new(HostPlugin { name: "alpha", calls: calls.clone() }))
        .with_plugin(Arc::new(HostPlugin { name: "zeta", calls: calls.clone() }))
        .with_plugin(Arc::new(HostPlugin { name: "off", calls }));
    let report = loader.load(&mut app.ctx);

    assert_eq!(report.loaded, vec!["builtin", "zeta", "alpha"]);
    assert_eq!(report.skipped, vec!["off"]);
    assert!(report.is_clean());
    assert_eq!(
        app.ctx.helper.names(Category::Uploader),
        vec!["local", "zeta", "alpha"]
    );
    assert_eq!(
        app.ctx.helper.names(Category::AfterUploadPlugins),
        vec!["copy-url", "zeta", "alpha"]
    );
    assert_eq!(app.ctx.plugin_schema("alpha").map(|s| s.len()), Some(1));
    assert!(app.ctx.plugin_schema("off").is_none());
}

#[tokio::test]
async fn test_broken_plugin_is_skipped_without_leftovers() {
    let mut app = TestApp::new(json!({
        "picflowPlugins": { "broken": true, "alpha": true, "ghost": true }
    }))
    .await;
    let calls = app.calls.clone();

    let mut loader = PluginLoader::new()
        .with_plugin(Arc::new(BrokenPlugin))
        .with_plugin(Arc::new(HostPlugin { name: "alpha", calls }));
    let report = loader.load(&mut app.ctx);

    assert_eq!(report.loaded, vec!["alpha"]);
    let failed: Vec<&str> = report.failed.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(failed, vec!["broken", "ghost"]);
    assert!(report.failed.iter().all(|(_, e)| e.kind == ErrorKind::PluginLoad));
    assert!(app.ctx.helper.before_upload_plugins.is_empty());
}

#[tokio::test]
async fn test_loaded_plugin_serves_uploads() {
    let mut app = TestApp::new(json!({
        "picflowPlugins": { "alpha": true },
        "picBed": { "uploader": "alpha" }
    }))
    .await;
    let calls = app.calls.clone();
    let mut loader = PluginLoader::new()
        .with_builtin(Arc::new(BuiltinPlugin::new()))
        .with_plugin(Arc::new(HostPlugin { name: "alpha", calls }));
    loader.load(&mut app.ctx);

    let outcome = app
        .ctx
        .upload(vec![picflow_core::types::Input::buffer("x.png", b"img".to_vec())])
        .await
        .expect("upload");

    assert_eq!(outcome.urls(), vec!["https://hostA/x.png"]);
    assert_eq!(app.calls(), vec!["upload:x.png", "alpha"]);
}
