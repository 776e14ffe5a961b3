//! Integration tests for context config access and clipboard uploads.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use picflow_core::config::JsonFileStore;
use picflow_core::error::ErrorKind;
use picflow_core::events::PicEvent;
use picflow_plugin::api::context::{Context, UploadOutcome};

use helpers::{BrokenStore, FakeClipboard, RecordingUploader, TestApp};

#[tokio::test]
async fn test_set_then_get_nested_path() {
    let mut app = TestApp::new(json!({})).await;
    app.ctx.set_config(json!({ "a": { "b": 1 } })).expect("set");

    assert_eq!(app.ctx.get_config("a.b"), Some(&json!(1)));
    assert!(app.store.writes().is_empty());
}

#[tokio::test]
async fn test_save_config_writes_once_and_updates_memory() {
    let mut app = TestApp::new(json!({ "picBed": { "uploader": "old" } })).await;

    app.ctx
        .save_config(json!({ "picBed.uploader": "hostA" }))
        .await
        .expect("save");

    assert_eq!(app.store.writes().len(), 1);
    assert_eq!(app.ctx.get_config_str("picBed.uploader"), Some("hostA"));
    assert_eq!(app.store.snapshot()["picBed"]["uploader"], json!("hostA"));
}

#[tokio::test]
async fn test_selected_uploader_round_trip() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    let calls = app.calls.clone();
    app.ctx
        .helper
        .uploader
        .register("hostB", Arc::new(RecordingUploader::new(&calls)))
        .expect("register");

    app.ctx
        .save_config(json!({ "picBed.uploader": "hostA" }))
        .await
        .expect("save");
    let outcome = app.ctx.upload(helpers::inputs(1)).await.expect("upload");

    assert_eq!(outcome.urls(), vec!["https://hostA/a.png"]);
}

#[tokio::test]
async fn test_init_failure_is_fatal_and_signaled() {
    let mut ctx = Context::new(Arc::new(BrokenStore));
    let (_id, mut rx) = ctx.events_mut().subscribe_channel();

    let err = ctx.init().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ConfigInit);
    assert!(matches!(rx.try_recv(), Ok(PicEvent::UploadProgress(-1))));
}

#[tokio::test]
async fn test_empty_clipboard_notifies_without_running_handlers() {
    let mut app = TestApp::with_clipboard(json!({}), Arc::new(FakeClipboard::empty())).await;
    app.register_stubs();

    let outcome = app.ctx.upload(Vec::new()).await.expect("upload");

    assert!(matches!(outcome, UploadOutcome::NothingToUpload));
    assert!(app.calls().is_empty());
    let events = app.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        PicEvent::Notification(n) => {
            assert_eq!(n.title, "image not found in clipboard");
            assert_eq!(n.body, "copy image first");
        }
        other => panic!("expected notification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_temporary_clipboard_file_removed_after_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clip.png");
    std::fs::write(&path, b"png").expect("write");

    let clipboard = Arc::new(FakeClipboard::temporary_file(path.clone()));
    let mut app = TestApp::with_clipboard(json!({}), clipboard).await;
    app.register_stubs();

    let outcome = app.ctx.upload(Vec::new()).await.expect("upload");

    assert_eq!(outcome.urls(), vec!["https://hostA/clip.png"]);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_temporary_clipboard_file_removed_after_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clip.png");
    std::fs::write(&path, b"png").expect("write");

    let clipboard = Arc::new(FakeClipboard::temporary_file(path.clone()));
    let mut app = TestApp::with_clipboard(json!({}), clipboard).await;
    app.register_stubs();
    app.ctx
        .set_config(json!({ "picBed.uploader": "missing" }))
        .expect("set");

    let err = app.ctx.upload(Vec::new()).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Resolution);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_json_file_store_persists_across_contexts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("config.json");

    let mut first = Context::new(Arc::new(JsonFileStore::new(&path)));
    first.init().await.expect("init");
    first
        .save_config(json!({ "picBed.uploader": "hostA", "settings.autoCopy": true }))
        .await
        .expect("save");

    let mut second = Context::new(Arc::new(JsonFileStore::new(&path)));
    second.init().await.expect("init");
    assert_eq!(second.get_config_str("picBed.uploader"), Some("hostA"));
    assert_eq!(second.get_config_as::<bool>("settings.autoCopy"), Some(true));
}
