//! Integration tests for the upload pipeline.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use picflow_core::error::ErrorKind;
use picflow_core::events::PicEvent;
use picflow_core::types::{ImageRecord, LifecycleState, Stage};
use picflow_plugin::api::context::{Context, UploadOutcome};
use picflow_plugin::traits::FnBeforeUpload;

use helpers::{RecordingHook, RecordingUploader, TestApp, inputs};

#[tokio::test]
async fn test_stages_run_in_order() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    let calls = app.calls.clone();
    let helper = &mut app.ctx.helper;
    helper
        .before_transform_plugins
        .register("bt", Arc::new(RecordingHook::new("beforeTransform", &calls)))
        .expect("register");
    helper
        .before_upload_plugins
        .register("bu", Arc::new(RecordingHook::new("beforeUpload", &calls)))
        .expect("register");
    helper
        .after_upload_plugins
        .register("au", Arc::new(RecordingHook::new("afterUpload", &calls)))
        .expect("register");

    let outcome = app.ctx.upload(inputs(2)).await.expect("upload");

    assert_eq!(
        app.calls(),
        vec![
            "beforeTransform",
            "transform",
            "beforeUpload",
            "upload:a.png",
            "upload:b.png",
            "afterUpload"
        ]
    );
    assert_eq!(outcome.urls(), vec!["https://hostA/a.png", "https://hostA/b.png"]);
    assert_eq!(app.ctx.output.len(), 2);
    assert_eq!(app.ctx.state(), LifecycleState::Finished);
}

#[tokio::test]
async fn test_hooks_run_in_registration_order() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    let calls = app.calls.clone();
    for label in ["first", "second", "third"] {
        app.ctx
            .helper
            .after_upload_plugins
            .register(label, Arc::new(RecordingHook::new(label, &calls)))
            .expect("register");
    }

    app.ctx.upload(inputs(1)).await.expect("upload");

    let calls = app.calls();
    assert_eq!(&calls[calls.len() - 3..], &["first", "second", "third"]);
}

#[tokio::test]
async fn test_events_on_success() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();

    app.ctx.upload(inputs(1)).await.expect("upload");

    assert_eq!(app.progress(), vec![0, 30, 60, 100]);
    let events = app.events();
    match events.last() {
        Some(PicEvent::Finished(batch)) => {
            assert_eq!(batch.len(), 1);
            assert_eq!(batch[0].url.as_deref(), Some("https://hostA/a.png"));
        }
        other => panic!("expected Finished, got {other:?}"),
    }
    let stages: Vec<Stage> = events
        .iter()
        .filter_map(|e| match e {
            PicEvent::StageStarted(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(stages, Stage::ALL.to_vec());
}

#[tokio::test]
async fn test_missing_transformer_fails_and_keeps_output() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    app.ctx.upload(inputs(1)).await.expect("first upload");
    let previous: Vec<_> = app.ctx.output.iter().map(|r| r.id).collect();

    app.ctx
        .set_config(json!({ "picBed.transformer": "nope" }))
        .expect("set");
    let err = app.ctx.upload(inputs(2)).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Resolution);
    assert_eq!(err.stage, Some(Stage::Transform));
    let kept: Vec<_> = app.ctx.output.iter().map(|r| r.id).collect();
    assert_eq!(kept, previous);
    assert_eq!(app.ctx.state(), LifecycleState::Failed(Stage::Transform));
}

#[tokio::test]
async fn test_uploader_failure_stops_remaining_records() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    let calls = app.calls.clone();
    app.ctx
        .helper
        .uploader
        .register("hostA", Arc::new(RecordingUploader::failing_at(&calls, 1)))
        .expect("register");
    app.ctx
        .helper
        .after_upload_plugins
        .register("au", Arc::new(RecordingHook::new("afterUpload", &calls)))
        .expect("register");

    let err = app.ctx.upload(inputs(3)).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Stage);
    assert_eq!(err.stage, Some(Stage::Upload));
    assert_eq!(app.calls(), vec!["transform", "upload:a.png", "upload:b.png"]);

    let events = app.events();
    assert!(!events.iter().any(|e| matches!(e, PicEvent::Finished(_))));
    assert!(events.iter().any(|e| matches!(
        e,
        PicEvent::Failed { stage: Stage::Upload, .. }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        PicEvent::Notification(n) if n.title.contains("upload")
    )));
    assert_eq!(app.progress().last(), Some(&-1));
}

#[tokio::test]
async fn test_failing_before_upload_hook_skips_uploader() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    let calls = app.calls.clone();
    app.ctx
        .helper
        .before_upload_plugins
        .register("guard", Arc::new(RecordingHook::failing("guard", &calls)))
        .expect("register");

    let err = app.ctx.upload(inputs(1)).await.unwrap_err();

    assert_eq!(err.stage, Some(Stage::BeforeUpload));
    assert!(err.message.contains("guard refused"));
    assert_eq!(app.calls(), vec!["transform", "guard"]);
}

#[tokio::test]
async fn test_before_upload_hook_can_drop_records() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    app.ctx
        .helper
        .before_upload_plugins
        .register(
            "only-first",
            Arc::new(FnBeforeUpload::new(
                |_ctx: &mut Context, batch: &mut Vec<ImageRecord>| {
                    batch.truncate(1);
                    Ok(())
                },
            )),
        )
        .expect("register");

    let outcome = app.ctx.upload(inputs(3)).await.expect("upload");

    assert_eq!(outcome.records().len(), 1);
    assert_eq!(app.calls(), vec!["transform", "upload:a.png"]);
}

#[tokio::test]
async fn test_context_is_reusable_after_failure() {
    let mut app = TestApp::new(json!({})).await;
    app.register_stubs();
    app.ctx
        .set_config(json!({ "picBed.uploader": "missing" }))
        .expect("set");
    assert!(app.ctx.upload(inputs(1)).await.is_err());

    app.ctx
        .set_config(json!({ "picBed.uploader": "hostA" }))
        .expect("set");
    let outcome = app.ctx.upload(inputs(1)).await.expect("retry");
    assert!(matches!(outcome, UploadOutcome::Uploaded(_)));
}
