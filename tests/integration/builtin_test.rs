//! Integration tests for the builtin handlers running in the pipeline.

mod helpers;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use picflow_builtin::BuiltinPlugin;
use picflow_core::result::AppResult;
use picflow_core::traits::ClipboardSink;
use picflow_core::types::Input;
use picflow_plugin::loader::PluginLoader;

use helpers::TestApp;

#[derive(Default)]
struct CapturedText(Mutex<Vec<String>>);

#[async_trait]
impl ClipboardSink for CapturedText {
    async fn write_text(&self, text: &str) -> AppResult<()> {
        self.0.lock().expect("lock").push(text.to_string());
        Ok(())
    }
}

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    image::RgbaImage::new(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .expect("write png");
}

async fn builtin_app(tree: serde_json::Value, sink: Arc<CapturedText>) -> TestApp {
    let mut app = TestApp::new(tree).await;
    let mut loader = PluginLoader::new()
        .with_builtin(Arc::new(BuiltinPlugin::new().with_clipboard(sink)));
    let report = loader.load(&mut app.ctx);
    assert!(report.is_clean());
    app
}

#[tokio::test]
async fn test_local_upload_end_to_end() {
    let source = tempfile::tempdir().expect("tempdir");
    let target = tempfile::tempdir().expect("tempdir");
    let image_path = source.path().join("photo.png");
    write_png(&image_path, 8, 6);

    let sink = Arc::new(CapturedText::default());
    let mut app = builtin_app(
        json!({
            "picBed": {
                "uploader": "local",
                "local": { "path": target.path().to_string_lossy(), "baseUrl": "https://cdn.test" }
            },
            "settings": { "autoCopy": true }
        }),
        sink.clone(),
    )
    .await;

    let outcome = app
        .ctx
        .upload(vec![Input::path(&image_path)])
        .await
        .expect("upload");

    let record = &outcome.records()[0];
    assert_eq!(record.url.as_deref(), Some("https://cdn.test/photo.png"));
    assert_eq!((record.width, record.height), (Some(8), Some(6)));
    assert!(target.path().join("photo.png").exists());
    assert_eq!(
        *sink.0.lock().expect("lock"),
        vec!["https://cdn.test/photo.png".to_string()]
    );
}

#[tokio::test]
async fn test_auto_rename_applies_before_upload() {
    let target = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(CapturedText::default());
    let mut app = builtin_app(
        json!({
            "picBed": { "uploader": "local", "local": { "path": target.path().to_string_lossy() } },
            "settings": { "autoRename": true }
        }),
        sink.clone(),
    )
    .await;

    let outcome = app
        .ctx
        .upload(vec![
            Input::buffer("one.png", b"1".to_vec()),
            Input::buffer("two.jpg", b"2".to_vec()),
        ])
        .await
        .expect("upload");

    let names: Vec<&str> = outcome.records().iter().map(|r| r.file_name.as_str()).collect();
    assert!(names[0].ends_with("-0.png"));
    assert!(names[1].ends_with("-1.jpg"));
    for name in names {
        assert!(target.path().join(name).exists());
    }
    assert!(sink.0.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn test_base64_transformer_selected_by_config() {
    let target = tempfile::tempdir().expect("tempdir");
    let mut app = builtin_app(
        json!({
            "picBed": {
                "uploader": "local",
                "transformer": "base64",
                "local": { "path": target.path().to_string_lossy() }
            }
        }),
        Arc::new(CapturedText::default()),
    )
    .await;

    let outcome = app
        .ctx
        .upload(vec![Input::buffer("a.bin", b"hi".to_vec())])
        .await
        .expect("upload");

    assert_eq!(outcome.records()[0].base64.as_deref(), Some("aGk="));
}
