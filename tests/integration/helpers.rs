//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use picflow_core::config::{ConfigStore, MemoryStore};
use picflow_core::error::AppError;
use picflow_core::events::PicEvent;
use picflow_core::result::AppResult;
use picflow_core::traits::{ClipboardImage, ClipboardSource};
use picflow_core::types::{ImageRecord, Input};
use picflow_plugin::api::context::Context;
use picflow_plugin::hooks::definitions::{
    AfterUploadHook, BeforeTransformHook, BeforeUploadHook, Transformer, Uploader,
};

/// Ordered log of handler invocations shared by the stubs.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Test application context
pub struct TestApp {
    /// The context under test
    pub ctx: Context,
    /// Backing config store
    pub store: Arc<MemoryStore>,
    /// Handler invocations in call order
    pub calls: CallLog,
    /// Every event emitted, in order
    pub events: Arc<Mutex<Vec<PicEvent>>>,
}

impl TestApp {
    /// Create a test application over an in-memory config tree
    pub async fn new(tree: Value) -> Self {
        Self::build(tree, None).await
    }

    /// Create a test application with a clipboard source
    pub async fn with_clipboard(tree: Value, clipboard: Arc<dyn ClipboardSource>) -> Self {
        Self::build(tree, Some(clipboard)).await
    }

    async fn build(tree: Value, clipboard: Option<Arc<dyn ClipboardSource>>) -> Self {
        let store = Arc::new(MemoryStore::new(tree));
        let mut ctx = Context::new(store.clone());
        if let Some(clipboard) = clipboard {
            ctx = ctx.with_clipboard(clipboard);
        }
        ctx.init().await.expect("Failed to init context");

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        ctx.events_mut()
            .subscribe(move |e| sink.lock().expect("lock").push(e.clone()));

        Self {
            ctx,
            store,
            calls: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    /// Register the recording transformer and uploader and select them
    pub fn register_stubs(&mut self) {
        self.ctx
            .helper
            .transformer
            .register("stub", Arc::new(RecordingTransformer::new(&self.calls)))
            .expect("register transformer");
        self.ctx
            .helper
            .uploader
            .register("hostA", Arc::new(RecordingUploader::new(&self.calls)))
            .expect("register uploader");
        self.ctx
            .set_config(serde_json::json!({
                "picBed.transformer": "stub",
                "picBed.uploader": "hostA"
            }))
            .expect("set config");
    }

    /// Recorded handler calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    /// Recorded events
    pub fn events(&self) -> Vec<PicEvent> {
        self.events.lock().expect("lock").clone()
    }

    /// Names of the recorded events
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.name()).collect()
    }

    /// Recorded progress values
    pub fn progress(&self) -> Vec<i32> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                PicEvent::UploadProgress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

fn push(log: &CallLog, entry: impl Into<String>) {
    log.lock().expect("lock").push(entry.into());
}

/// Transformer producing one record per input and logging `transform`
pub struct RecordingTransformer {
    calls: CallLog,
}

impl RecordingTransformer {
    pub fn new(calls: &CallLog) -> Self {
        Self {
            calls: Arc::clone(calls),
        }
    }
}

#[async_trait]
impl Transformer for RecordingTransformer {
    async fn transform(&self, _ctx: &mut Context, input: &[Input]) -> AppResult<Vec<ImageRecord>> {
        push(&self.calls, "transform");
        Ok(input
            .iter()
            .cloned()
            .map(|i| ImageRecord::new(i).with_buffer(b"img".to_vec()))
            .collect())
    }
}

/// Uploader assigning `https://hostA/<fileName>` and logging `upload:<fileName>`
///
/// Fails on the record at `fail_at` when set.
pub struct RecordingUploader {
    calls: CallLog,
    fail_at: Option<usize>,
    seen: Mutex<usize>,
}

impl RecordingUploader {
    pub fn new(calls: &CallLog) -> Self {
        Self {
            calls: Arc::clone(calls),
            fail_at: None,
            seen: Mutex::new(0),
        }
    }

    pub fn failing_at(calls: &CallLog, index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new(calls)
        }
    }
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn upload(&self, _ctx: &mut Context, record: ImageRecord) -> AppResult<ImageRecord> {
        let index = {
            let mut seen = self.seen.lock().expect("lock");
            let index = *seen;
            *seen += 1;
            index
        };
        push(&self.calls, format!("upload:{}", record.file_name));

        if self.fail_at == Some(index) {
            return Err(AppError::external(format!(
                "host rejected {}",
                record.file_name
            )));
        }
        let url = format!("https://hostA/{}", record.file_name);
        Ok(record.with_url(url))
    }
}

/// Hook logging `<label>` in every stage it is registered for
pub struct RecordingHook {
    label: String,
    calls: CallLog,
    fail: bool,
}

impl RecordingHook {
    pub fn new(label: &str, calls: &CallLog) -> Self {
        Self {
            label: label.to_string(),
            calls: Arc::clone(calls),
            fail: false,
        }
    }

    pub fn failing(label: &str, calls: &CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(label, calls)
        }
    }

    fn record(&self) -> AppResult<()> {
        push(&self.calls, self.label.clone());
        if self.fail {
            return Err(AppError::validation(format!("{} refused", self.label)));
        }
        Ok(())
    }
}

#[async_trait]
impl BeforeTransformHook for RecordingHook {
    async fn handle(&self, _ctx: &mut Context) -> AppResult<()> {
        self.record()
    }
}

#[async_trait]
impl BeforeUploadHook for RecordingHook {
    async fn handle(&self, _ctx: &mut Context, _batch: &mut Vec<ImageRecord>) -> AppResult<()> {
        self.record()
    }
}

#[async_trait]
impl AfterUploadHook for RecordingHook {
    async fn handle(&self, _ctx: &mut Context, _batch: &mut [ImageRecord]) -> AppResult<()> {
        self.record()
    }
}

/// Clipboard returning a fixed answer
pub struct FakeClipboard {
    image: ClipboardImage,
}

impl FakeClipboard {
    pub fn empty() -> Self {
        Self {
            image: ClipboardImage::Empty,
        }
    }

    pub fn temporary_file(path: PathBuf) -> Self {
        Self {
            image: ClipboardImage::File {
                path,
                temporary: true,
            },
        }
    }
}

#[async_trait]
impl ClipboardSource for FakeClipboard {
    async fn read_image(&self) -> AppResult<ClipboardImage> {
        Ok(self.image.clone())
    }
}

/// Store whose reads always fail
pub struct BrokenStore;

#[async_trait]
impl ConfigStore for BrokenStore {
    async fn read(&self) -> AppResult<Value> {
        Err(AppError::storage("disk unplugged"))
    }

    async fn write(&self, _partial: &Map<String, Value>) -> AppResult<()> {
        Err(AppError::storage("disk unplugged"))
    }

    fn location(&self) -> String {
        "broken://".to_string()
    }
}

/// Inputs named `a.png`, `b.png`, ...
pub fn inputs(count: usize) -> Vec<Input> {
    (0..count)
        .map(|i| Input::path(format!("/tmp/{}.png", (b'a' + i as u8) as char)))
        .collect()
}
