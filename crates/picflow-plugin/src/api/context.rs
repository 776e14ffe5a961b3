//! Upload context, the object every plugin receives.
//!
//! The context owns the config tree, the plugin registries, the current
//! batch's input and output, and the event bus. One context serves the whole
//! process and is reused across uploads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use picflow_core::config::tree::{apply_partial, get_path};
use picflow_core::config::ConfigStore;
use picflow_core::error::AppError;
use picflow_core::events::{Notification, PROGRESS_FAILED, PicEvent};
use picflow_core::result::AppResult;
use picflow_core::traits::{ClipboardImage, ClipboardSource};
use picflow_core::types::{ImageRecord, Input, LifecycleState};

use super::events::EventBus;
use crate::hooks::helper::Helper;
use crate::lifecycle::Lifecycle;
use crate::plugin::ConfigField;

/// Result of [`Context::upload`].
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The pipeline ran and produced these records.
    Uploaded(Vec<ImageRecord>),
    /// No inputs were given and the clipboard had no image.
    NothingToUpload,
}

impl UploadOutcome {
    /// Returns the uploaded records (empty when nothing was uploaded).
    pub fn records(&self) -> &[ImageRecord] {
        match self {
            Self::Uploaded(records) => records,
            Self::NothingToUpload => &[],
        }
    }

    /// Returns the destination URLs in input order.
    pub fn urls(&self) -> Vec<&str> {
        self.records()
            .iter()
            .filter_map(|r| r.url.as_deref())
            .collect()
    }
}

/// Shared mutable state handed to the pipeline and every plugin.
pub struct Context {
    /// Directory plugins may use for their own files.
    base_dir: PathBuf,
    /// In-memory config tree.
    config: Value,
    /// Persistence for the config tree.
    store: Arc<dyn ConfigStore>,
    /// Source of images when `upload` gets no inputs.
    clipboard: Option<Arc<dyn ClipboardSource>>,
    /// Plugin registries.
    pub helper: Helper,
    /// Inputs of the current batch.
    pub input: Vec<Input>,
    /// Records of the last successful batch.
    pub output: Vec<ImageRecord>,
    /// Event subscribers.
    events: EventBus,
    /// Lifecycle state of the current or last batch.
    state: LifecycleState,
    /// Set while a batch is running.
    pub(crate) in_flight: Arc<AtomicBool>,
    /// Settings schemas declared by loaded plugins.
    schemas: HashMap<String, Vec<ConfigField>>,
}

impl Context {
    /// Creates a context backed by the given config store.
    ///
    /// The tree stays empty until [`init`](Self::init) reads the store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            base_dir: PathBuf::from("."),
            config: Value::Object(Map::new()),
            store,
            clipboard: None,
            helper: Helper::new(),
            input: Vec::new(),
            output: Vec::new(),
            events: EventBus::new(),
            state: LifecycleState::Idle,
            in_flight: Arc::new(AtomicBool::new(false)),
            schemas: HashMap::new(),
        }
    }

    /// Sets the clipboard source used by argument-less uploads.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSource>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Sets the base directory (usually the config file's directory).
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Reads the config tree from the store.
    ///
    /// A failure is fatal to initialization: `UploadProgress(-1)` is
    /// signaled and a `ConfigInit` error returned.
    pub async fn init(&mut self) -> AppResult<()> {
        match self.store.read().await {
            Ok(tree) => {
                self.config = tree;
                info!(location = %self.store.location(), "Config loaded");
                Ok(())
            }
            Err(e) => {
                self.emit(&PicEvent::UploadProgress(PROGRESS_FAILED));
                error!(location = %self.store.location(), error = %e, "Config initialization failed");
                Err(AppError::config_init(format!(
                    "Cannot initialize config at {}: {}",
                    self.store.location(),
                    e.message
                )))
            }
        }
    }

    /// Uploads the given inputs, or the clipboard image when none are given.
    ///
    /// An empty clipboard is not an error: a notification is signaled and
    /// the pipeline does not run. A temporary clipboard file is removed once
    /// the pipeline is done with it, whatever the outcome.
    pub async fn upload(&mut self, inputs: Vec<Input>) -> AppResult<UploadOutcome> {
        if !inputs.is_empty() {
            return Lifecycle::start(self, inputs)
                .await
                .map(UploadOutcome::Uploaded);
        }

        let image = match &self.clipboard {
            Some(clipboard) => {
                let clipboard = Arc::clone(clipboard);
                clipboard.read_image().await.inspect_err(|e| {
                    error!(error = %e, "Failed to read clipboard");
                })?
            }
            None => ClipboardImage::Empty,
        };

        match image {
            ClipboardImage::Empty => {
                self.notify(Notification::new(
                    "image not found in clipboard",
                    "copy image first",
                ));
                warn!("No image to upload");
                Ok(UploadOutcome::NothingToUpload)
            }
            ClipboardImage::File { path, temporary } => {
                let _cleanup = temporary.then(|| TempFileGuard::new(path.clone()));
                debug!(path = %path.display(), temporary, "Uploading clipboard image");
                Lifecycle::start(self, vec![Input::path(path)])
                    .await
                    .map(UploadOutcome::Uploaded)
                    .inspect_err(|e| error!(error = %e, "Clipboard upload failed"))
            }
        }
    }

    /// Returns the value at a dotted path; `""` returns the whole tree.
    pub fn get_config(&self, path: &str) -> Option<&Value> {
        get_path(&self.config, path)
    }

    /// Returns the string at a dotted path.
    pub fn get_config_str(&self, path: &str) -> Option<&str> {
        self.get_config(path).and_then(|v| v.as_str())
    }

    /// Deserializes the value at a dotted path.
    pub fn get_config_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.get_config(path)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Sets each top-level key of `partial` (a dotted path) in memory only.
    pub fn set_config(&mut self, partial: Value) -> AppResult<()> {
        let partial = as_partial(partial)?;
        apply_partial(&mut self.config, &partial);
        Ok(())
    }

    /// Persists `partial` through the store, then applies it in memory.
    pub async fn save_config(&mut self, partial: Value) -> AppResult<()> {
        let partial = as_partial(partial)?;
        self.store.write(&partial).await?;
        apply_partial(&mut self.config, &partial);
        debug!(keys = partial.len(), "Config saved");
        Ok(())
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the event bus for subscribing.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Returns the event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Signals an event to every subscriber.
    pub fn emit(&self, event: &PicEvent) {
        self.events.emit(event);
    }

    /// Signals a user-facing notification.
    pub fn notify(&self, notification: Notification) {
        self.emit(&PicEvent::Notification(notification));
    }

    /// Returns the lifecycle state of the current or last batch.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }

    /// Returns the settings schema a loaded plugin declared.
    pub fn plugin_schema(&self, name: &str) -> Option<&[ConfigField]> {
        self.schemas.get(name).map(|s| s.as_slice())
    }

    pub(crate) fn set_plugin_schema(&mut self, name: &str, schema: Vec<ConfigField>) {
        if schema.is_empty() {
            self.schemas.remove(name);
        } else {
            self.schemas.insert(name.to_string(), schema);
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("store", &self.store.location())
            .field("helper", &self.helper)
            .field("input", &self.input.len())
            .field("output", &self.output.len())
            .field("state", &self.state)
            .finish()
    }
}

fn as_partial(partial: Value) -> AppResult<Map<String, Value>> {
    match partial {
        Value::Object(map) => Ok(map),
        other => Err(AppError::validation(format!(
            "Config update must be an object keyed by dotted paths, got {other}"
        ))),
    }
}

/// Removes a temporary file when dropped.
///
/// Dropping happens on success, on error, and when the upload future is
/// cancelled, so the file is removed exactly once in every case.
struct TempFileGuard {
    path: PathBuf,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary clipboard image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary clipboard image"
            ),
        }
    }
}
