//! Lifecycle events signaled by the upload context.
//!
//! Events are delivered through the context's event bus to every
//! subscriber (the CLI, GUIs embedding the library, plugins).

use serde::{Deserialize, Serialize};

use crate::types::{ImageRecord, Stage};

/// Progress value signaled when initialization or a run fails.
pub const PROGRESS_FAILED: i32 = -1;

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Longer description.
    pub body: String,
}

impl Notification {
    /// Creates a new notification.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Union of all events the context can signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum PicEvent {
    /// A batch completed every stage.
    Finished(Vec<ImageRecord>),
    /// Something the user should see.
    Notification(Notification),
    /// Coarse progress of the current run, or `-1` on failure.
    UploadProgress(i32),
    /// A stage is about to run.
    StageStarted(Stage),
    /// A run stopped at the given stage.
    Failed {
        /// The stage that failed.
        stage: Stage,
        /// The error message.
        message: String,
    },
}

impl PicEvent {
    /// Returns the event name as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Finished(_) => "finished",
            Self::Notification(_) => "notification",
            Self::UploadProgress(_) => "uploadProgress",
            Self::StageStarted(_) => "stageStarted",
            Self::Failed { .. } => "failed",
        }
    }
}
