//! Pipeline stages and lifecycle state.

use serde::{Deserialize, Serialize};

/// One phase of the upload pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Hooks that may rewrite the raw inputs.
    BeforeTransform,
    /// The active transformer turns inputs into image records.
    Transform,
    /// Hooks that may rewrite records before they leave the machine.
    BeforeUpload,
    /// The active uploader sends each record to its destination.
    Upload,
    /// Hooks that consume the uploaded records.
    AfterUpload,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Self::BeforeTransform,
        Self::Transform,
        Self::BeforeUpload,
        Self::Upload,
        Self::AfterUpload,
    ];

    /// Returns the string name of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeTransform => "beforeTransform",
            Self::Transform => "transform",
            Self::BeforeUpload => "beforeUpload",
            Self::Upload => "upload",
            Self::AfterUpload => "afterUpload",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the lifecycle engine is for the current (or last) batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "stage", rename_all = "camelCase")]
pub enum LifecycleState {
    /// No batch has run yet.
    #[default]
    Idle,
    /// A batch is executing the given stage.
    Running(Stage),
    /// The last batch completed every stage.
    Finished,
    /// The last batch stopped at the given stage.
    Failed(Stage),
}
