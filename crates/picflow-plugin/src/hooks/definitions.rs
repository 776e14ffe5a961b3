//! Plugin categories and the handler contract of each one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use picflow_core::result::AppResult;
use picflow_core::types::{ImageRecord, Input, Stage};

use crate::api::context::Context;
use crate::plugin::ConfigField;

/// The five points where plugins hook into the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// Turns raw inputs into image records. Exactly one runs.
    Transformer,
    /// Sends one record to its destination. Exactly one runs.
    Uploader,
    /// Runs before the transformer; may rewrite `Context::input`.
    BeforeTransformPlugins,
    /// Runs on the transformed batch before upload.
    BeforeUploadPlugins,
    /// Runs on the uploaded batch.
    AfterUploadPlugins,
}

impl Category {
    /// All categories, in pipeline order.
    pub const ALL: [Category; 5] = [
        Self::BeforeTransformPlugins,
        Self::Transformer,
        Self::BeforeUploadPlugins,
        Self::Uploader,
        Self::AfterUploadPlugins,
    ];

    /// Returns the string name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transformer => "transformer",
            Self::Uploader => "uploader",
            Self::BeforeTransformPlugins => "beforeTransformPlugins",
            Self::BeforeUploadPlugins => "beforeUploadPlugins",
            Self::AfterUploadPlugins => "afterUploadPlugins",
        }
    }

    /// Returns whether exactly one plugin of this category runs.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::Transformer | Self::Uploader)
    }

    /// Returns the pipeline stage this category runs in.
    pub fn stage(&self) -> Stage {
        match self {
            Self::BeforeTransformPlugins => Stage::BeforeTransform,
            Self::Transformer => Stage::Transform,
            Self::BeforeUploadPlugins => Stage::BeforeUpload,
            Self::Uploader => Stage::Upload,
            Self::AfterUploadPlugins => Stage::AfterUpload,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Converts the batch inputs into image records.
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Produces one record per usable input, in input order.
    async fn transform(&self, ctx: &mut Context, input: &[Input]) -> AppResult<Vec<ImageRecord>>;
}

/// Sends one record to a destination and attaches the result.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Uploads the record and returns it with `url` set.
    async fn upload(&self, ctx: &mut Context, record: ImageRecord) -> AppResult<ImageRecord>;

    /// Settings this uploader reads from `picBed.<name>`.
    fn config_schema(&self, _ctx: &Context) -> Vec<ConfigField> {
        Vec::new()
    }
}

/// Hook run before the transformer.
#[async_trait]
pub trait BeforeTransformHook: Send + Sync {
    /// May filter or annotate `ctx.input` in place.
    async fn handle(&self, ctx: &mut Context) -> AppResult<()>;
}

/// Hook run on the transformed batch.
#[async_trait]
pub trait BeforeUploadHook: Send + Sync {
    /// May rewrite, drop, or reorder records.
    async fn handle(&self, ctx: &mut Context, batch: &mut Vec<ImageRecord>) -> AppResult<()>;
}

/// Hook run on the uploaded batch.
#[async_trait]
pub trait AfterUploadHook: Send + Sync {
    /// Typically performs side effects such as copying URLs or notifying.
    async fn handle(&self, ctx: &mut Context, batch: &mut [ImageRecord]) -> AppResult<()>;
}
