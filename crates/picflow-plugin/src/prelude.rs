//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use picflow_core::error::AppError;
pub use picflow_core::events::{Notification, PicEvent};
pub use picflow_core::result::AppResult;
pub use picflow_core::types::{ImageRecord, Input, Stage};

pub use crate::api::context::{Context, UploadOutcome};
pub use crate::hooks::definitions::{
    AfterUploadHook, BeforeTransformHook, BeforeUploadHook, Category, Transformer, Uploader,
};
pub use crate::plugin::{ConfigField, FieldKind, Plugin, PluginInfo};
pub use crate::traits::{FnAfterUpload, FnBeforeTransform, FnBeforeUpload, FnTransformer, FnUploader};

pub use crate::plugin_info;
