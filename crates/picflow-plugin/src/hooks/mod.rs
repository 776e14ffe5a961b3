//! Hook system: categories, handler contracts, and the per-context registries.

pub mod definitions;
pub mod helper;

pub use definitions::{
    AfterUploadHook, BeforeTransformHook, BeforeUploadHook, Category, Transformer, Uploader,
};
pub use helper::Helper;
