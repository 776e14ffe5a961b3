//! # picflow-plugin
//!
//! Plugin framework and upload engine for PicFlow. Provides:
//!
//! - Named plugin registries for the five pipeline categories
//! - The upload [`Context`] shared by the pipeline and every plugin
//! - The [`Lifecycle`] that drives a batch through the stages
//! - The [`PluginLoader`] for builtin, configured, and (with the
//!   `dynamic` feature) shared-library plugins
//! - Event subscription via [`api::events::EventBus`]

pub mod api;
pub mod hooks;
pub mod lifecycle;
pub mod loader;
pub mod macros;
pub mod plugin;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use api::context::{Context, UploadOutcome};
pub use hooks::definitions::Category;
pub use hooks::helper::Helper;
pub use lifecycle::Lifecycle;
pub use loader::{LoadReport, PluginLoader};
pub use plugin::{Plugin, PluginInfo};
pub use registry::PluginRegistry;
