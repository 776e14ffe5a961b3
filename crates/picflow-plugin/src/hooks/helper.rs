//! The five plugin registries owned by a context.

use picflow_core::config::DEFAULT_TRANSFORMER;

use super::definitions::{
    AfterUploadHook, BeforeTransformHook, BeforeUploadHook, Category, Transformer, Uploader,
};
use crate::registry::PluginRegistry;

/// One registry per category. Plugins register into these during loading.
#[derive(Debug, Clone)]
pub struct Helper {
    /// Exclusive transformer registry (defaults to `path`).
    pub transformer: PluginRegistry<dyn Transformer>,
    /// Exclusive uploader registry.
    pub uploader: PluginRegistry<dyn Uploader>,
    /// Hooks run before the transformer.
    pub before_transform_plugins: PluginRegistry<dyn BeforeTransformHook>,
    /// Hooks run before upload.
    pub before_upload_plugins: PluginRegistry<dyn BeforeUploadHook>,
    /// Hooks run after upload.
    pub after_upload_plugins: PluginRegistry<dyn AfterUploadHook>,
}

impl Helper {
    /// Creates empty registries.
    pub fn new() -> Self {
        Self {
            transformer: PluginRegistry::new(Category::Transformer)
                .with_default(DEFAULT_TRANSFORMER),
            uploader: PluginRegistry::new(Category::Uploader),
            before_transform_plugins: PluginRegistry::new(Category::BeforeTransformPlugins),
            before_upload_plugins: PluginRegistry::new(Category::BeforeUploadPlugins),
            after_upload_plugins: PluginRegistry::new(Category::AfterUploadPlugins),
        }
    }

    /// Returns the registered names of a category, in registration order.
    pub fn names(&self, category: Category) -> Vec<String> {
        match category {
            Category::Transformer => self.transformer.names(),
            Category::Uploader => self.uploader.names(),
            Category::BeforeTransformPlugins => self.before_transform_plugins.names(),
            Category::BeforeUploadPlugins => self.before_upload_plugins.names(),
            Category::AfterUploadPlugins => self.after_upload_plugins.names(),
        }
    }

    /// Returns the resolved active name of an exclusive category.
    pub fn active_name(&self, category: Category) -> Option<&str> {
        match category {
            Category::Transformer => self.transformer.active_name(),
            Category::Uploader => self.uploader.active_name(),
            _ => None,
        }
    }

    /// Returns whether `name` is registered in the category.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        match category {
            Category::Transformer => self.transformer.contains(name),
            Category::Uploader => self.uploader.contains(name),
            Category::BeforeTransformPlugins => self.before_transform_plugins.contains(name),
            Category::BeforeUploadPlugins => self.before_upload_plugins.contains(name),
            Category::AfterUploadPlugins => self.after_upload_plugins.contains(name),
        }
    }

    /// Total number of registrations across all categories.
    pub fn total(&self) -> usize {
        self.transformer.len()
            + self.uploader.len()
            + self.before_transform_plugins.len()
            + self.before_upload_plugins.len()
            + self.after_upload_plugins.len()
    }
}

impl Default for Helper {
    fn default() -> Self {
        Self::new()
    }
}
