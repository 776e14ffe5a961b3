//! Plugin registry: named handlers for one category, with an active selector.
//!
//! Exclusive categories (transformer, uploader) keep one handler per name and
//! resolve exactly one active handler. Hook categories keep every
//! registration, in order, and run all of them.

use std::sync::Arc;

use tracing::{debug, info};

use picflow_core::error::AppError;
use picflow_core::result::AppResult;

use crate::hooks::definitions::Category;

/// Entry in a plugin registry.
struct RegistryEntry<H: ?Sized> {
    /// Name the handler was registered under.
    name: String,
    /// The handler.
    handler: Arc<H>,
}

impl<H: ?Sized> Clone for RegistryEntry<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// Registry of handlers for a single category.
pub struct PluginRegistry<H: ?Sized> {
    /// Category this registry serves.
    category: Category,
    /// Registered handlers, in registration order.
    entries: Vec<RegistryEntry<H>>,
    /// Explicitly selected handler name.
    active: Option<String>,
    /// Name used when nothing was selected.
    default_name: Option<String>,
}

impl<H: ?Sized> PluginRegistry<H> {
    /// Creates a new empty registry for a category.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
            active: None,
            default_name: None,
        }
    }

    /// Sets the name resolved by [`get_active`](Self::get_active) when
    /// nothing was selected.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    /// Returns the category this registry serves.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Registers a handler under `name`.
    ///
    /// Exclusive categories replace an existing handler with the same name in
    /// place; hook categories always append.
    pub fn register(&mut self, name: &str, handler: Arc<H>) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation(format!(
                "Cannot register a {} plugin with an empty name",
                self.category
            )));
        }

        if self.category.is_exclusive() {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
                entry.handler = handler;
                info!(category = %self.category, name = %name, "Plugin handler replaced");
                return Ok(());
            }
        }

        self.entries.push(RegistryEntry {
            name: name.to_string(),
            handler,
        });

        info!(
            category = %self.category,
            name = %name,
            position = self.entries.len(),
            "Plugin handler registered"
        );
        Ok(())
    }

    /// Removes every handler registered under `name`.
    ///
    /// Clears the selection if it pointed at `name`. Returns whether anything
    /// was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        let removed = self.entries.len() != before;

        if removed && self.active.as_deref() == Some(name) {
            self.active = None;
        }
        if removed {
            info!(category = %self.category, name = %name, "Plugin handler unregistered");
        }
        removed
    }

    /// Selects the active handler of an exclusive category.
    pub fn select(&mut self, name: &str) -> AppResult<()> {
        if !self.category.is_exclusive() {
            return Err(AppError::validation(format!(
                "Category '{}' runs every plugin and has no active selection",
                self.category
            )));
        }
        if !self.contains(name) {
            return Err(AppError::resolution(format!(
                "No {} named '{}' is registered (available: {})",
                self.category,
                name,
                self.describe_names()
            )));
        }
        if self.active.as_deref() != Some(name) {
            debug!(category = %self.category, name = %name, "Active plugin selected");
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Returns the active handler.
    ///
    /// Falls back to the default name when nothing was selected.
    pub fn get_active(&self) -> AppResult<Arc<H>> {
        let name = self.active_name().ok_or_else(|| {
            AppError::resolution(format!(
                "No active {} selected (available: {})",
                self.category,
                self.describe_names()
            ))
        })?;

        self.get(name).ok_or_else(|| {
            AppError::resolution(format!(
                "Active {} '{}' is not registered (available: {})",
                self.category,
                name,
                self.describe_names()
            ))
        })
    }

    /// Returns the name that [`get_active`](Self::get_active) resolves.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref().or(self.default_name.as_deref())
    }

    /// Returns the first handler registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<H>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| Arc::clone(&e.handler))
    }

    /// Returns whether a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Returns every `(name, handler)` pair in registration order.
    pub fn all(&self) -> Vec<(String, Arc<H>)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), Arc::clone(&e.handler)))
            .collect()
    }

    /// Returns every registered name in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn describe_names(&self) -> String {
        if self.entries.is_empty() {
            "none".to_string()
        } else {
            self.names().join(", ")
        }
    }
}

impl<H: ?Sized> Clone for PluginRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            category: self.category,
            entries: self.entries.clone(),
            active: self.active.clone(),
            default_name: self.default_name.clone(),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for PluginRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("category", &self.category)
            .field("names", &self.names())
            .field("active", &self.active_name())
            .finish()
    }
}
