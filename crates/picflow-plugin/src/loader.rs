//! Plugin loader: registers builtins and the plugins enabled in config.
//!
//! Loading is best effort: a plugin that cannot be found or whose
//! registration fails is logged, reported, and skipped, and the remaining
//! plugins still load. A failed registration leaves no handlers behind.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use picflow_core::config::KEY_PLUGINS;
use picflow_core::error::AppError;

use crate::api::context::Context;
use crate::plugin::Plugin;

/// Outcome of [`PluginLoader::load`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Plugins that registered successfully, in load order.
    pub loaded: Vec<String>,
    /// Plugins declared but disabled.
    pub skipped: Vec<String>,
    /// Plugins that failed to resolve or register.
    pub failed: Vec<(String, AppError)>,
}

impl LoadReport {
    /// Returns whether every enabled plugin loaded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Resolves and registers plugins into a [`Context`].
pub struct PluginLoader {
    /// Plugins registered unconditionally, before anything declared.
    builtins: Vec<Arc<dyn Plugin>>,
    /// Third-party plugins that declared names resolve to.
    catalog: HashMap<String, Arc<dyn Plugin>>,
    /// Shared-library fallback for names missing from the catalog.
    #[cfg(feature = "dynamic")]
    dynamic: Option<dynamic_loader::DynamicLoader>,
}

impl PluginLoader {
    /// Creates a loader with no plugins.
    pub fn new() -> Self {
        Self {
            builtins: Vec::new(),
            catalog: HashMap::new(),
            #[cfg(feature = "dynamic")]
            dynamic: None,
        }
    }

    /// Adds a plugin that is always registered first.
    pub fn with_builtin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.builtins.push(plugin);
        self
    }

    /// Makes a plugin available under its name for `picflowPlugins`.
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        let name = plugin.info().name;
        if self.catalog.insert(name.clone(), plugin).is_some() {
            warn!(plugin = %name, "Plugin catalog entry replaced");
        }
        self
    }

    /// Resolves names missing from the catalog to shared libraries in `dir`.
    #[cfg(feature = "dynamic")]
    pub fn with_plugin_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.dynamic = Some(dynamic_loader::DynamicLoader::new(dir));
        self
    }

    /// Returns the names available to `picflowPlugins`, sorted.
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalog.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registers every builtin, then every enabled declared plugin.
    pub fn load(&mut self, ctx: &mut Context) -> LoadReport {
        let mut report = LoadReport::default();

        for plugin in self.builtins.clone() {
            let name = plugin.info().name;
            Self::register_one(ctx, &name, plugin, &mut report);
        }

        for (name, enabled) in declared_plugins(ctx) {
            if !enabled {
                debug!(plugin = %name, "Plugin disabled, skipping");
                report.skipped.push(name);
                continue;
            }

            match self.resolve(&name) {
                Ok(plugin) => Self::register_one(ctx, &name, plugin, &mut report),
                Err(e) => {
                    error!(plugin = %name, error = %e, "Plugin could not be resolved");
                    report.failed.push((name, e));
                }
            }
        }

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            handlers = ctx.helper.total(),
            "Plugins loaded"
        );
        report
    }

    fn resolve(&mut self, name: &str) -> Result<Arc<dyn Plugin>, AppError> {
        if let Some(plugin) = self.catalog.get(name) {
            return Ok(Arc::clone(plugin));
        }

        #[cfg(feature = "dynamic")]
        if let Some(dynamic) = self.dynamic.as_mut() {
            // SAFETY: plugin libraries in the configured directory are trusted.
            return unsafe { dynamic.load(name) };
        }

        Err(AppError::plugin_load(format!(
            "Plugin '{}' is not installed (available: {})",
            name,
            self.available().join(", ")
        )))
    }

    fn register_one(ctx: &mut Context, name: &str, plugin: Arc<dyn Plugin>, report: &mut LoadReport) {
        let snapshot = ctx.helper.clone();

        match plugin.register(ctx) {
            Ok(()) => {
                let schema = plugin.config_schema(ctx);
                ctx.set_plugin_schema(name, schema);
                let info = plugin.info();
                info!(plugin = %name, version = %info.version, "Plugin registered");
                report.loaded.push(name.to_string());
            }
            Err(e) => {
                ctx.helper = snapshot;
                let err = AppError::plugin_load(format!(
                    "Plugin '{}' failed to register: {}",
                    name, e.message
                ));
                error!(plugin = %name, error = %e, "Plugin registration failed, rolled back");
                report.failed.push((name.to_string(), err));
            }
        }
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("builtins", &self.builtins.len())
            .field("catalog", &self.available())
            .finish()
    }
}

/// Returns the `picflowPlugins` entries in declared order.
///
/// Entries whose value is not a boolean count as disabled.
pub fn declared_plugins(ctx: &Context) -> Vec<(String, bool)> {
    match ctx.get_config(KEY_PLUGINS) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, enabled)| (name.clone(), enabled.as_bool().unwrap_or(false)))
            .collect(),
        Some(other) => {
            warn!(value = %other, "'{}' is not an object, ignoring", KEY_PLUGINS);
            Vec::new()
        }
    }
}

/// Dynamic plugin loader using `libloading` (feature-gated).
#[cfg(feature = "dynamic")]
pub mod dynamic_loader {
    use std::path::PathBuf;
    use std::sync::Arc;

    use tracing::info;

    use picflow_core::error::AppError;

    use crate::plugin::Plugin;

    /// Type of the plugin creation function exported by dynamic plugins.
    ///
    /// Dynamic plugins must export: `extern "C" fn create_plugin() -> *mut dyn Plugin`
    /// returning a pointer obtained from `Box::into_raw`.
    #[allow(improper_ctypes_definitions)]
    pub type CreatePluginFn = unsafe extern "C" fn() -> *mut dyn Plugin;

    /// Loads plugins from shared libraries (.so / .dll / .dylib) in a directory.
    pub struct DynamicLoader {
        /// Directory searched for plugin libraries.
        dir: PathBuf,
        /// Loaded libraries (kept alive for the lifetime of the loader).
        libraries: Vec<libloading::Library>,
    }

    impl DynamicLoader {
        /// Creates a loader searching `dir`.
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self {
                dir: dir.into(),
                libraries: Vec::new(),
            }
        }

        /// Loads the plugin named `name` from its platform library file.
        ///
        /// # Safety
        /// This function loads arbitrary code from a shared library.
        /// Only load trusted plugins.
        pub unsafe fn load(&mut self, name: &str) -> Result<Arc<dyn Plugin>, AppError> {
            let path = self.dir.join(libloading::library_filename(name));

            let lib = unsafe { libloading::Library::new(&path) }.map_err(|e| {
                AppError::plugin_load(format!(
                    "Failed to load plugin library '{}': {}",
                    path.display(),
                    e
                ))
            })?;

            let raw_plugin = {
                let create_fn: libloading::Symbol<CreatePluginFn> =
                    unsafe { lib.get(b"create_plugin") }.map_err(|e| {
                        AppError::plugin_load(format!(
                            "Plugin '{}' missing 'create_plugin' symbol: {}",
                            path.display(),
                            e
                        ))
                    })?;
                unsafe { create_fn() }
            };
            let plugin: Arc<dyn Plugin> = Arc::from(unsafe { Box::from_raw(raw_plugin) });

            info!(plugin = %name, path = %path.display(), "Dynamic plugin loaded");
            self.libraries.push(lib);

            Ok(plugin)
        }
    }

    impl std::fmt::Debug for DynamicLoader {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("DynamicLoader")
                .field("dir", &self.dir)
                .field("loaded_count", &self.libraries.len())
                .finish()
        }
    }
}
