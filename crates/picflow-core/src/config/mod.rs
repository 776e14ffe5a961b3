//! Configuration: the user config tree and the bootstrap settings.
//!
//! The config tree is a JSON document addressed by dotted paths and
//! persisted through a [`store::ConfigStore`]. The bootstrap [`Settings`]
//! decide where that document lives and how logging is set up; they are
//! read with the `config` crate from an optional TOML file and `PICFLOW__*`
//! environment variables.

pub mod logging;
pub mod store;
pub mod tree;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;

use crate::error::AppError;

pub use store::{ConfigStore, JsonFileStore, MemoryStore};
pub use tree::{get_path, set_path};

/// Dotted path of the active uploader name.
pub const KEY_UPLOADER: &str = "picBed.uploader";
/// Legacy alias for [`KEY_UPLOADER`].
pub const KEY_UPLOADER_LEGACY: &str = "picBed.current";
/// Dotted path of the active transformer name.
pub const KEY_TRANSFORMER: &str = "picBed.transformer";
/// Dotted path of the declared third-party plugins (`name -> enabled`).
pub const KEY_PLUGINS: &str = "picflowPlugins";
/// Transformer used when the config does not name one.
pub const DEFAULT_TRANSFORMER: &str = "path";

/// Bootstrap settings for the binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Location of the JSON config tree; `~/.picflow/config.json` if unset.
    #[serde(default)]
    pub config_path: Option<String>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from `picflow.toml` (optional) and the environment.
    ///
    /// Environment variables are prefixed with `PICFLOW` and use `__` as
    /// the section separator, e.g. `PICFLOW__LOGGING__LEVEL=debug`.
    pub fn load(file: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("PICFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build settings: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize settings: {e}")))
    }

    /// Resolves the config tree location, falling back to the home directory.
    pub fn resolve_config_path(&self) -> PathBuf {
        match &self.config_path {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_config_path(),
        }
    }
}

/// `~/.picflow/config.json`, or `./.picflow/config.json` without a home.
pub fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".picflow").join("config.json")
}
