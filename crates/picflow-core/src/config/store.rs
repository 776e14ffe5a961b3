//! Persistence of the config tree.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, ErrorKind};
use crate::result::AppResult;

use super::tree::apply_partial;

/// Reads and writes the persisted config tree.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads the whole tree, creating an empty one if none exists yet.
    async fn read(&self) -> AppResult<Value>;

    /// Persists every top-level key of `partial` as a dotted path.
    async fn write(&self, partial: &Map<String, Value>) -> AppResult<()>;

    /// Human-readable location of the store (for logs).
    fn location(&self) -> String;
}

/// Config tree stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Location of the JSON file.
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file (and its parent directories) if it does not exist.
    async fn ensure_file(&self) -> AppResult<()> {
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create config directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        fs::write(&self.path, b"{}").await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create config file: {}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), "Created empty config file");
        Ok(())
    }

    async fn read_tree(&self) -> AppResult<Value> {
        self.ensure_file().await?;
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read config file: {}", self.path.display()),
                e,
            )
        })?;
        if raw.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        let tree: Value = serde_json::from_str(&raw)?;
        if !tree.is_object() {
            return Err(AppError::configuration(format!(
                "Config file {} does not contain a JSON object",
                self.path.display()
            )));
        }
        Ok(tree)
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn read(&self) -> AppResult<Value> {
        self.read_tree().await
    }

    async fn write(&self, partial: &Map<String, Value>) -> AppResult<()> {
        let mut tree = self.read_tree().await?;
        apply_partial(&mut tree, partial);

        let data = serde_json::to_vec_pretty(&tree)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data).await?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace config file: {}", self.path.display()),
                e,
            )
        })?;

        debug!(
            path = %self.path.display(),
            keys = partial.len(),
            "Persisted config"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Config tree held in memory, recording every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Current tree.
    tree: Mutex<Value>,
    /// Every partial passed to `write`, in order.
    writes: Mutex<Vec<Map<String, Value>>>,
}

impl MemoryStore {
    /// Create a store holding the given tree.
    pub fn new(tree: Value) -> Self {
        Self {
            tree: Mutex::new(tree),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Returns every partial written so far.
    pub fn writes(&self) -> Vec<Map<String, Value>> {
        self.writes
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Returns a copy of the current tree.
    pub fn snapshot(&self) -> Value {
        self.tree
            .lock()
            .map(|t| t.clone())
            .unwrap_or(Value::Null)
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn read(&self) -> AppResult<Value> {
        let tree = self
            .tree
            .lock()
            .map_err(|_| AppError::internal("Memory config store lock poisoned"))?;
        if tree.is_null() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(tree.clone())
    }

    async fn write(&self, partial: &Map<String, Value>) -> AppResult<()> {
        {
            let mut tree = self
                .tree
                .lock()
                .map_err(|_| AppError::internal("Memory config store lock poisoned"))?;
            apply_partial(&mut tree, partial);
        }
        self.writes
            .lock()
            .map_err(|_| AppError::internal("Memory config store lock poisoned"))?
            .push(partial.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
