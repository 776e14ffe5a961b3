//! Raw pipeline inputs.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A raw reference handed to the pipeline before transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Input {
    /// A file on the local filesystem.
    Path {
        /// Location of the file.
        path: PathBuf,
    },
    /// Image bytes already held in memory.
    Buffer {
        /// Name to give the image once uploaded.
        file_name: String,
        /// Raw image bytes.
        #[serde(skip)]
        data: Bytes,
    },
}

impl Input {
    /// Create a path input.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path { path: path.into() }
    }

    /// Create an in-memory input.
    pub fn buffer(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::Buffer {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Returns the file name this input would be uploaded under.
    pub fn file_name(&self) -> String {
        match self {
            Self::Path { path } => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| "image".to_string()),
            Self::Buffer { file_name, .. } => file_name.clone(),
        }
    }

    /// Returns the filesystem path, if this input has one.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path { path } => Some(path),
            Self::Buffer { .. } => None,
        }
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path { path } => write!(f, "{}", path.display()),
            Self::Buffer { file_name, data } => write!(f, "{} ({} bytes)", file_name, data.len()),
        }
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Self::Path { path }
    }
}

impl From<&str> for Input {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}
