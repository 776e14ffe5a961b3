//! Clipboard image acquisition.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::result::AppResult;

/// What the clipboard currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardImage {
    /// No image is available.
    Empty,
    /// An image file is available.
    File {
        /// Location of the image.
        path: PathBuf,
        /// Whether the file was created for this upload and must be removed
        /// once the pipeline is done with it.
        temporary: bool,
    },
}

/// Source of clipboard images for uploads without explicit inputs.
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    /// Reads the current clipboard image.
    async fn read_image(&self) -> AppResult<ClipboardImage>;
}

/// Destination for text copied after an upload.
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    /// Replaces the clipboard content with `text`.
    async fn write_text(&self, text: &str) -> AppResult<()>;
}
