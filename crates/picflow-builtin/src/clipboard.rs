//! System clipboard access through `arboard`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use image::{ImageFormat, RgbaImage};
use tracing::debug;

use picflow_core::error::AppError;
use picflow_core::result::AppResult;
use picflow_core::traits::{ClipboardImage, ClipboardSink, ClipboardSource};

/// Reads images from and writes text to the system clipboard.
///
/// Images are saved as PNG files in `temp_dir` and reported as temporary,
/// so the upload removes them when done.
#[derive(Debug, Clone)]
pub struct ArboardClipboard {
    temp_dir: PathBuf,
}

impl ArboardClipboard {
    /// Creates a clipboard that stages images in the system temp directory.
    pub fn new() -> Self {
        Self::with_temp_dir(std::env::temp_dir())
    }

    /// Creates a clipboard that stages images in `temp_dir`.
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    fn read_blocking(temp_dir: PathBuf) -> AppResult<ClipboardImage> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AppError::clipboard(format!("Failed to open clipboard: {e}")))?;

        let image_data = match clipboard.get_image() {
            Ok(data) => data,
            Err(arboard::Error::ContentNotAvailable) => return Ok(ClipboardImage::Empty),
            Err(e) => return Err(AppError::clipboard(format!("Failed to read clipboard image: {e}"))),
        };

        let width = image_data.width as u32;
        let height = image_data.height as u32;
        let image = RgbaImage::from_raw(width, height, image_data.bytes.into_owned())
            .ok_or_else(|| AppError::clipboard("Clipboard image has an invalid buffer size"))?;

        std::fs::create_dir_all(&temp_dir)?;
        let timestamp = Local::now().format("%Y%m%d%H%M%S%f");
        let path = temp_dir.join(format!("picflow-clipboard-{timestamp}.png"));
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| AppError::clipboard(format!("Failed to save clipboard image: {e}")))?;

        debug!(path = %path.display(), width, height, "Clipboard image saved");
        Ok(ClipboardImage::File {
            path,
            temporary: true,
        })
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardSource for ArboardClipboard {
    async fn read_image(&self) -> AppResult<ClipboardImage> {
        let temp_dir = self.temp_dir.clone();
        tokio::task::spawn_blocking(move || Self::read_blocking(temp_dir))
            .await
            .map_err(|e| AppError::internal(format!("Clipboard task failed: {e}")))?
    }
}

#[async_trait]
impl ClipboardSink for ArboardClipboard {
    async fn write_text(&self, text: &str) -> AppResult<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| AppError::clipboard(format!("Failed to open clipboard: {e}")))?;
            clipboard
                .set_text(text)
                .map_err(|e| AppError::clipboard(format!("Failed to write clipboard: {e}")))
        })
        .await
        .map_err(|e| AppError::internal(format!("Clipboard task failed: {e}")))?
    }
}
