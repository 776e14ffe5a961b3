//! Builtin transformers: `path` and `base64`.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use tracing::debug;

use picflow_core::error::AppError;
use picflow_core::result::AppResult;
use picflow_core::types::{ImageRecord, Input};
use picflow_plugin::api::context::Context;
use picflow_plugin::hooks::definitions::Transformer;

/// Name of the file-reading transformer.
pub const PATH_TRANSFORMER: &str = "path";
/// Name of the base64-encoding transformer.
pub const BASE64_TRANSFORMER: &str = "base64";

/// Reads each input into a record with its bytes and dimensions.
#[derive(Debug, Default)]
pub struct PathTransformer;

#[async_trait]
impl Transformer for PathTransformer {
    async fn transform(&self, _ctx: &mut Context, input: &[Input]) -> AppResult<Vec<ImageRecord>> {
        let mut records = Vec::with_capacity(input.len());
        for item in input {
            records.push(load_record(item).await?);
        }
        Ok(records)
    }
}

/// Like [`PathTransformer`], and also attaches the base64 encoding.
#[derive(Debug, Default)]
pub struct Base64Transformer;

#[async_trait]
impl Transformer for Base64Transformer {
    async fn transform(&self, _ctx: &mut Context, input: &[Input]) -> AppResult<Vec<ImageRecord>> {
        let mut records = Vec::with_capacity(input.len());
        for item in input {
            let mut record = load_record(item).await?;
            record.base64 = record.buffer.as_ref().map(|b| STANDARD.encode(b));
            records.push(record);
        }
        Ok(records)
    }
}

/// Builds a record from an input, reading files from disk.
pub async fn load_record(input: &Input) -> AppResult<ImageRecord> {
    let data = match input {
        Input::Path { path } => {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::not_found(format!("Image not found: {}", path.display()))
                } else {
                    AppError::with_source(
                        picflow_core::error::ErrorKind::Storage,
                        format!("Failed to read image {}", path.display()),
                        e,
                    )
                }
            })?;
            Bytes::from(bytes)
        }
        Input::Buffer { data, .. } => data.clone(),
    };

    let mut record = ImageRecord::new(input.clone());
    let (width, height) = probe_dimensions(&data);
    record.width = width;
    record.height = height;

    debug!(
        file_name = %record.file_name,
        size = data.len(),
        width = ?record.width,
        height = ?record.height,
        "Input transformed"
    );

    Ok(record.with_buffer(data))
}

/// Best-effort pixel dimensions; unknown formats yield `None`.
fn probe_dimensions(data: &[u8]) -> (Option<u32>, Option<u32>) {
    let reader = match image::ImageReader::new(std::io::Cursor::new(data)).with_guessed_format() {
        Ok(reader) => reader,
        Err(_) => return (None, None),
    };
    match reader.into_dimensions() {
        Ok((w, h)) => (Some(w), Some(h)),
        Err(_) => (None, None),
    }
}
