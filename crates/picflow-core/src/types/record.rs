//! The in-flight representation of one image.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::input::Input;

/// One image as it moves through Transform and Upload.
///
/// Created by the transformer, mutated by before-upload hooks, the uploader,
/// and after-upload hooks. Records never outlive the batch that made them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Unique record identifier (for logging and correlation).
    pub id: Uuid,
    /// The input this record was produced from.
    pub source: Input,
    /// File name used at the destination.
    pub file_name: String,
    /// Extension with leading dot (e.g. `.png`), empty if unknown.
    pub extname: String,
    /// Transformed bytes.
    #[serde(skip)]
    pub buffer: Option<Bytes>,
    /// Base64 encoding of the bytes, for hosts that want it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    /// Pixel width, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Destination URL, set by the uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Host-specific data attached by plugins.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl ImageRecord {
    /// Creates a record for the given input with its default file name.
    pub fn new(source: Input) -> Self {
        let file_name = source.file_name();
        let extname = extname_of(&file_name);
        Self {
            id: Uuid::new_v4(),
            source,
            file_name,
            extname,
            buffer: None,
            base64: None,
            width: None,
            height: None,
            url: None,
            metadata: Map::new(),
        }
    }

    /// Sets the transformed bytes.
    pub fn with_buffer(mut self, buffer: impl Into<Bytes>) -> Self {
        self.buffer = Some(buffer.into());
        self
    }

    /// Sets the destination URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Renames the record, keeping `extname` in sync.
    pub fn rename(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
        self.extname = extname_of(&self.file_name);
    }

    /// Returns whether the uploader has attached a URL.
    pub fn is_uploaded(&self) -> bool {
        self.url.is_some()
    }

    /// Size of the transformed payload in bytes.
    pub fn size(&self) -> usize {
        self.buffer.as_ref().map(|b| b.len()).unwrap_or(0)
    }
}

/// Extension of a file name including the leading dot.
pub fn extname_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => file_name[idx..].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_derives_names() {
        let record = ImageRecord::new(Input::path("/a/b/photo.jpeg"));
        assert_eq!(record.file_name, "photo.jpeg");
        assert_eq!(record.extname, ".jpeg");
        assert!(!record.is_uploaded());
    }

    #[test]
    fn test_rename_updates_extname() {
        let mut record = ImageRecord::new(Input::buffer("raw", vec![0u8; 4]));
        assert_eq!(record.extname, "");
        record.rename("20240101.png");
        assert_eq!(record.extname, ".png");
    }

    #[test]
    fn test_extname_of_dotfile() {
        assert_eq!(extname_of(".hidden"), "");
        assert_eq!(extname_of("a.tar.gz"), ".gz");
    }
}
