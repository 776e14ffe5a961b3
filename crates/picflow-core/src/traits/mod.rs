//! Core traits defined in `picflow-core` and implemented by other crates.

pub mod clipboard;

pub use clipboard::{ClipboardImage, ClipboardSink, ClipboardSource};
pub use crate::config::store::ConfigStore;
