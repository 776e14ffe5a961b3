//! # picflow-builtin
//!
//! Handlers shipped with PicFlow and registered by [`BuiltinPlugin`]:
//!
//! - `path` / `base64` transformers
//! - `local` uploader (`picBed.local.path`, `picBed.local.baseUrl`)
//! - `rename` before-upload hook (`settings.autoRename`)
//! - `copy-url` after-upload hook (`settings.autoCopy`)
//!
//! With the `clipboard` feature, [`ArboardClipboard`] reads clipboard images
//! for argument-less uploads and receives copied URLs.

#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod hooks;
pub mod plugin;
pub mod transformer;
pub mod uploader;

#[cfg(feature = "clipboard")]
pub use clipboard::ArboardClipboard;
pub use plugin::{BUILTIN_PLUGIN, BuiltinPlugin};
