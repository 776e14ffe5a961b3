//! # picflow-core
//!
//! Core crate for PicFlow. Contains the unified error system, the
//! configuration tree and its persistence, bootstrap settings, the
//! pipeline domain types, lifecycle events, and the traits implemented
//! by external collaborators (config store, clipboard source).
//!
//! This crate has **no** internal dependencies on other PicFlow crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
