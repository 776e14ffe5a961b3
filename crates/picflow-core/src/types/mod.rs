//! Core type definitions used across the PicFlow workspace.

pub mod input;
pub mod record;
pub mod stage;

pub use input::Input;
pub use record::ImageRecord;
pub use stage::{LifecycleState, Stage};
