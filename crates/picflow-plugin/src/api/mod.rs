//! API surface handed to callers and plugins.

pub mod context;
pub mod events;

pub use context::{Context, UploadOutcome};
pub use events::{EventBus, SubscriptionId};
