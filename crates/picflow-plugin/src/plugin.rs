//! The plugin contract: metadata, a registration entry point, and an
//! optional settings schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use picflow_core::result::AppResult;

use crate::api::context::Context;

/// Metadata about a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin name (the key used in `picflowPlugins`).
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Author or maintainer.
    pub author: String,
}

/// A unit of third-party (or builtin) functionality.
///
/// `register` receives the context and performs any number of
/// `ctx.helper.<category>.register(..)` calls.
pub trait Plugin: Send + Sync {
    /// Returns plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Registers the plugin's handlers into the context.
    fn register(&self, ctx: &mut Context) -> AppResult<()>;

    /// Settings the plugin reads, for configuration tooling.
    fn config_schema(&self, _ctx: &Context) -> Vec<ConfigField> {
        Vec::new()
    }
}

/// How configuration tooling should ask for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Free text.
    Input,
    /// Hidden text.
    Password,
    /// One of `choices`.
    List,
    /// Yes/no.
    Confirm,
}

/// One entry of a plugin or uploader settings schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    /// Key under the plugin's config section.
    pub name: String,
    /// Prompt kind.
    pub kind: FieldKind,
    /// Prompt text; the name is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Value offered by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Whether a value must be provided.
    #[serde(default)]
    pub required: bool,
    /// Options for [`FieldKind::List`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl ConfigField {
    /// Creates a field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            message: None,
            default: None,
            required: false,
            choices: Vec::new(),
        }
    }

    /// Creates a free-text field.
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Input)
    }

    /// Creates a yes/no field.
    pub fn confirm(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Confirm)
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the prompt text.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Returns the prompt text.
    pub fn prompt(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.name)
    }
}
