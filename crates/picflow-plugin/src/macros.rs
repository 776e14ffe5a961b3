//! Convenience macros for plugin development.

/// Macro for creating a [`PluginInfo`](crate::plugin::PluginInfo).
///
/// # Example
/// ```rust,ignore
/// let info = plugin_info!(
///     name: "my-uploader",
///     version: "1.0.0",
///     description: "Uploads to my host",
///     author: "Dev"
/// );
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr,
        author: $author:expr
    ) => {
        $crate::prelude::PluginInfo {
            name: $name.to_string(),
            version: $version.to_string(),
            description: $desc.to_string(),
            author: $author.to_string(),
        }
    };
    (
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr
    ) => {
        $crate::plugin_info!(
            name: $name,
            version: $version,
            description: $desc,
            author: ""
        )
    };
}
