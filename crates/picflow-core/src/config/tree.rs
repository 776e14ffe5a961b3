//! Dotted-path access into the JSON config tree.

use serde_json::{Map, Value};

/// Returns the value at a dotted path, or `None` if any segment is missing.
///
/// An empty path addresses the whole tree.
pub fn get_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }
    path.split('.')
        .try_fold(tree, |node, segment| node.as_object()?.get(segment))
}

/// Sets the value at a dotted path, creating intermediate objects.
///
/// Non-object values found along the way are replaced by objects.
pub fn set_path(tree: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        *tree = value;
        return;
    }

    let mut node = tree;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Some(map) = node.as_object_mut() else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        node = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Applies every top-level key of `partial` as a dotted path.
pub fn apply_partial(tree: &mut Value, partial: &Map<String, Value>) {
    for (path, value) in partial {
        set_path(tree, path, value.clone());
    }
}
