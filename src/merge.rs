// src/merge.rs - Layering of configuration documents (later documents win)

use crate::document::Document;
use log::debug;
use toml::Value;

/// Depth the editor uses when layering user language files over its defaults.
pub const LANGUAGE_MERGE_DEPTH: usize = 3;

/// Merge `overlay` into `base`.
///
/// While `depth > 0`, tables merge key by key and arrays merge entries that
/// share a `name` key; a matched entry is merged recursively and moved to the
/// end, unmatched entries are appended. At depth 0, or when the two values
/// are of different kinds, the overlay replaces the base outright.
pub fn merge_values(base: Value, overlay: Value, depth: usize) -> Value {
    if depth == 0 {
        return overlay;
    }

    match (base, overlay) {
        (Value::Table(mut base), Value::Table(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_values(existing, value, depth - 1),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Table(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            base.reserve(overlay.len());
            for value in overlay {
                let position = entry_name(&value)
                    .and_then(|name| base.iter().position(|v| entry_name(v) == Some(name)));
                let merged = match position {
                    Some(index) => merge_values(base.remove(index), value, depth - 1),
                    None => value,
                };
                base.push(merged);
            }
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}

fn entry_name(value: &Value) -> Option<&str> {
    value.get("name").and_then(Value::as_str)
}

/// Fold documents left to right into one table.
pub fn merge_documents<'a, I>(docs: I) -> toml::Table
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut merged = Value::Table(toml::Table::new());
    for doc in docs {
        debug!("merging {}", doc.origin());
        merged = merge_values(
            merged,
            Value::Table(doc.root().clone()),
            LANGUAGE_MERGE_DEPTH,
        );
    }
    match merged {
        Value::Table(table) => table,
        _ => toml::Table::new(),
    }
}
