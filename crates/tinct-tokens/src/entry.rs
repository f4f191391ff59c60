//! Terminal accessors over token nodes.
//!
//! These are pure functions of a node: they never look anything up and never
//! fail. A node of the wrong shape yields an empty result.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::path::{humanize, to_kebab};

/// Properties that may carry an entry's value, in lookup order.
///
/// Preset collections store their value under a type-specific key
/// (`color` for palette entries, `size` for font sizes, ...). Normalized
/// entries expose whichever one is present as `value`.
pub const VALUE_KEYS: &[&str] = &[
    "value",
    "color",
    "gradient",
    "colors",
    "size",
    "fontFamily",
    "fontWeight",
    "fontSize",
    "lineHeight",
    "shadow",
    "width",
    "radius",
];

/// A leaf of the token document, normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenEntry {
    /// Kebab-case identifier.
    pub slug: String,
    /// The entry's value, whichever property held it.
    pub value: Value,
    /// Human label (`name` in preset collections).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TokenEntry {
    /// The label, or a humanized slug when none was declared.
    pub fn label_or_slug(&self) -> String {
        self.label.clone().unwrap_or_else(|| humanize(&self.slug))
    }

    /// The value rendered as a string (numbers and booleans included).
    pub fn value_string(&self) -> String {
        as_string(&self.value)
    }
}

/// Returns the node unchanged.
pub fn as_raw(node: &Value) -> Value {
    node.clone()
}

/// Returns a scalar node as a string, or `""` for anything else.
pub fn as_string(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Normalizes a node into entries.
///
/// - an array of objects yields one entry per object that has a `slug`
/// - a mapping yields one entry per key whose value is a scalar, or an
///   object carrying one of [`VALUE_KEYS`]
pub fn as_entries(node: &Value) -> Vec<TokenEntry> {
    match node {
        Value::Array(items) => items.iter().filter_map(entry_from_object).collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| match value {
                Value::Object(obj) => extract_value(obj).map(|value| TokenEntry {
                    slug: to_kebab(key),
                    value,
                    label: obj.get("name").and_then(Value::as_str).map(str::to_string),
                }),
                Value::Array(_) | Value::Null => None,
                scalar => Some(TokenEntry {
                    slug: to_kebab(key),
                    value: scalar.clone(),
                    label: None,
                }),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Flattens a node into a `slug → value` mapping.
///
/// Collections are keyed by slug; mappings keep their keys as-is.
pub fn as_map(node: &Value) -> IndexMap<String, Value> {
    match node {
        Value::Array(_) => as_entries(node)
            .into_iter()
            .map(|e| (e.slug, e.value))
            .collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => IndexMap::new(),
    }
}

/// Returns `slug → label` pairs suitable for select/radio choices.
pub fn as_choices(node: &Value) -> IndexMap<String, String> {
    as_entries(node)
        .into_iter()
        .map(|e| {
            let label = e.label_or_slug();
            (e.slug, label)
        })
        .collect()
}

fn entry_from_object(item: &Value) -> Option<TokenEntry> {
    let obj = item.as_object()?;
    let slug = obj.get("slug").and_then(Value::as_str)?;
    Some(TokenEntry {
        slug: to_kebab(slug),
        value: extract_value(obj).unwrap_or(Value::Null),
        label: obj.get("name").and_then(Value::as_str).map(str::to_string),
    })
}

fn extract_value(obj: &serde_json::Map<String, Value>) -> Option<Value> {
    VALUE_KEYS.iter().find_map(|key| obj.get(*key).cloned())
}
