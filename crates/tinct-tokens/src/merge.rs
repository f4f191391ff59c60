//! Recursive merge of nested mappings.
//!
//! Used for layering token documents and for combining settings schemas.
//! Mappings merge key by key; anything else (scalars, arrays, null) is
//! replaced by the later value.

use serde_json::Value;

/// Merges `overlay` on top of `base` and returns the result.
///
/// - keys present in only one side are kept as-is
/// - colliding mappings are merged recursively
/// - any other collision takes the value from `overlay`
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_tokens::deep_merge;
///
/// let merged = deep_merge(
///     json!({"color": {"text": "#000", "link": "#00f"}}),
///     json!({"color": {"link": "#f00"}, "spacing": 4}),
/// );
/// assert_eq!(
///     merged,
///     json!({"color": {"text": "#000", "link": "#f00"}, "spacing": 4})
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    let mut base = base;
    deep_merge_into(&mut base, overlay);
    base
}

/// In-place variant of [`deep_merge`].
pub fn deep_merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(target), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match target.get_mut(&key) {
                    Some(existing) => deep_merge_into(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
