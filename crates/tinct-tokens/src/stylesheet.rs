//! CSS custom property generation from a token document.
//!
//! Walks the preset collections listed in [`PRESET_GROUPS`] and the free-form
//! `custom` tree, producing one declaration per leaf. Running it over a
//! patched document is how user overrides reach the rendered page.

use indexmap::IndexMap;
use serde_json::Value;

use crate::css_var::{css_var_from_slug, PRESET_GROUPS};
use crate::entry::{as_entries, as_string};
use crate::path::TokenPath;

/// Collects `--name → value` declarations for every token in `document`.
///
/// Presets come first, in [`PRESET_GROUPS`] order, then custom tokens in
/// document order. Entries without a scalar value are skipped.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_tokens::css_variables;
///
/// let vars = css_variables(&json!({
///     "settings": {
///         "color": {"palette": [{"slug": "primary", "color": "#336699"}]},
///         "custom": {"font": {"body": {"weight": 400}}}
///     }
/// }), "wp");
///
/// assert_eq!(vars["--wp--preset--color--primary"], "#336699");
/// assert_eq!(vars["--wp--custom--font--body--weight"], "400");
/// ```
pub fn css_variables(document: &Value, prefix: &str) -> IndexMap<String, String> {
    let settings = document
        .get("settings")
        .filter(|s| s.is_object())
        .unwrap_or(document);
    let mut vars = IndexMap::new();

    for (dotted, _) in PRESET_GROUPS {
        let path = TokenPath::parse(dotted);
        let Some(node) = lookup(settings, &path) else {
            continue;
        };
        for entry in as_entries(node) {
            let value = as_string(&entry.value);
            if value.is_empty() {
                continue;
            }
            vars.insert(css_var_from_slug(prefix, &path, &entry.slug), value);
        }
    }

    if let Some(custom) = settings.get("custom") {
        collect_custom(custom, &TokenPath::parse("custom"), prefix, &mut vars);
    }

    vars
}

/// Renders declarations as a CSS rule for `selector`.
pub fn to_css(vars: &IndexMap<String, String>, selector: &str) -> String {
    let mut css = format!("{} {{\n", selector);
    for (name, value) in vars {
        css.push_str(&format!("  {}: {};\n", name, value));
    }
    css.push_str("}\n");
    css
}

fn collect_custom(
    node: &Value,
    path: &TokenPath,
    prefix: &str,
    vars: &mut IndexMap<String, String>,
) {
    let Value::Object(map) = node else {
        return;
    };
    for (key, value) in map {
        match value {
            Value::Object(_) => collect_custom(value, &path.child(key.as_str()), prefix, vars),
            Value::String(_) | Value::Number(_) => {
                vars.insert(css_var_from_slug(prefix, path, key), as_string(value));
            }
            _ => {}
        }
    }
}

fn lookup<'a>(settings: &'a Value, path: &TokenPath) -> Option<&'a Value> {
    let mut node = settings;
    for segment in path.segments() {
        node = node
            .as_object()?
            .iter()
            .find(|(key, _)| crate::path::segment_matches(key, segment))
            .map(|(_, v)| v)?;
    }
    Some(node)
}
