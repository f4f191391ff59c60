//! Folds setting overrides back into the token document.
//!
//! The patch is a pure function of the schema, the mod store and the token
//! defaults. Settings left at their default (compared after sanitizing, so
//! `#FFFFFF` matches `#ffffff`) contribute nothing, so patching twice without
//! changes yields the same empty patch. Existing token keys keep the
//! document's spelling (`lineHeight`, `linkHover`).

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tinct_schema::{FontProperty, ModStore, SchemaRegistry, TokenBinding};
use tinct_tokens::entry::as_string;
use tinct_tokens::{
    deep_merge_into, to_kebab, to_snake, Origin, TokenPath, TokenQuery, TokenStore,
};

use crate::sanitize::same_value;

/// A palette entry override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntryPatch {
    pub slug: String,
    pub color: String,
    pub name: String,
}

/// A fragment of token document carrying user overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenPatch {
    /// Palette entries, keyed by slug.
    pub palette: IndexMap<String, PaletteEntryPatch>,
    /// A subtree rooted at `custom`.
    pub custom: Map<String, Value>,
}

impl TokenPatch {
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty() && self.custom.is_empty()
    }

    /// The patch as a `settings` document fragment.
    pub fn to_document(&self) -> Value {
        let mut settings = Map::new();
        if !self.palette.is_empty() {
            let palette: Vec<Value> = self
                .palette
                .values()
                .map(|p| serde_json::json!({"slug": p.slug, "color": p.color, "name": p.name}))
                .collect();
            settings.insert(
                "color".to_string(),
                serde_json::json!({ "palette": palette }),
            );
        }
        if !self.custom.is_empty() {
            settings.insert("custom".to_string(), Value::Object(self.custom.clone()));
        }
        serde_json::json!({ "settings": settings })
    }

    /// Returns `document` with the patch applied.
    ///
    /// Palette entries merge into the entry with the same slug (unknown slugs
    /// are appended); the custom subtree deep-merges. `document` is not
    /// modified.
    pub fn apply_to(&self, document: &Value) -> Value {
        let mut out = document.clone();
        if self.is_empty() {
            return out;
        }
        if !out.is_object() {
            out = Value::Object(Map::new());
        }
        let wrapped = out.get("settings").is_some_and(Value::is_object);
        let root = if wrapped {
            &mut out["settings"]
        } else {
            &mut out
        };

        if !self.palette.is_empty() {
            if let Some(color) = object_entry(root, "color") {
                let palette = color
                    .entry("palette")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !palette.is_array() {
                    *palette = Value::Array(Vec::new());
                }
                if let Value::Array(entries) = palette {
                    for patch in self.palette.values() {
                        merge_palette_entry(entries, patch);
                    }
                }
            }
        }

        if !self.custom.is_empty() {
            if let Value::Object(map) = root {
                let custom = map
                    .entry("custom")
                    .or_insert_with(|| Value::Object(Map::new()));
                deep_merge_into(custom, Value::Object(self.custom.clone()));
            }
        }
        out
    }

    fn set_custom(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut node = &mut self.custom;
        for segment in parents {
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            node = match child {
                Value::Object(map) => map,
                _ => return,
            };
        }
        node.insert(last.to_string(), value);
    }
}

fn merge_palette_entry(entries: &mut Vec<Value>, patch: &PaletteEntryPatch) {
    let position = entries.iter().position(|e| {
        e.get("slug")
            .and_then(Value::as_str)
            .is_some_and(|s| to_kebab(s) == patch.slug)
    });
    match position {
        Some(i) => {
            if let Some(entry) = entries[i].as_object_mut() {
                entry.insert("color".into(), Value::String(patch.color.clone()));
                entry.insert("name".into(), Value::String(patch.name.clone()));
            }
        }
        None => entries.push(serde_json::json!({
            "slug": patch.slug,
            "color": patch.color,
            "name": patch.name,
        })),
    }
}

fn object_entry<'v>(root: &'v mut Value, key: &str) -> Option<&'v mut Map<String, Value>> {
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }
    let child = root
        .as_object_mut()?
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    child.as_object_mut()
}

/// Builds a [`TokenPatch`] from the current setting values.
pub struct TokenDocumentPatcher<'a> {
    registry: &'a SchemaRegistry,
    tokens: &'a TokenStore,
    origin: Origin,
}

impl<'a> TokenDocumentPatcher<'a> {
    pub fn new(registry: &'a SchemaRegistry, tokens: &'a TokenStore) -> Self {
        Self {
            registry,
            tokens,
            origin: Origin::Theme,
        }
    }

    /// Resolves existing token keys against tokens merged up to `origin`.
    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn patch(&self, mods: &dyn ModStore) -> TokenPatch {
        let mut patch = TokenPatch::default();

        for setting in self.registry.get().settings() {
            let def = setting.definition;
            let Some(binding) = &def.token else {
                continue;
            };
            if def.kind.is_structural() {
                continue;
            }
            let default = self.registry.get_theme_mod_default(&setting.id);
            let current = mods.get(&setting.id, default.clone());
            if same_value(def, &current, &default) {
                continue;
            }
            tracing::trace!(id = %setting.id, "patching overridden token");

            match binding {
                TokenBinding::Palette { slug } => {
                    patch.palette.insert(
                        slug.clone(),
                        PaletteEntryPatch {
                            slug: slug.clone(),
                            color: as_string(&current),
                            name: def.label.clone(),
                        },
                    );
                }
                TokenBinding::Custom { group, slug } => {
                    let key = self.custom_key(group, slug);
                    patch.set_custom(&["color", group.as_str(), key.as_str()], current);
                }
                TokenBinding::Font { category, property } => {
                    let value = self.font_value(*property, &current);
                    let key = self.font_key(category, *property);
                    patch.set_custom(&["font", category.as_str(), key.as_str()], value);
                }
            }
        }

        patch
    }

    /// The key under `custom.color.{group}` whose slug is `slug`.
    fn custom_key(&self, group: &str, slug: &str) -> String {
        let query =
            TokenQuery::new(TokenPath::parse("custom.color").child(group)).origin(self.origin);
        self.tokens
            .map(&query)
            .into_keys()
            .find(|key| to_kebab(key) == slug)
            .unwrap_or_else(|| slug.to_string())
    }

    /// The key under `custom.font.{category}` holding `property`, spelled
    /// the way the document spells it.
    fn font_key(&self, category: &str, property: FontProperty) -> String {
        let wanted = to_snake(property.token_key());
        let query =
            TokenQuery::new(TokenPath::parse("custom.font").child(category)).origin(self.origin);
        self.tokens
            .map(&query)
            .into_keys()
            .find(|key| to_snake(key) == wanted)
            .unwrap_or_else(|| property.token_key().to_string())
    }

    fn font_value(&self, property: FontProperty, current: &Value) -> Value {
        match property {
            FontProperty::Weight | FontProperty::LineHeight => raw_number(current),
            FontProperty::Family => Value::String(self.tokens.var_reference(
                &TokenPath::parse("typography.fontFamilies"),
                &as_string(current),
            )),
            FontProperty::Size => Value::String(self.tokens.var_reference(
                &TokenPath::parse("typography.fontSizes"),
                &as_string(current),
            )),
        }
    }
}

/// Numeric strings become numbers; other values pass through.
fn raw_number(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                Value::from(n)
            } else if let Some(n) = s.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else {
                value.clone()
            }
        }
        _ => value.clone(),
    }
}
