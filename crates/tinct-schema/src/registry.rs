//! The schema registry.
//!
//! A [`SchemaRegistry`] is built once from its sources and then read by every
//! consumer: the binder, the patcher, templating code and the preview layer.
//! It is an ordinary value owned by the caller, not a process-wide global.

use indexmap::IndexMap;
use serde_json::Value;
use tinct_tokens::{deep_merge_into, TokenStore};

use crate::defaults::resolve_default;
use crate::error::SchemaError;
use crate::sources::SchemaSource;
use crate::store::ModStore;
use crate::types::{SettingDefinition, SettingsSchema};

/// Merged, cached settings schema.
///
/// # Merge policy
///
/// The first [`set_raw`](Self::set_raw) replaces the cache. Later calls
/// deep-merge into it: distinct keys are united, colliding scalars take the
/// later value, and colliding mappings merge recursively.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_schema::{MemoryModStore, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// registry.set_raw(json!({"display": {"settings": {
///     "archive_view": {"type": "radio", "default": "excerpt",
///                      "choices": {"excerpt": "Excerpt", "full": "Full"}}
/// }}})).unwrap();
///
/// let mods = MemoryModStore::new();
/// assert_eq!(registry.get_theme_mod("display_archive_view", &mods), json!("excerpt"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    raw: Option<Value>,
    schema: SettingsSchema,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry by collecting and merging every source in order.
    pub fn build(tokens: &TokenStore, sources: &[&dyn SchemaSource]) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for source in sources {
            registry.add_source(*source, tokens)?;
        }
        Ok(registry)
    }

    /// Collects `source` and merges its document.
    pub fn add_source(
        &mut self,
        source: &dyn SchemaSource,
        tokens: &TokenStore,
    ) -> Result<(), SchemaError> {
        let document = source.collect(tokens)?;
        tracing::debug!(source = source.name(), "merging schema source");
        self.set_raw(document)
    }

    /// Merges a raw schema document.
    ///
    /// The cache is only updated when the merged document parses; on error
    /// the previous schema is kept.
    pub fn set_raw(&mut self, document: Value) -> Result<(), SchemaError> {
        let merged = match &self.raw {
            None => document,
            Some(current) => {
                let mut merged = current.clone();
                deep_merge_into(&mut merged, document);
                merged
            }
        };

        let schema = match parse_schema(&merged) {
            Ok(schema) => schema,
            Err(e) => {
                tracing::warn!(error = %e, "rejected settings schema merge");
                return Err(e);
            }
        };
        self.raw = Some(merged);
        self.schema = schema;
        Ok(())
    }

    /// Merges a typed schema.
    pub fn set(&mut self, schema: &SettingsSchema) -> Result<(), SchemaError> {
        let document =
            serde_json::to_value(schema).map_err(|e| SchemaError::parse("schema", e))?;
        self.set_raw(document)
    }

    pub fn is_initialized(&self) -> bool {
        self.raw.is_some()
    }

    /// The merged schema.
    ///
    /// Reading before anything was set logs a warning and yields an empty
    /// schema, so every lookup falls back to `null`.
    pub fn get(&self) -> &SettingsSchema {
        if self.raw.is_none() {
            tracing::warn!("settings schema read before it was initialized");
        }
        &self.schema
    }

    /// The merged document as the sources declared it.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    /// Drops the cache; the next `set_raw` replaces again.
    pub fn reset(&mut self) {
        self.raw = None;
        self.schema = SettingsSchema::default();
    }

    /// Looks up a setting by id.
    pub fn definition(&self, id: &str) -> Option<&SettingDefinition> {
        self.get().lookup(id)
    }

    /// The schema default for `id`, or `null` for unknown ids.
    pub fn get_theme_mod_default(&self, id: &str) -> Value {
        match self.definition(id) {
            Some(def) => resolve_default(def),
            None => {
                tracing::debug!(id, "no schema default for unknown setting");
                Value::Null
            }
        }
    }

    /// The stored value for `id`, falling back to its schema default.
    pub fn get_theme_mod(&self, id: &str, mods: &dyn ModStore) -> Value {
        mods.get(id, self.get_theme_mod_default(id))
    }

    /// Every value-holding setting with its resolved default.
    pub fn defaults(&self) -> IndexMap<String, Value> {
        self.get()
            .settings()
            .filter(|s| !s.definition.kind.is_structural())
            .map(|s| {
                let value = resolve_default(s.definition);
                (s.id, value)
            })
            .collect()
    }
}

fn parse_schema(document: &Value) -> Result<SettingsSchema, SchemaError> {
    let schema: SettingsSchema = serde_json::from_value(document.clone())
        .map_err(|e| SchemaError::parse("merged schema", e))?;
    if let Some(name) = schema.groups().keys().find(|name| name.contains('_')) {
        return Err(SchemaError::InvalidGroupName(name.clone()));
    }
    Ok(schema)
}
