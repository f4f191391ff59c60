//! Reads and sanitized writes of setting instances.

use indexmap::IndexMap;
use serde_json::Value;
use tinct_schema::{ModStore, SchemaRegistry, SettingDefinition};

use crate::error::CustomizeError;
use crate::sanitize::{same_value, Sanitizer};

/// The only path through which setting instances are written.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_customize::SettingsAccessor;
/// use tinct_schema::{MemoryModStore, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// registry.set_raw(json!({"display": {"settings": {"archive_view": {
///     "type": "radio", "default": "excerpt",
///     "choices": {"excerpt": "Excerpt", "full": "Full text"}
/// }}}})).unwrap();
///
/// let mods = MemoryModStore::new();
/// let settings = SettingsAccessor::new(&registry, &mods);
/// assert_eq!(settings.set("display_archive_view", json!("bogus")).unwrap(), json!("excerpt"));
/// ```
pub struct SettingsAccessor<'a> {
    registry: &'a SchemaRegistry,
    store: &'a dyn ModStore,
}

impl<'a> SettingsAccessor<'a> {
    pub fn new(registry: &'a SchemaRegistry, store: &'a dyn ModStore) -> Self {
        Self { registry, store }
    }

    /// The stored value, or the schema default.
    pub fn get(&self, id: &str) -> Value {
        self.registry.get_theme_mod(id, self.store)
    }

    /// Sanitizes and stores `value`, returning what was stored.
    pub fn set(&self, id: &str, value: Value) -> Result<Value, CustomizeError> {
        let (def, sanitizer) = self.writable(id)?;
        let clean = sanitizer.sanitize(&value, def);
        if clean != value {
            tracing::debug!(id, sanitizer = sanitizer.name(), "corrected setting value");
        }
        self.store.set(id, clean.clone())?;
        Ok(clean)
    }

    /// Removes the override, so reads return the default again.
    pub fn reset(&self, id: &str) -> Result<(), CustomizeError> {
        self.writable(id)?;
        self.store.remove(id)?;
        Ok(())
    }

    /// Whether a stored value differs from the default once both are
    /// sanitized.
    pub fn is_overridden(&self, id: &str) -> bool {
        let Some(value) = self.store.get_raw(id) else {
            return false;
        };
        let default = self.registry.get_theme_mod_default(id);
        match self.registry.definition(id) {
            Some(def) => !same_value(def, &value, &default),
            None => value != default,
        }
    }

    /// Every value-holding setting with a stored value, in schema order.
    pub fn overrides(&self) -> IndexMap<String, Value> {
        self.registry
            .get()
            .settings()
            .filter(|s| !s.definition.kind.is_structural())
            .filter_map(|s| {
                let value = self.store.get_raw(&s.id)?;
                Some((s.id, value))
            })
            .collect()
    }

    fn writable(&self, id: &str) -> Result<(&'a SettingDefinition, Sanitizer), CustomizeError> {
        let def = self
            .registry
            .definition(id)
            .ok_or_else(|| CustomizeError::UnknownSetting(id.to_string()))?;
        let sanitizer = Sanitizer::for_type(def.kind).ok_or(CustomizeError::NotPersisted {
            id: id.to_string(),
            kind: def.kind,
        })?;
        Ok((def, sanitizer))
    }
}
