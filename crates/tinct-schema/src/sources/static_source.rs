//! Hand-authored settings table.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde_json::Value;
use tinct_tokens::TokenStore;

use super::SchemaSource;
use crate::error::SchemaError;

/// The built-in settings table, embedded at compile time.
pub const BUILTIN_SETTINGS_YAML: &str = include_str!("../../assets/settings.yaml");

static BUILTIN: Lazy<Result<Value, String>> =
    Lazy::new(|| serde_yaml::from_str(BUILTIN_SETTINGS_YAML).map_err(|e| e.to_string()));

/// Settings declared in YAML rather than derived from tokens.
///
/// # Example
///
/// ```rust
/// use tinct_schema::{SchemaSource, StaticSchemaSource};
/// use tinct_tokens::{MemoryTokenSource, TokenStore};
///
/// let source = StaticSchemaSource::from_yaml("inline", r#"
/// header:
///   title: Header
///   settings:
///     sticky: { type: checkbox, label: Sticky, default: true }
/// "#).unwrap();
///
/// let doc = source.collect(&TokenStore::new(MemoryTokenSource::new())).unwrap();
/// assert_eq!(doc["header"]["settings"]["sticky"]["default"], true);
/// ```
#[derive(Debug, Clone)]
pub struct StaticSchemaSource {
    name: String,
    document: Value,
}

impl StaticSchemaSource {
    /// The embedded table.
    pub fn builtin() -> Result<Self, SchemaError> {
        match &*BUILTIN {
            Ok(document) => Ok(Self {
                name: "builtin".to_string(),
                document: document.clone(),
            }),
            Err(message) => Err(SchemaError::parse("builtin settings", message)),
        }
    }

    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, SchemaError> {
        let name = name.into();
        if yaml.trim().is_empty() {
            return Self::from_value(name, Value::Null);
        }
        let document: Value =
            serde_yaml::from_str(yaml).map_err(|e| SchemaError::parse(name.as_str(), e))?;
        Self::from_value(name, document)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path.display().to_string(), &content)
    }

    /// Wraps an already-parsed document. An empty document is an empty table.
    pub fn from_value(name: impl Into<String>, document: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let document = match document {
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => document,
            _ => return Err(SchemaError::parse(name, "expected a mapping of groups")),
        };
        Ok(Self { name, document })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl SchemaSource for StaticSchemaSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self, _tokens: &TokenStore) -> Result<Value, SchemaError> {
        Ok(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SettingType, SettingsSchema};

    #[test]
    fn builtin_table_parses() {
        let source = StaticSchemaSource::builtin().unwrap();
        let schema: SettingsSchema = serde_json::from_value(source.document().clone()).unwrap();

        let view = schema.lookup("display_archive_view").unwrap();
        assert_eq!(view.kind, SettingType::Radio);
        assert_eq!(view.choices.keys().next().map(String::as_str), Some("excerpt"));

        assert!(schema.group("site").unwrap().default_only);
        assert_eq!(
            schema.group("identity").unwrap().section.as_deref(),
            Some("title_tagline")
        );
        assert!(schema.groups().keys().all(|g| !g.contains('_')));
    }

    #[test]
    fn rejects_non_mapping() {
        let err = StaticSchemaSource::from_yaml("list", "- a\n- b\n").unwrap_err();
        assert!(matches!(err, SchemaError::Parse { .. }));
    }

    #[test]
    fn empty_yaml_is_empty_table() {
        let source = StaticSchemaSource::from_yaml("empty", "").unwrap();
        assert_eq!(source.document().as_object().map(|m| m.len()), Some(0));
    }

    #[test]
    fn from_file_reports_path() {
        let err = StaticSchemaSource::from_file("/nonexistent/settings.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/settings.yaml"));
    }
}
