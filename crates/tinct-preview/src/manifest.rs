//! The preview manifest: bindings, rules and behaviours in one document.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tinct_schema::{FontProperty, SettingsSchema, TokenBinding};
use tinct_tokens::{TokenPath, TokenStore};

use crate::behaviour::BehaviourSpec;
use crate::binding::{Binding, BindingKind};
use crate::error::PreviewError;
use crate::rules::DependencyRule;

/// The built-in manifest, embedded at compile time.
pub const BUILTIN_PREVIEW_YAML: &str = include_str!("../assets/preview.yaml");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewManifest {
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default)]
    pub rules: Vec<DependencyRule>,
    #[serde(default)]
    pub behaviours: Vec<BehaviourSpec>,
}

impl PreviewManifest {
    pub fn builtin() -> Result<Self, PreviewError> {
        Self::from_yaml("builtin preview manifest", BUILTIN_PREVIEW_YAML)
    }

    pub fn from_yaml(location: &str, yaml: &str) -> Result<Self, PreviewError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| PreviewError::manifest(location, e))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreviewError> {
        let path = path.as_ref();
        let location = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| PreviewError::manifest(location.as_str(), e))?;
        Self::from_yaml(&location, &content)
    }

    /// Appends bindings for every token-derived setting in `schema`.
    pub fn with_token_bindings(mut self, schema: &SettingsSchema, tokens: &TokenStore) -> Self {
        self.bindings.extend(token_bindings(schema, tokens));
        self
    }
}

/// Bindings for settings derived from tokens.
///
/// Colors, weights and line heights write their value to the setting's CSS
/// variable on `:root`. Font families and sizes store a slug, which is looked
/// up against the preset collection and written as a `var(...)` reference.
pub fn token_bindings(schema: &SettingsSchema, tokens: &TokenStore) -> Vec<Binding> {
    schema
        .settings()
        .filter_map(|setting| {
            let def = setting.definition;
            let name = def.css_var.clone()?;
            let kind = match def.token.as_ref()? {
                TokenBinding::Font { property, .. } if property.stores_slug() => {
                    let collection = match property {
                        FontProperty::Family => "typography.fontFamilies",
                        _ => "typography.fontSizes",
                    };
                    let path = TokenPath::parse(collection);
                    let table: IndexMap<String, String> = def
                        .choices
                        .keys()
                        .map(|slug| (slug.clone(), tokens.var_reference(&path, slug)))
                        .collect();
                    BindingKind::SlugVar { name, table }
                }
                _ => BindingKind::CssVar {
                    name,
                    prefix: String::new(),
                    suffix: String::new(),
                },
            };
            Some(Binding::new(setting.id, ":root", kind))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;
    use serde_json::json;
    use tinct_schema::TokenSchemaSource;
    use tinct_tokens::{MemoryTokenSource, Origin};

    #[test]
    fn builtin_manifest_parses() {
        let manifest = PreviewManifest::builtin().unwrap();
        assert_eq!(manifest.rules.len(), 3);
        assert_eq!(manifest.behaviours[0].name, "masonry");
        assert_eq!(
            manifest.rules[1].when,
            Predicate::NotEquals(json!("list"))
        );
    }

    #[test]
    fn token_settings_get_bindings() {
        let tokens = TokenStore::new(MemoryTokenSource::new().with_layer(
            Origin::Theme,
            json!({
                "color": {"palette": [{"slug": "primary", "color": "#336699"}]},
                "typography": {"fontFamilies": [
                    {"slug": "serif", "fontFamily": "Georgia, serif"}
                ]},
                "custom": {"font": {"body": {"weight": 400}}}
            }),
        ));
        let schema = TokenSchemaSource::new().schema(&tokens);
        let bindings = token_bindings(&schema, &tokens);

        let primary = bindings
            .iter()
            .find(|b| b.setting == "colors_palette_primary")
            .unwrap();
        assert_eq!(
            primary.kind,
            BindingKind::CssVar {
                name: "--wp--preset--color--primary".into(),
                prefix: String::new(),
                suffix: String::new()
            }
        );

        let family = bindings
            .iter()
            .find(|b| b.setting == "typography_body_family")
            .unwrap();
        match &family.kind {
            BindingKind::SlugVar { name, table } => {
                assert_eq!(name, "--wp--custom--font--body--family");
                assert_eq!(table["serif"], "var(--wp--preset--font-family--serif)");
            }
            other => panic!("unexpected binding {:?}", other),
        }

        assert!(bindings.iter().all(|b| !b.setting.ends_with("_heading")));
    }
}
