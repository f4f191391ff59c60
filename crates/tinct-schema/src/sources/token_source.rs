//! Settings derived from the design-token document.
//!
//! Two groups are generated:
//!
//! - `colors`: one color setting per palette entry (`palette_{slug}`) and per
//!   leaf of each `custom.color.{group}` subtree (`{group}_{slug}`), each
//!   subgroup framed by a heading and a reset button
//! - `typography`: family, weight, line height and size per font category
//!   found under `custom.font` (`{category}_{property}`)
//!
//! Every generated setting records its subgroup. Keys that would collide
//! (a palette slug named `reset`, a `custom.color.palette` subtree) are
//! renamed with a numeric suffix and logged.
//!
//! Every generated default runs through the default chain with the token
//! value, so the schema carries the design's own values as defaults.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;
use tinct_tokens::{humanize, to_snake, Origin, TokenPath, TokenQuery, TokenStore};

use super::SchemaSource;
use crate::defaults::DefaultChain;
use crate::error::SchemaError;
use crate::types::{
    FontProperty, InputAttrs, ResetTarget, SettingDefinition, SettingType, SettingsGroup,
    SettingsSchema, TokenBinding, Transport,
};

/// Font weight choices offered for every category.
pub const FONT_WEIGHTS: &[(&str, &str)] = &[
    ("100", "Thin"),
    ("200", "Extra light"),
    ("300", "Light"),
    ("400", "Regular"),
    ("500", "Medium"),
    ("600", "Semi bold"),
    ("700", "Bold"),
    ("800", "Extra bold"),
    ("900", "Black"),
];

const COLORS_GROUP: &str = "colors";
const PALETTE_SUBGROUP: &str = "palette";
const TYPOGRAPHY_GROUP: &str = "typography";

/// Generates the `colors` and `typography` groups from a [`TokenStore`].
#[derive(Debug, Clone)]
pub struct TokenSchemaSource {
    origin: Origin,
    font_categories: Option<Vec<String>>,
    colors_section: Option<String>,
}

impl Default for TokenSchemaSource {
    fn default() -> Self {
        Self {
            origin: Origin::Theme,
            font_categories: None,
            colors_section: Some(COLORS_GROUP.to_string()),
        }
    }
}

impl TokenSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads tokens merged up to `origin` (theme by default).
    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Restricts typography settings to these categories, in this order.
    ///
    /// Without it, every object key under `custom.font` is a category.
    pub fn font_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.font_categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// The host section colors are placed in. `None` gives the group its
    /// own namespaced section.
    pub fn colors_section(mut self, section: Option<String>) -> Self {
        self.colors_section = section;
        self
    }

    /// The generated groups, typed.
    pub fn schema(&self, tokens: &TokenStore) -> SettingsSchema {
        let mut schema = SettingsSchema::new();
        let colors = self.colors_group(tokens);
        if !colors.settings.is_empty() {
            schema = schema.with_group(COLORS_GROUP, colors);
        }
        let typography = self.typography_group(tokens);
        if !typography.settings.is_empty() {
            schema = schema.with_group(TYPOGRAPHY_GROUP, typography);
        }
        schema
    }

    fn query(&self, path: &str) -> TokenQuery {
        TokenQuery::new(path).origin(self.origin)
    }

    fn colors_group(&self, tokens: &TokenStore) -> SettingsGroup {
        let mut group = SettingsGroup::new("Colors").with_priority(20);
        group.section = self.colors_section.clone();
        let mut keys = KeyAllocator::new("setting key");
        let mut subgroups = KeyAllocator::new("color subgroup");

        let palette_path = TokenPath::parse("color.palette");
        let palette = tokens.entries(&self.query("color.palette"));
        if !palette.is_empty() {
            let name = subgroups.claim(PALETTE_SUBGROUP.to_string());
            let mut subgroup = Subgroup::open(name, "Palette".to_string(), &mut keys);
            for entry in &palette {
                let label = entry.label_or_slug();
                let def = color_setting(&label, entry.value.clone())
                    .with_css_var(tokens.css_var_from_slug(&palette_path, &entry.slug))
                    .with_token(TokenBinding::Palette {
                        slug: entry.slug.clone(),
                    });
                subgroup.push(&mut keys, &to_snake(&entry.slug), def);
            }
            group = subgroup.close(group, COLORS_GROUP, "Reset palette".to_string());
        }

        for (name, node) in tokens.map(&self.query("custom.color")) {
            let snake = to_snake(&name);
            let entries = tinct_tokens::entry::as_entries(&node);
            if snake.is_empty() || entries.is_empty() {
                continue;
            }
            let path = TokenPath::parse("custom.color").child(name.clone());
            let title = humanize(&name);
            let mut subgroup = Subgroup::open(subgroups.claim(snake), title.clone(), &mut keys);
            for entry in entries {
                let label = format!("{} {}", title, entry.label_or_slug().to_lowercase());
                let def = color_setting(&label, entry.value.clone())
                    .with_css_var(tokens.css_var_from_slug(&path, &entry.slug))
                    .with_token(TokenBinding::Custom {
                        group: name.clone(),
                        slug: entry.slug.clone(),
                    });
                subgroup.push(&mut keys, &to_snake(&entry.slug), def);
            }
            group = subgroup.close(group, COLORS_GROUP, format!("Reset {}", title.to_lowercase()));
        }

        group
    }

    fn categories(&self, tokens: &TokenStore) -> Vec<String> {
        match &self.font_categories {
            Some(categories) => categories.clone(),
            None => tokens
                .map(&self.query("custom.font"))
                .into_iter()
                .filter(|(_, node)| node.is_object())
                .map(|(name, _)| name)
                .collect(),
        }
    }

    fn typography_group(&self, tokens: &TokenStore) -> SettingsGroup {
        let mut group = SettingsGroup::new("Typography").with_priority(25);
        let families = tokens.choices(&self.query("typography.fontFamilies"));
        let sizes = tokens.choices(&self.query("typography.fontSizes"));
        let weights: IndexMap<String, String> = FONT_WEIGHTS
            .iter()
            .map(|(k, l)| (k.to_string(), l.to_string()))
            .collect();

        let mut keys = KeyAllocator::new("setting key");
        let mut subgroups = KeyAllocator::new("font category");

        for category in self.categories(tokens) {
            let snake = to_snake(&category);
            if snake.is_empty() {
                continue;
            }
            let title = humanize(&category);
            let node = self.query("custom.font").child(category.clone());
            let path = TokenPath::parse("custom.font").child(category.clone());
            tracing::trace!(category = %category, "deriving typography settings");

            let mut subgroup = Subgroup::open(subgroups.claim(snake), title.clone(), &mut keys);

            for property in FontProperty::ALL {
                let token = tokens.raw(&node.child(property.token_key()));
                let label = format!("{} {}", title, property_label(property));
                let def = match property {
                    FontProperty::Family | FontProperty::Size => {
                        let choices = if property == FontProperty::Family {
                            &families
                        } else {
                            &sizes
                        };
                        let slug = tokens.slug_from_css_var(&tinct_tokens::entry::as_string(&token));
                        let default = DefaultChain::new(SettingType::Select)
                            .choices(choices)
                            .token_value(slug)
                            .resolve()
                            .value;
                        SettingDefinition::new(SettingType::Select, label)
                            .with_choices(choices.clone())
                            .with_default(default)
                    }
                    FontProperty::Weight => {
                        let default = DefaultChain::new(SettingType::Select)
                            .choices(&weights)
                            .token_value(tinct_tokens::entry::as_string(&token))
                            .resolve()
                            .value;
                        SettingDefinition::new(SettingType::Select, label)
                            .with_choices(weights.clone())
                            .with_default(default)
                    }
                    FontProperty::LineHeight => {
                        let default = DefaultChain::new(SettingType::Number)
                            .token_value(numeric(token))
                            .resolve()
                            .value;
                        SettingDefinition::new(SettingType::Number, label)
                            .with_input_attrs(InputAttrs::new(1.0, 3.0, 0.1))
                            .with_default(default)
                    }
                };
                let def = def
                    .with_transport(Transport::PostMessage)
                    .with_css_var(tokens.css_var_from_slug(&path, property.token_key()))
                    .with_token(TokenBinding::Font {
                        category: category.clone(),
                        property,
                    });
                subgroup.push(&mut keys, property.key_suffix(), def);
            }

            group = subgroup.close(
                group,
                TYPOGRAPHY_GROUP,
                format!("Reset {} fonts", title.to_lowercase()),
            );
        }

        group
    }
}

impl SchemaSource for TokenSchemaSource {
    fn name(&self) -> &str {
        "tokens"
    }

    fn collect(&self, tokens: &TokenStore) -> Result<Value, SchemaError> {
        let schema = self.schema(tokens);
        tracing::debug!(settings = schema.len(), "derived settings from tokens");
        serde_json::to_value(&schema).map_err(|e| SchemaError::parse(self.name(), e))
    }
}

/// Hands out keys within one namespace, never the same one twice.
///
/// A taken key is renamed to the first free `{key}_{n}`, so every token
/// leaf keeps exactly one setting even when slugs collide after snake
/// casing or with the structural `heading`/`reset` entries.
struct KeyAllocator {
    what: &'static str,
    taken: HashSet<String>,
}

impl KeyAllocator {
    fn new(what: &'static str) -> Self {
        Self {
            what,
            taken: HashSet::new(),
        }
    }

    fn claim(&mut self, key: String) -> String {
        if self.taken.insert(key.clone()) {
            return key;
        }
        let renamed = (2..)
            .map(|n| format!("{}_{}", key, n))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_default();
        tracing::warn!(
            kind = self.what,
            key = %key,
            renamed = %renamed,
            "generated name collides, renamed"
        );
        self.taken.insert(renamed.clone());
        renamed
    }
}

/// A heading, its member settings and a reset button addressing them.
struct Subgroup {
    name: String,
    title: String,
    heading: String,
    reset: String,
    members: Vec<(String, SettingDefinition)>,
}

impl Subgroup {
    /// Claims the structural keys first so a leaf slug can never take them.
    fn open(name: String, title: String, keys: &mut KeyAllocator) -> Self {
        let heading = keys.claim(format!("{}_heading", name));
        let reset = keys.claim(format!("{}_reset", name));
        Self {
            name,
            title,
            heading,
            reset,
            members: Vec::new(),
        }
    }

    fn push(&mut self, keys: &mut KeyAllocator, suffix: &str, def: SettingDefinition) {
        let key = keys.claim(format!("{}_{}", self.name, suffix));
        self.members.push((key, def));
    }

    fn close(self, group: SettingsGroup, category: &str, reset_label: String) -> SettingsGroup {
        let mut group = group.with_setting(
            self.heading,
            SettingDefinition::new(SettingType::Subheading, self.title).in_subgroup(&self.name),
        );
        for (key, def) in self.members {
            group = group.with_setting(key, def.in_subgroup(&self.name));
        }
        group.with_setting(
            self.reset,
            reset_button(&reset_label, category, &self.name).in_subgroup(&self.name),
        )
    }
}

fn color_setting(label: &str, token_value: Value) -> SettingDefinition {
    let default = DefaultChain::new(SettingType::Color)
        .token_value(token_value)
        .resolve()
        .value;
    SettingDefinition::new(SettingType::Color, label)
        .with_default(default)
        .with_transport(Transport::PostMessage)
}

fn reset_button(label: &str, category: &str, kind: &str) -> SettingDefinition {
    SettingDefinition::new(SettingType::Button, label).with_reset(ResetTarget::new(category, kind))
}

fn property_label(property: FontProperty) -> &'static str {
    match property {
        FontProperty::Family => "font family",
        FontProperty::Weight => "font weight",
        FontProperty::LineHeight => "line height",
        FontProperty::Size => "font size",
    }
}

/// Numeric strings (`"1.6"`) become numbers; anything else passes through.
fn numeric(value: Value) -> Value {
    match &value {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(value),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tinct_tokens::MemoryTokenSource;

    fn tokens() -> TokenStore {
        TokenStore::new(MemoryTokenSource::new().with_layer(
            Origin::Theme,
            json!({
                "settings": {
                    "color": {"palette": [
                        {"slug": "primary", "color": "#336699", "name": "Primary"},
                        {"slug": "accent-2", "color": "#ff8800"}
                    ]},
                    "typography": {
                        "fontFamilies": [
                            {"slug": "serif", "fontFamily": "Georgia, serif", "name": "Serif"},
                            {"slug": "sans", "fontFamily": "Inter, sans-serif", "name": "Sans"}
                        ],
                        "fontSizes": [
                            {"slug": "small", "size": "0.875rem", "name": "Small"},
                            {"slug": "medium", "size": "1rem", "name": "Medium"}
                        ]
                    },
                    "custom": {
                        "color": {"header": {"background": "#ffffff", "text": "#111111"}},
                        "font": {
                            "body": {
                                "family": "var(--wp--preset--font-family--serif)",
                                "weight": 400,
                                "line-height": "1.6",
                                "size": "var(--wp--preset--font-size--medium)"
                            },
                            "heading": {"weight": 700}
                        }
                    }
                }
            }),
        ))
    }

    #[test]
    fn palette_settings() {
        let schema = TokenSchemaSource::new().schema(&tokens());
        let colors = schema.group("colors").unwrap();
        assert_eq!(colors.section.as_deref(), Some("colors"));

        let primary = schema.lookup("colors_palette_primary").unwrap();
        assert_eq!(primary.kind, SettingType::Color);
        assert_eq!(primary.default, Some(json!("#336699")));
        assert_eq!(primary.css_var.as_deref(), Some("--wp--preset--color--primary"));
        assert_eq!(primary.transport, Transport::PostMessage);

        let accent = schema.lookup("colors_palette_accent_2").unwrap();
        assert_eq!(accent.label, "Accent 2");
        assert_eq!(
            accent.token,
            Some(TokenBinding::Palette {
                slug: "accent-2".into()
            })
        );

        let reset = schema.lookup("colors_palette_reset").unwrap();
        assert_eq!(reset.reset, Some(ResetTarget::new("colors", "palette")));
    }

    #[test]
    fn custom_color_settings() {
        let schema = TokenSchemaSource::new().schema(&tokens());
        let bg = schema.lookup("colors_header_background").unwrap();
        assert_eq!(bg.default, Some(json!("#ffffff")));
        assert_eq!(
            bg.css_var.as_deref(),
            Some("--wp--custom--color--header--background")
        );
        assert_eq!(
            schema.lookup("colors_header_heading").unwrap().kind,
            SettingType::Subheading
        );
    }

    #[test]
    fn font_settings_resolve_slugs_and_numbers() {
        let schema = TokenSchemaSource::new().schema(&tokens());

        let family = schema.lookup("typography_body_family").unwrap();
        assert_eq!(family.default, Some(json!("serif")));
        assert_eq!(family.choices.len(), 2);
        assert_eq!(
            family.css_var.as_deref(),
            Some("--wp--custom--font--body--family")
        );

        assert_eq!(
            schema.lookup("typography_body_weight").unwrap().default,
            Some(json!("400"))
        );
        assert_eq!(
            schema.lookup("typography_body_line_height").unwrap().default,
            Some(json!(1.6))
        );
        assert_eq!(
            schema.lookup("typography_body_size").unwrap().default,
            Some(json!("medium"))
        );
    }

    #[test]
    fn missing_font_tokens_use_fallbacks() {
        let schema = TokenSchemaSource::new().schema(&tokens());
        let family = schema.lookup("typography_heading_family").unwrap();
        assert_eq!(family.default, Some(json!("serif")));
        let line_height = schema.lookup("typography_heading_line_height").unwrap();
        assert_eq!(line_height.default, Some(json!(0)));
    }

    #[test]
    fn explicit_categories_restrict_output() {
        let schema = TokenSchemaSource::new()
            .font_categories(["heading"])
            .schema(&tokens());
        assert!(schema.lookup("typography_body_family").is_none());
        assert!(schema.lookup("typography_heading_weight").is_some());
    }

    #[test]
    fn generated_settings_record_their_subgroup() {
        let schema = TokenSchemaSource::new().schema(&tokens());
        for id in ["colors_palette_heading", "colors_palette_primary", "colors_palette_reset"] {
            assert_eq!(
                schema.lookup(id).unwrap().subgroup.as_deref(),
                Some("palette"),
                "{id}"
            );
        }
        assert_eq!(
            schema.lookup("typography_body_size").unwrap().subgroup.as_deref(),
            Some("body")
        );
    }

    #[test]
    fn colliding_slugs_keep_one_setting_per_token() {
        let store = TokenStore::new(MemoryTokenSource::new().with_layer(
            Origin::Theme,
            json!({
                "settings": {
                    "color": {"palette": [
                        {"slug": "primary", "color": "#336699"},
                        {"slug": "reset", "color": "#000000"}
                    ]},
                    "custom": {"color": {"palette": {"primary": "#ff0000"}}}
                }
            }),
        ));
        let schema = TokenSchemaSource::new().schema(&store);

        let reset = schema.lookup("colors_palette_reset").unwrap();
        assert_eq!(reset.kind, SettingType::Button);
        assert_eq!(reset.reset, Some(ResetTarget::new("colors", "palette")));

        let reset_color = schema.lookup("colors_palette_reset_2").unwrap();
        assert_eq!(reset_color.kind, SettingType::Color);
        assert_eq!(
            reset_color.token,
            Some(TokenBinding::Palette {
                slug: "reset".into()
            })
        );

        assert_eq!(
            schema.lookup("colors_palette_primary").unwrap().token,
            Some(TokenBinding::Palette {
                slug: "primary".into()
            })
        );
        let custom = schema.lookup("colors_palette_2_primary").unwrap();
        assert_eq!(
            custom.token,
            Some(TokenBinding::Custom {
                group: "palette".into(),
                slug: "primary".into()
            })
        );
        assert_eq!(custom.subgroup.as_deref(), Some("palette_2"));
        assert_eq!(
            schema.lookup("colors_palette_2_reset").unwrap().reset,
            Some(ResetTarget::new("colors", "palette_2"))
        );
    }

    #[test]
    fn sibling_subgroups_stay_apart() {
        let store = TokenStore::new(MemoryTokenSource::new().with_layer(
            Origin::Theme,
            json!({
                "settings": {"custom": {"color": {
                    "header": {"text": "#111111"},
                    "headerTop": {"text": "#222222"}
                }}}
            }),
        ));
        let schema = TokenSchemaSource::new().schema(&store);
        let members = |kind: &str| -> Vec<String> {
            schema
                .subgroup_members(&ResetTarget::new("colors", kind))
                .filter(|s| !s.definition.kind.is_structural())
                .map(|s| s.id)
                .collect()
        };
        assert_eq!(members("header"), vec!["colors_header_text"]);
        assert_eq!(members("header_top"), vec!["colors_header_top_text"]);
    }

    #[test]
    fn empty_tokens_produce_no_groups() {
        let schema = TokenSchemaSource::new().schema(&TokenStore::new(MemoryTokenSource::new()));
        assert!(schema.is_empty());
    }
}
