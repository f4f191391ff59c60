//! Settings schema types.
//!
//! A [`SettingsSchema`] maps group names to [`SettingsGroup`]s, each holding
//! [`SettingDefinition`]s by key. The persisted id of a setting is
//! `"{group}_{key}"`, which is why group names never contain `_`.
//!
//! The same types deserialize from the YAML settings table:
//!
//! ```yaml
//! display:
//!   title: Display
//!   priority: 50
//!   settings:
//!     archive_view:
//!       type: radio
//!       label: Archive view
//!       default: excerpt
//!       choices:
//!         excerpt: Excerpt
//!         full: Full text
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Priority given to groups and settings that declare none.
pub const DEFAULT_PRIORITY: i32 = 10;

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The closed set of setting types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    Checkbox,
    Radio,
    Select,
    Color,
    Number,
    Range,
    Url,
    Email,
    Textarea,
    #[serde(alias = "image", alias = "upload")]
    Media,
    /// Label-only heading; never persisted.
    Subheading,
    /// Action trigger (reset); never persisted.
    Button,
    #[default]
    Text,
}

impl SettingType {
    pub const ALL: [SettingType; 13] = [
        SettingType::Checkbox,
        SettingType::Radio,
        SettingType::Select,
        SettingType::Color,
        SettingType::Number,
        SettingType::Range,
        SettingType::Url,
        SettingType::Email,
        SettingType::Textarea,
        SettingType::Media,
        SettingType::Subheading,
        SettingType::Button,
        SettingType::Text,
    ];

    /// Structural types group or act on other settings and hold no value.
    pub fn is_structural(self) -> bool {
        matches!(self, SettingType::Subheading | SettingType::Button)
    }

    /// Types whose values must be one of the declared choices.
    pub fn has_choices(self) -> bool {
        matches!(self, SettingType::Radio | SettingType::Select)
    }

    /// Types whose values are numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, SettingType::Number | SettingType::Range)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingType::Checkbox => "checkbox",
            SettingType::Radio => "radio",
            SettingType::Select => "select",
            SettingType::Color => "color",
            SettingType::Number => "number",
            SettingType::Range => "range",
            SettingType::Url => "url",
            SettingType::Email => "email",
            SettingType::Textarea => "textarea",
            SettingType::Media => "media",
            SettingType::Subheading => "subheading",
            SettingType::Button => "button",
            SettingType::Text => "text",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric input constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl InputAttrs {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.step.is_none()
    }
}

/// A server-side re-render region tied to a setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRefresh {
    pub selector: String,
    pub render_callback: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container_inclusive: bool,
}

/// How the host propagates a changed value to the preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Full preview reload.
    #[default]
    Refresh,
    /// Value posted to the preview, applied by the binding client.
    PostMessage,
}

/// A font property exposed as a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontProperty {
    Family,
    Weight,
    LineHeight,
    Size,
}

impl FontProperty {
    pub const ALL: [FontProperty; 4] = [
        FontProperty::Family,
        FontProperty::Weight,
        FontProperty::LineHeight,
        FontProperty::Size,
    ];

    /// The key used inside `custom.font.{category}`.
    pub fn token_key(self) -> &'static str {
        match self {
            FontProperty::Family => "family",
            FontProperty::Weight => "weight",
            FontProperty::LineHeight => "line-height",
            FontProperty::Size => "size",
        }
    }

    /// The suffix used in setting keys.
    pub fn key_suffix(self) -> &'static str {
        match self {
            FontProperty::Family => "family",
            FontProperty::Weight => "weight",
            FontProperty::LineHeight => "line_height",
            FontProperty::Size => "size",
        }
    }

    /// Whether the stored value is a preset slug rather than a raw value.
    pub fn stores_slug(self) -> bool {
        matches!(self, FontProperty::Family | FontProperty::Size)
    }
}

/// Where in the token document a derived setting came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TokenBinding {
    /// An entry of `color.palette`.
    Palette { slug: String },
    /// A leaf of `custom.color.{group}`.
    Custom { group: String, slug: String },
    /// A property of `custom.font.{category}`.
    Font {
        category: String,
        property: FontProperty,
    },
}

/// The `data-category` / `data-type` pair a reset button carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResetTarget {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResetTarget {
    pub fn new(category: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            kind: kind.into(),
        }
    }

    /// Whether a setting in `group`, belonging to `subgroup`, is covered.
    ///
    /// Membership is exact: subgroup `header` does not cover `header_top`.
    pub fn matches(&self, group: &str, subgroup: Option<&str>) -> bool {
        self.category == group && subgroup == Some(self.kind.as_str())
    }
}

/// One user-configurable setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDefinition {
    #[serde(rename = "type", default)]
    pub kind: SettingType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Explicit default. `None` defers to the type fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub choices: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "InputAttrs::is_empty")]
    pub input_attrs: InputAttrs,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<PartialRefresh>,
    /// CSS variable the setting drives, for token-derived settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenBinding>,
    /// Reset target, for `button` settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<ResetTarget>,
    /// The subgroup a reset button addresses this setting by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<String>,
}

impl SettingDefinition {
    pub fn new(kind: SettingType, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            description: String::new(),
            default: None,
            choices: IndexMap::new(),
            input_attrs: InputAttrs::default(),
            priority: DEFAULT_PRIORITY,
            transport: Transport::default(),
            partial: None,
            css_var: None,
            token: None,
            reset: None,
            subgroup: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_choices<K, L, I>(mut self, choices: I) -> Self
    where
        K: Into<String>,
        L: Into<String>,
        I: IntoIterator<Item = (K, L)>,
    {
        self.choices = choices
            .into_iter()
            .map(|(k, l)| (k.into(), l.into()))
            .collect();
        self
    }

    pub fn with_input_attrs(mut self, attrs: InputAttrs) -> Self {
        self.input_attrs = attrs;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_partial(mut self, partial: PartialRefresh) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn with_css_var(mut self, name: impl Into<String>) -> Self {
        self.css_var = Some(name.into());
        self
    }

    pub fn with_token(mut self, token: TokenBinding) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_reset(mut self, target: ResetTarget) -> Self {
        self.reset = Some(target);
        self
    }

    pub fn in_subgroup(mut self, subgroup: impl Into<String>) -> Self {
        self.subgroup = Some(subgroup.into());
        self
    }

    /// The default after the full resolution chain.
    pub fn resolved_default(&self) -> Value {
        crate::defaults::resolve_default(self)
    }
}

/// A named collection of settings shown together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsGroup {
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// A section owned by the host, used instead of a namespaced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Lookup-only group: defaults resolve, but no control is registered.
    #[serde(default, skip_serializing_if = "is_false")]
    pub default_only: bool,
    #[serde(default)]
    pub settings: IndexMap<String, SettingDefinition>,
}

impl SettingsGroup {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: DEFAULT_PRIORITY,
            section: None,
            default_only: false,
            settings: IndexMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn default_only(mut self) -> Self {
        self.default_only = true;
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, def: SettingDefinition) -> Self {
        self.settings.insert(key.into(), def);
        self
    }
}

/// A setting together with its place in the schema.
#[derive(Debug, Clone)]
pub struct SettingRef<'a> {
    /// Persisted id, `"{group}_{key}"`.
    pub id: String,
    pub group_name: &'a str,
    pub group: &'a SettingsGroup,
    pub key: &'a str,
    pub definition: &'a SettingDefinition,
}

impl<'a> SettingRef<'a> {
    /// The subgroup this setting belongs to, if any.
    ///
    /// An explicit `subgroup` wins. Otherwise the longest subgroup declared
    /// in the same group (by a member or by a reset button) that prefixes
    /// the key as `{subgroup}_` is used.
    pub fn subgroup(&self) -> Option<&'a str> {
        let definition: &'a SettingDefinition = self.definition;
        if let Some(subgroup) = definition.subgroup.as_deref() {
            return Some(subgroup);
        }
        let key = self.key;
        let group_name = self.group_name;
        let group: &'a SettingsGroup = self.group;
        group
            .settings
            .values()
            .flat_map(|def| {
                let from_reset = def
                    .reset
                    .as_ref()
                    .filter(|r| r.category == group_name)
                    .map(|r| r.kind.as_str());
                def.subgroup.as_deref().into_iter().chain(from_reset)
            })
            .filter(|kind| {
                key.len() > kind.len() + 1
                    && key.starts_with(kind)
                    && key.as_bytes()[kind.len()] == b'_'
            })
            .max_by_key(|kind| kind.len())
    }
}

/// The merged description of every setting, by group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsSchema {
    groups: IndexMap<String, SettingsGroup>,
}

impl SettingsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: IndexMap<String, SettingsGroup>) -> Self {
        Self { groups }
    }

    pub fn with_group(mut self, name: impl Into<String>, group: SettingsGroup) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &IndexMap<String, SettingsGroup> {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&SettingsGroup> {
        self.groups.get(name)
    }

    pub fn definition(&self, group: &str, key: &str) -> Option<&SettingDefinition> {
        self.groups.get(group)?.settings.get(key)
    }

    /// Number of settings across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.settings.len()).sum()
    }

    /// Splits a setting id into `(group, key)`.
    ///
    /// The longest declared group name that prefixes the id wins, so ids
    /// stay unambiguous even when keys themselves contain `_`.
    pub fn split_key<'a>(&self, id: &'a str) -> Option<(&'a str, &'a str)> {
        self.groups
            .keys()
            .filter(|group| {
                id.len() > group.len() + 1
                    && id.starts_with(group.as_str())
                    && id.as_bytes()[group.len()] == b'_'
            })
            .max_by_key(|group| group.len())
            .map(|group| (&id[..group.len()], &id[group.len() + 1..]))
    }

    /// Looks up a setting by its persisted id.
    pub fn lookup(&self, id: &str) -> Option<&SettingDefinition> {
        let (group, key) = self.split_key(id)?;
        self.definition(group, key)
    }

    /// Iterates every setting in declaration order.
    pub fn settings(&self) -> impl Iterator<Item = SettingRef<'_>> {
        self.groups.iter().flat_map(|(group_name, group)| {
            group.settings.iter().map(move |(key, definition)| SettingRef {
                id: Self::setting_id(group_name, key),
                group_name,
                group,
                key,
                definition,
            })
        })
    }

    /// Settings covered by a reset target, in declaration order.
    pub fn subgroup_members<'s>(
        &'s self,
        target: &'s ResetTarget,
    ) -> impl Iterator<Item = SettingRef<'s>> + 's {
        self.settings()
            .filter(move |s| target.matches(s.group_name, s.subgroup()))
    }

    /// The persisted id for `key` in `group`.
    pub fn setting_id(group: &str, key: &str) -> String {
        format!("{}_{}", group, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> SettingsSchema {
        SettingsSchema::new()
            .with_group(
                "display",
                SettingsGroup::new("Display").with_setting(
                    "archive_view",
                    SettingDefinition::new(SettingType::Radio, "Archive view")
                        .with_default("excerpt")
                        .with_choices([("excerpt", "Excerpt"), ("full", "Full text")]),
                ),
            )
            .with_group(
                "header",
                SettingsGroup::new("Header").with_setting(
                    "shrink_on_scroll",
                    SettingDefinition::new(SettingType::Checkbox, "Shrink"),
                ),
            )
    }

    #[test]
    fn split_key_uses_declared_groups() {
        let schema = schema();
        assert_eq!(
            schema.split_key("display_archive_view"),
            Some(("display", "archive_view"))
        );
        assert_eq!(
            schema.split_key("header_shrink_on_scroll"),
            Some(("header", "shrink_on_scroll"))
        );
        assert_eq!(schema.split_key("footer_credit"), None);
        assert_eq!(schema.split_key("display"), None);
        assert_eq!(schema.split_key("display_"), None);
    }

    #[test]
    fn split_key_prefers_longest_group() {
        let schema = SettingsSchema::new()
            .with_group("a", SettingsGroup::new("A"))
            .with_group("ab", SettingsGroup::new("AB"));
        assert_eq!(schema.split_key("ab_x"), Some(("ab", "x")));
        assert_eq!(schema.split_key("a_b_x"), Some(("a", "b_x")));
    }

    #[test]
    fn lookup_and_iteration() {
        let schema = schema();
        assert_eq!(schema.len(), 2);
        let def = schema.lookup("display_archive_view").unwrap();
        assert_eq!(def.kind, SettingType::Radio);

        let ids: Vec<String> = schema.settings().map(|s| s.id).collect();
        assert_eq!(ids, vec!["display_archive_view", "header_shrink_on_scroll"]);
    }

    #[test]
    fn definition_from_yaml() {
        let def: SettingDefinition = serde_yaml::from_str(
            r#"
            type: range
            label: Content width
            default: 720
            input_attrs: { min: 480, max: 1200, step: 10 }
            transport: post_message
            partial:
              selector: ".site-content"
              render_callback: content
            "#,
        )
        .unwrap();

        assert_eq!(def.kind, SettingType::Range);
        assert_eq!(def.default, Some(json!(720)));
        assert_eq!(def.input_attrs, InputAttrs::new(480.0, 1200.0, 10.0));
        assert_eq!(def.transport, Transport::PostMessage);
        assert_eq!(def.priority, DEFAULT_PRIORITY);
        assert!(!def.partial.unwrap().container_inclusive);
    }

    #[test]
    fn media_aliases() {
        let def: SettingDefinition = serde_yaml::from_str("type: image").unwrap();
        assert_eq!(def.kind, SettingType::Media);
    }

    #[test]
    fn token_binding_serializes_with_source_tag() {
        let binding = TokenBinding::Font {
            category: "body".into(),
            property: FontProperty::LineHeight,
        };
        assert_eq!(
            serde_json::to_value(&binding).unwrap(),
            json!({"source": "font", "category": "body", "property": "line_height"})
        );
    }

    #[test]
    fn reset_target_matches_subgroup() {
        let target = ResetTarget::new("colors", "palette");
        assert!(target.matches("colors", Some("palette")));
        assert!(!target.matches("colors", Some("palette_extra")));
        assert!(!target.matches("typography", Some("palette")));
        assert!(!target.matches("colors", None));
    }

    fn sibling_subgroups() -> SettingsSchema {
        let color = |sub: &str| SettingDefinition::new(SettingType::Color, "c").in_subgroup(sub);
        SettingsSchema::new().with_group(
            "colors",
            SettingsGroup::new("Colors")
                .with_setting("header_text", color("header"))
                .with_setting("header_top_text", color("header_top"))
                .with_setting(
                    "header_reset",
                    SettingDefinition::new(SettingType::Button, "Reset")
                        .with_reset(ResetTarget::new("colors", "header"))
                        .in_subgroup("header"),
                ),
        )
    }

    #[test]
    fn subgroup_members_exclude_sibling_prefixes() {
        let schema = sibling_subgroups();
        let ids: Vec<String> = schema
            .subgroup_members(&ResetTarget::new("colors", "header"))
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["colors_header_text", "colors_header_reset"]);

        let ids: Vec<String> = schema
            .subgroup_members(&ResetTarget::new("colors", "header_top"))
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["colors_header_top_text"]);
    }

    #[test]
    fn undeclared_subgroup_uses_longest_declared_prefix() {
        let schema: SettingsSchema = serde_yaml::from_str(
            r#"
            layout:
              settings:
                header_width: { type: number }
                header_top_width: { type: number }
                header_reset: { type: button, reset: { category: layout, type: header } }
                header_top_reset: { type: button, reset: { category: layout, type: header_top } }
            "#,
        )
        .unwrap();
        let ids: Vec<String> = schema
            .subgroup_members(&ResetTarget::new("layout", "header"))
            .filter(|s| !s.definition.kind.is_structural())
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["layout_header_width"]);
    }

    #[test]
    fn structural_types() {
        let structural: Vec<_> = SettingType::ALL
            .iter()
            .filter(|t| t.is_structural())
            .collect();
        assert_eq!(structural, vec![&SettingType::Subheading, &SettingType::Button]);
    }
}
