//! The UI control host.
//!
//! [`ControlHost`] is the registration surface a host platform exposes.
//! [`RecordingHost`] implements it in memory so binding can be tested and
//! inspected without a host.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use tinct_schema::{InputAttrs, PartialRefresh, ResetTarget, SettingType, Transport};

use crate::control::ControlClass;
use crate::sanitize::Sanitizer;

/// Sections the host platform provides on its own.
pub const CORE_SECTIONS: &[&str] = &[
    "title_tagline",
    "colors",
    "header_image",
    "background_image",
    "static_front_page",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionArgs {
    pub title: String,
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingArgs {
    pub default: Value,
    /// `None` for structural settings.
    pub sanitizer: Option<Sanitizer>,
    pub transport: Transport,
    /// Whether the host writes this setting to the mod store.
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlArgs {
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub section: String,
    pub priority: i32,
    #[serde(rename = "type")]
    pub kind: SettingType,
    pub class: ControlClass,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub choices: IndexMap<String, String>,
    #[serde(skip_serializing_if = "InputAttrs::is_empty")]
    pub input_attrs: InputAttrs,
    /// Rendered as `data-category` / `data-type` on reset buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<ResetTarget>,
}

/// Registration surface of the host platform.
pub trait ControlHost {
    /// Whether the host already provides section `id`.
    fn has_section(&self, id: &str) -> bool;

    fn add_section(&mut self, id: &str, args: SectionArgs);

    fn add_setting(&mut self, id: &str, args: SettingArgs);

    fn add_control(&mut self, id: &str, args: ControlArgs);

    fn add_partial(&mut self, id: &str, args: PartialRefresh);
}

/// In-memory host that records every registration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingHost {
    #[serde(skip)]
    provided: IndexSet<String>,
    pub sections: IndexMap<String, SectionArgs>,
    pub settings: IndexMap<String, SettingArgs>,
    pub controls: IndexMap<String, ControlArgs>,
    pub partials: IndexMap<String, PartialRefresh>,
}

impl RecordingHost {
    /// A host providing the [`CORE_SECTIONS`].
    pub fn new() -> Self {
        Self::with_sections(CORE_SECTIONS.iter().copied())
    }

    /// A host providing no sections of its own.
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn with_sections<'a, I: IntoIterator<Item = &'a str>>(sections: I) -> Self {
        Self {
            provided: sections.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }
}

impl ControlHost for RecordingHost {
    fn has_section(&self, id: &str) -> bool {
        self.provided.contains(id) || self.sections.contains_key(id)
    }

    fn add_section(&mut self, id: &str, args: SectionArgs) {
        self.sections.insert(id.to_string(), args);
    }

    fn add_setting(&mut self, id: &str, args: SettingArgs) {
        self.settings.insert(id.to_string(), args);
    }

    fn add_control(&mut self, id: &str, args: ControlArgs) {
        self.controls.insert(id.to_string(), args);
    }

    fn add_partial(&mut self, id: &str, args: PartialRefresh) {
        self.partials.insert(id.to_string(), args);
    }
}
