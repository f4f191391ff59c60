//! Control classes.

use serde::Serialize;
use tinct_schema::SettingType;

/// How a setting is rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlClass {
    /// A control the host renders natively, by type name.
    Builtin(SettingType),
    ColorPicker,
    MediaPicker,
    /// Label-only heading. Not persisted.
    Subheading,
    /// Action element carrying `data-category`/`data-type`. Not persisted.
    Button,
}

impl ControlClass {
    /// The control-class table.
    pub fn for_type(kind: SettingType) -> ControlClass {
        match kind {
            SettingType::Color => ControlClass::ColorPicker,
            SettingType::Media => ControlClass::MediaPicker,
            SettingType::Subheading => ControlClass::Subheading,
            SettingType::Button => ControlClass::Button,
            other => ControlClass::Builtin(other),
        }
    }

    /// Whether settings behind this control are written to the mod store.
    pub fn persists(self) -> bool {
        !matches!(self, ControlClass::Subheading | ControlClass::Button)
    }

    /// The host-side control type name.
    pub fn type_name(self) -> &'static str {
        match self {
            ControlClass::Builtin(kind) => kind.as_str(),
            ControlClass::ColorPicker => "color",
            ControlClass::MediaPicker => "media",
            ControlClass::Subheading => "tinct-subheading",
            ControlClass::Button => "tinct-button",
        }
    }
}
