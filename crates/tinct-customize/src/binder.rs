//! Materializes a schema into host settings, controls and partials.

use serde::Serialize;
use tinct_schema::{
    resolve_default, PartialRefresh, SchemaRegistry, SettingDefinition, SettingsGroup,
    SettingsSchema,
};

use crate::control::ControlClass;
use crate::host::{ControlArgs, ControlHost, SectionArgs, SettingArgs};
use crate::sanitize::Sanitizer;

/// The registrations derived from one setting definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundSetting {
    pub id: String,
    pub setting: SettingArgs,
    pub control: ControlArgs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<PartialRefresh>,
}

/// Why a group registered no controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The group names a host section the host does not provide.
    MissingSection { section: String },
    /// The group is for default lookup only.
    DefaultOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGroup {
    pub group: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// What a bind pass registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindReport {
    pub sections: Vec<String>,
    pub settings: Vec<String>,
    pub controls: Vec<String>,
    pub partials: Vec<String>,
    pub skipped: Vec<SkippedGroup>,
}

impl BindReport {
    pub fn is_skipped(&self, group: &str) -> bool {
        self.skipped.iter().any(|s| s.group == group)
    }
}

/// Walks a schema and registers everything with a [`ControlHost`].
///
/// Groups that declare a `section` use that host-owned section as-is and are
/// skipped entirely if the host lacks it. Other groups get a section named
/// `"{prefix}_{group}"`. Groups marked `default_only` register their
/// settings, so values and defaults resolve through the host, but no
/// section, control or partial.
#[derive(Debug, Clone)]
pub struct SettingsBinder<'a> {
    schema: &'a SettingsSchema,
    prefix: String,
}

impl<'a> SettingsBinder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self::for_schema(registry.get())
    }

    pub fn for_schema(schema: &'a SettingsSchema) -> Self {
        Self {
            schema,
            prefix: "tinct".to_string(),
        }
    }

    /// Prefix for namespaced section ids.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The section id a group binds to.
    pub fn section_id(&self, group_name: &str, group: &SettingsGroup) -> String {
        match &group.section {
            Some(section) => section.clone(),
            None if self.prefix.is_empty() => group_name.to_string(),
            None => format!("{}_{}", self.prefix, group_name),
        }
    }

    pub fn bind(&self, host: &mut dyn ControlHost) -> BindReport {
        let mut report = BindReport::default();

        for (group_name, group) in self.schema.groups() {
            if group.default_only {
                tracing::debug!(group = %group_name, "group is default-only, no controls");
                let section = self.section_id(group_name, group);
                for (key, def) in &group.settings {
                    if def.kind.is_structural() {
                        continue;
                    }
                    let id = SettingsSchema::setting_id(group_name, key);
                    let bound = Self::normalize(&id, def, &section);
                    host.add_setting(&bound.id, bound.setting);
                    report.settings.push(bound.id);
                }
                report.skipped.push(SkippedGroup {
                    group: group_name.clone(),
                    reason: SkipReason::DefaultOnly,
                });
                continue;
            }

            let section = self.section_id(group_name, group);
            match &group.section {
                Some(external) if !host.has_section(external) => {
                    tracing::debug!(
                        group = %group_name,
                        section = %external,
                        "host section missing, skipping group"
                    );
                    report.skipped.push(SkippedGroup {
                        group: group_name.clone(),
                        reason: SkipReason::MissingSection {
                            section: external.clone(),
                        },
                    });
                    continue;
                }
                Some(_) => {}
                None => {
                    host.add_section(
                        &section,
                        SectionArgs {
                            title: group.title.clone(),
                            priority: group.priority,
                        },
                    );
                    report.sections.push(section.clone());
                }
            }

            for (key, def) in &group.settings {
                let id = SettingsSchema::setting_id(group_name, key);
                let bound = Self::normalize(&id, def, &section);
                tracing::trace!(id = %bound.id, class = bound.control.class.type_name(), "binding setting");

                host.add_setting(&bound.id, bound.setting);
                report.settings.push(bound.id.clone());
                host.add_control(&bound.id, bound.control);
                report.controls.push(bound.id.clone());
                if let Some(partial) = bound.partial {
                    host.add_partial(&bound.id, partial);
                    report.partials.push(bound.id.clone());
                }
            }
        }

        report
    }

    /// Computes the setting/control/partial triple for one definition.
    pub fn normalize(id: &str, def: &SettingDefinition, section: &str) -> BoundSetting {
        let class = ControlClass::for_type(def.kind);
        let persisted = class.persists();
        BoundSetting {
            id: id.to_string(),
            setting: SettingArgs {
                default: if persisted {
                    resolve_default(def)
                } else {
                    serde_json::Value::Null
                },
                sanitizer: Sanitizer::for_type(def.kind),
                transport: def.transport,
                persisted,
            },
            control: ControlArgs {
                label: def.label.clone(),
                description: def.description.clone(),
                section: section.to_string(),
                priority: def.priority,
                kind: def.kind,
                class,
                choices: def.choices.clone(),
                input_attrs: def.input_attrs,
                reset: def.reset.clone(),
            },
            partial: def.partial.clone(),
        }
    }
}
