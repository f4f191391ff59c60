//! # Tinct Customize - Settings Binding and Token Patching
//!
//! `tinct-customize` is the server side of the settings pipeline. It takes a
//! merged [`SchemaRegistry`](tinct_schema::SchemaRegistry) and:
//!
//! - registers sections, settings, controls and partial-refresh regions with
//!   a [`ControlHost`] ([`SettingsBinder`])
//! - sanitizes every write by type ([`Sanitizer`], [`SettingsAccessor`])
//! - resets whole subgroups behind a capability check ([`ResetEndpoint`])
//! - folds overrides back into the token document ([`TokenDocumentPatcher`])
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tinct_customize::{RecordingHost, SettingsBinder};
//! use tinct_schema::SchemaRegistry;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.set_raw(json!({"header": {"title": "Header", "settings": {
//!     "sticky": {"type": "checkbox", "default": true}
//! }}})).unwrap();
//!
//! let mut host = RecordingHost::new();
//! let report = SettingsBinder::new(&registry).bind(&mut host);
//! assert_eq!(report.sections, vec!["tinct_header"]);
//! assert_eq!(host.settings["header_sticky"].default, json!(true));
//! ```

mod accessor;
mod binder;
mod control;
mod error;
mod host;
mod patcher;
mod reset;
mod sanitize;

pub use accessor::SettingsAccessor;
pub use binder::{BindReport, BoundSetting, SettingsBinder, SkipReason, SkippedGroup};
pub use control::ControlClass;
pub use error::{CustomizeError, ResetError};
pub use host::{ControlArgs, ControlHost, RecordingHost, SectionArgs, SettingArgs, CORE_SECTIONS};
pub use patcher::{PaletteEntryPatch, TokenDocumentPatcher, TokenPatch};
pub use reset::{Capabilities, CapabilitySet, ResetEndpoint, ResetOutcome, RESET_CAPABILITY};
pub use sanitize::{hex_color, same_value, truthy, Sanitizer};
