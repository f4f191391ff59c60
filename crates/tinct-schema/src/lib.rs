//! # Tinct Schema - Settings Schema Registry
//!
//! `tinct-schema` describes every user-configurable theme setting in one
//! merged [`SettingsSchema`], built from a hand-authored YAML table and from
//! settings derived from the design-token document.
//!
//! ## Core Concepts
//!
//! - [`SettingDefinition`]: one setting; its [`SettingType`] is a closed enum
//! - [`SettingsGroup`] / [`SettingsSchema`]: settings by group, ids are
//!   `"{group}_{key}"`
//! - [`SchemaSource`]: [`StaticSchemaSource`] (YAML) and
//!   [`TokenSchemaSource`] (palette, custom colors, font categories)
//! - [`SchemaRegistry`]: merges sources, resolves defaults, reads mods
//! - [`ModStore`]: the external key-value store holding overrides
//!
//! ## Default resolution
//!
//! Defaults resolve through a three-step chain: the explicit default, then
//! the token value (captured when token settings are generated), then a
//! constant chosen by type. See [`defaults`].
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tinct_schema::{MemoryModStore, SchemaRegistry, SchemaSource, StaticSchemaSource, TokenSchemaSource};
//! use tinct_tokens::{MemoryTokenSource, Origin, TokenStore};
//!
//! let tokens = TokenStore::new(MemoryTokenSource::new().with_layer(
//!     Origin::Theme,
//!     json!({"color": {"palette": [{"slug": "primary", "color": "#336699"}]}}),
//! ));
//! let builtin = StaticSchemaSource::builtin().unwrap();
//! let derived = TokenSchemaSource::new();
//! let sources: [&dyn SchemaSource; 2] = [&builtin, &derived];
//! let registry = SchemaRegistry::build(&tokens, &sources).unwrap();
//!
//! let mods = MemoryModStore::new();
//! assert_eq!(registry.get_theme_mod("colors_palette_primary", &mods), json!("#336699"));
//! assert_eq!(registry.get_theme_mod("display_archive_view", &mods), json!("excerpt"));
//! ```

pub mod defaults;
mod error;
mod registry;
mod sources;
mod store;
mod types;

pub use defaults::{resolve_default, type_fallback, DefaultChain, DefaultOrigin, ResolvedDefault};
pub use error::{SchemaError, StoreError};
pub use registry::SchemaRegistry;
pub use sources::{
    SchemaSource, StaticSchemaSource, TokenSchemaSource, BUILTIN_SETTINGS_YAML, FONT_WEIGHTS,
};
pub use store::{JsonFileModStore, MemoryModStore, ModStore, NamespacedStore};
pub use types::{
    FontProperty, InputAttrs, PartialRefresh, ResetTarget, SettingDefinition, SettingRef,
    SettingType, SettingsGroup, SettingsSchema, TokenBinding, Transport, DEFAULT_PRIORITY,
};
