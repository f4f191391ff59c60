//! Schema sources.
//!
//! A [`SchemaSource`] contributes a raw schema document (group → settings)
//! to the registry. Documents stay untyped until the registry has merged
//! them, so a source may declare only part of a group or setting and leave
//! the rest to an earlier source.

mod static_source;
mod token_source;

pub use static_source::{StaticSchemaSource, BUILTIN_SETTINGS_YAML};
pub use token_source::{TokenSchemaSource, FONT_WEIGHTS};

use serde_json::Value;
use tinct_tokens::TokenStore;

use crate::error::SchemaError;

/// A provider of settings groups.
pub trait SchemaSource {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Produces a raw schema document. Token-derived sources read `tokens`;
    /// static ones ignore it.
    fn collect(&self, tokens: &TokenStore) -> Result<Value, SchemaError>;
}
