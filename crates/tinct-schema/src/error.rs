//! Error types for schema construction.

use std::io;
use std::path::PathBuf;

use tinct_tokens::TokenError;

/// Errors raised while building a settings schema.
///
/// Reading an uninitialized registry is not an error; it logs and yields an
/// empty schema. These variants cover malformed declarations only.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema document could not be parsed.
    #[error("failed to parse settings schema {location}: {message}")]
    Parse { location: String, message: String },

    /// A schema file could not be read.
    #[error("failed to read settings schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A group name contains the `_` separator used in setting ids.
    #[error("group name '{0}' must not contain '_'")]
    InvalidGroupName(String),

    /// A token document needed to derive settings could not be loaded.
    #[error(transparent)]
    Tokens(#[from] TokenError),
}

impl SchemaError {
    pub fn parse(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.to_string(),
        }
    }
}

/// Error raised by a [`ModStore`](crate::ModStore) that persists outside memory.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read theme mods from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write theme mods to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("theme mods file {} is not a JSON object: {message}", path.display())]
    Format { path: PathBuf, message: String },
}
