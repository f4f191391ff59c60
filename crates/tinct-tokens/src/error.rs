//! Error types for token document loading.

use std::io;
use std::path::PathBuf;

/// Errors raised while loading token documents.
///
/// Lookups never fail: a path that runs past the document yields an empty
/// node. Only reading or parsing a document source produces an error.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// A token document file exists but could not be read.
    #[error("failed to read token document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A token document could not be parsed.
    #[error("failed to parse token document {location}: {message}")]
    Parse { location: String, message: String },

    /// A token document parsed, but its root is not a mapping.
    #[error("token document {0} must have a mapping at its root")]
    NotAMapping(String),

    /// An origin name did not match any known origin.
    #[error("unknown token origin '{0}' (expected default, theme or custom)")]
    UnknownOrigin(String),
}

impl TokenError {
    /// Create a parse error for an in-memory or file document.
    pub fn parse(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.to_string(),
        }
    }
}
