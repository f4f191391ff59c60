//! Error types for the preview client.

/// Errors raised by the preview client.
///
/// Missing DOM targets are not errors; bindings to absent selectors are
/// no-ops.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The preview manifest could not be parsed.
    #[error("failed to parse preview manifest {location}: {message}")]
    Manifest { location: String, message: String },

    /// A change was posted for a setting the client does not know.
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),
}

impl PreviewError {
    pub fn manifest(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Manifest {
            location: location.into(),
            message: message.to_string(),
        }
    }
}
