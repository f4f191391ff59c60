//! Error types for binding and writing settings.

use tinct_schema::{SettingType, StoreError};

/// Errors raised when writing a setting through the accessor.
///
/// Out-of-domain values are not errors; the sanitizer corrects them.
#[derive(Debug, thiserror::Error)]
pub enum CustomizeError {
    /// No setting with this id exists in the schema.
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    /// The setting is a heading or button and holds no value.
    #[error("setting '{id}' is a {kind} and cannot hold a value")]
    NotPersisted { id: String, kind: SettingType },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure result of the reset endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    /// The caller lacks the capability; nothing was removed.
    #[error("reset requires the '{capability}' capability")]
    Unauthorized { capability: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_persisted_names_the_type() {
        let err = CustomizeError::NotPersisted {
            id: "colors_palette_reset".into(),
            kind: SettingType::Button,
        };
        assert_eq!(
            err.to_string(),
            "setting 'colors_palette_reset' is a button and cannot hold a value"
        );
    }

    #[test]
    fn unauthorized_names_the_capability() {
        let err = ResetError::Unauthorized {
            capability: "edit_theme_options".into(),
        };
        assert!(err.to_string().contains("edit_theme_options"));
    }
}
