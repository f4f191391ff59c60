//! Token document origins.
//!
//! A token document is assembled from layers. Each [`Origin`] names one
//! layer; the merged document for an origin is every lower layer with the
//! origin's own layer merged on top.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// The layer a token document comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Platform defaults shipped with the host.
    Default,
    /// The theme's own token document.
    Theme,
    /// User customizations saved through the host.
    Custom,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Theme
    }
}

impl Origin {
    /// All origins, lowest layer first.
    pub const ALL: [Origin; 3] = [Origin::Default, Origin::Theme, Origin::Custom];

    /// The origins merged to produce this origin's document, lowest first.
    pub fn layers(self) -> &'static [Origin] {
        match self {
            Origin::Default => &Self::ALL[..1],
            Origin::Theme => &Self::ALL[..2],
            Origin::Custom => &Self::ALL[..],
        }
    }

    /// The lowercase name used in file names and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Default => "default",
            Origin::Theme => "theme",
            Origin::Custom => "custom",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Origin::Default),
            "theme" => Ok(Origin::Theme),
            "custom" | "user" => Ok(Origin::Custom),
            other => Err(TokenError::UnknownOrigin(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_cumulative() {
        assert_eq!(Origin::Default.layers(), &[Origin::Default]);
        assert_eq!(Origin::Theme.layers(), &[Origin::Default, Origin::Theme]);
        assert_eq!(Origin::Custom.layers().len(), 3);
    }

    #[test]
    fn parses_names() {
        assert_eq!("theme".parse::<Origin>().unwrap(), Origin::Theme);
        assert_eq!(" Default ".parse::<Origin>().unwrap(), Origin::Default);
        assert_eq!("user".parse::<Origin>().unwrap(), Origin::Custom);
        assert!("blocks".parse::<Origin>().is_err());
    }

    #[test]
    fn default_origin_is_theme() {
        assert_eq!(Origin::default(), Origin::Theme);
    }
}
