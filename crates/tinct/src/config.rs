//! Configuration file.
//!
//! `tinct.yaml` configures where tokens and mods live and how names are
//! prefixed. Every field is optional:
//!
//! ```yaml
//! tokens_dir: tokens          # <origin>.json / .yaml token documents
//! mods_file: mods.json        # persisted setting overrides
//! mod_prefix: tinct           # key namespace in the mods file
//! css_prefix: wp              # --{css_prefix}--preset--...
//! origin: theme               # default | theme | custom
//! font_categories: [body, heading]
//! settings_file: settings.yaml   # merged over the built-in settings
//! preview_manifest: preview.yaml # replaces the built-in manifest
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tinct_tokens::{Origin, DEFAULT_CSS_PREFIX};

use crate::error::{Result, TinctError};

/// File name looked up in the working directory when no config is given.
pub const CONFIG_FILE: &str = "tinct.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TinctConfig {
    pub tokens_dir: PathBuf,
    pub mods_file: PathBuf,
    pub mod_prefix: String,
    pub css_prefix: String,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_manifest: Option<PathBuf>,
}

impl Default for TinctConfig {
    fn default() -> Self {
        Self {
            tokens_dir: PathBuf::from("tokens"),
            mods_file: PathBuf::from("mods.json"),
            mod_prefix: "tinct".to_string(),
            css_prefix: DEFAULT_CSS_PREFIX.to_string(),
            origin: Origin::Theme,
            font_categories: None,
            settings_file: None,
            preview_manifest: None,
        }
    }
}

impl TinctConfig {
    /// Parses a config file and resolves its relative paths.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TinctError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|message| TinctError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config.relative_to(base))
    }

    /// Loads `path` if given, else `tinct.yaml` in `dir` if present, else
    /// the defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default().relative_to(dir))
        }
    }

    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, String> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    /// Anchors relative paths at `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let anchor = |p: &mut PathBuf| {
            if p.is_relative() && !base.as_os_str().is_empty() {
                *p = base.join(&*p);
            }
        };
        anchor(&mut self.tokens_dir);
        anchor(&mut self.mods_file);
        if let Some(p) = self.settings_file.as_mut() {
            anchor(p);
        }
        if let Some(p) = self.preview_manifest.as_mut() {
            anchor(p);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TinctConfig::from_yaml("").unwrap();
        assert_eq!(config.mod_prefix, "tinct");
        assert_eq!(config.css_prefix, "wp");
        assert_eq!(config.origin, Origin::Theme);
        assert_eq!(config.font_categories, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = TinctConfig::from_yaml("css_prefix: acme\norigin: custom\n").unwrap();
        assert_eq!(config.css_prefix, "acme");
        assert_eq!(config.origin, Origin::Custom);
        assert_eq!(config.mods_file, PathBuf::from("mods.json"));
    }

    #[test]
    fn unknown_origin_is_rejected() {
        assert!(TinctConfig::from_yaml("origin: staging\n").is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "tokens_dir: design\nmods_file: /var/lib/mods.json\n").unwrap();

        let config = TinctConfig::load(&path).unwrap();
        assert_eq!(config.tokens_dir, dir.path().join("design"));
        assert_eq!(config.mods_file, PathBuf::from("/var/lib/mods.json"));
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TinctConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.tokens_dir, dir.path().join("tokens"));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "mod_prefix: [oops\n").unwrap();
        let err = TinctConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
