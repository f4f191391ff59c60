//! Token document sources.
//!
//! A [`TokenSource`] hands out one layer of the token document per
//! [`Origin`]. The merged document for an origin is every layer up to and
//! including it, deep-merged lowest first.
//!
//! Two sources are provided:
//!
//! - [`MemoryTokenSource`]: layers held in memory (tests, embedded documents)
//! - [`DirTokenSource`]: one file per origin in a directory
//!
//! # File resolution
//!
//! [`DirTokenSource`] looks for `<origin>` with these extensions, in
//! priority order:
//!
//! | Priority | Extension | Parser |
//! |----------|-----------|--------|
//! | 1 (highest) | `.json` | serde_json |
//! | 2 | `.yaml` | serde_yaml |
//! | 3 (lowest) | `.yml` | serde_yaml |
//!
//! A missing file is an empty layer, not an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::TokenError;
use crate::merge::deep_merge_into;
use crate::origin::Origin;

/// Recognized token document extensions in priority order.
pub const TOKEN_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// Provides token document layers.
pub trait TokenSource {
    /// Human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// The layer contributed by `origin`, or `None` if it has none.
    fn layer(&self, origin: Origin) -> Result<Option<Value>, TokenError>;

    /// The merged document for `origin`.
    ///
    /// The default implementation deep-merges [`Origin::layers`] in order.
    fn merged_document(&self, origin: Origin) -> Result<Value, TokenError> {
        let mut merged = Value::Object(serde_json::Map::new());
        for layer_origin in origin.layers() {
            if let Some(layer) = self.layer(*layer_origin)? {
                deep_merge_into(&mut merged, layer);
            }
        }
        Ok(merged)
    }
}

/// Token layers held in memory.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_tokens::{MemoryTokenSource, Origin, TokenSource};
///
/// let source = MemoryTokenSource::new()
///     .with_layer(Origin::Default, json!({"settings": {"spacing": {"unit": "px"}}}))
///     .with_layer(Origin::Theme, json!({"settings": {"spacing": {"scale": 4}}}));
///
/// let doc = source.merged_document(Origin::Theme).unwrap();
/// assert_eq!(doc["settings"]["spacing"]["unit"], "px");
/// assert_eq!(doc["settings"]["spacing"]["scale"], 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenSource {
    layers: HashMap<Origin, Value>,
}

impl MemoryTokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the layer for `origin`, returning `self` for chaining.
    pub fn with_layer(mut self, origin: Origin, document: Value) -> Self {
        self.layers.insert(origin, document);
        self
    }

    /// Parses `json` and sets it as the layer for `origin`.
    pub fn with_json(self, origin: Origin, json: &str) -> Result<Self, TokenError> {
        let document = parse_document(&format!("<{} layer>", origin), json, Format::Json)?;
        Ok(self.with_layer(origin, document))
    }
}

impl TokenSource for MemoryTokenSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn layer(&self, origin: Origin) -> Result<Option<Value>, TokenError> {
        Ok(self.layers.get(&origin).cloned())
    }
}

/// Token layers read from `<origin>.json` (or `.yaml`/`.yml`) in a directory.
///
/// Files are read on every call; caching is the [`TokenStore`](crate::TokenStore)'s job.
#[derive(Debug, Clone)]
pub struct DirTokenSource {
    dir: PathBuf,
}

impl DirTokenSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `origin`, if one exists.
    pub fn file_for(&self, origin: Origin) -> Option<PathBuf> {
        TOKEN_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}{}", origin.as_str(), ext)))
            .find(|path| path.is_file())
    }
}

impl TokenSource for DirTokenSource {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn layer(&self, origin: Origin) -> Result<Option<Value>, TokenError> {
        let Some(path) = self.file_for(origin) else {
            tracing::debug!(dir = %self.dir.display(), %origin, "no token document for origin");
            return Ok(None);
        };

        let content = std::fs::read_to_string(&path).map_err(|source| TokenError::Io {
            path: path.clone(),
            source,
        })?;

        let format = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            Format::Json
        } else {
            Format::Yaml
        };

        parse_document(&path.display().to_string(), &content, format).map(Some)
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Yaml,
}

fn parse_document(location: &str, content: &str, format: Format) -> Result<Value, TokenError> {
    let value: Value = match format {
        Format::Json => {
            serde_json::from_str(content).map_err(|e| TokenError::parse(location, e))?
        }
        Format::Yaml => {
            serde_yaml::from_str(content).map_err(|e| TokenError::parse(location, e))?
        }
    };

    if !value.is_object() {
        return Err(TokenError::NotAMapping(location.to_string()));
    }
    Ok(value)
}
