//! The token store: cached, path-addressable access to token documents.
//!
//! Queries are plain values. A [`TokenQuery`] names an origin and a path;
//! the store resolves it to a node and the functions in [`crate::entry`]
//! turn that node into whatever shape the caller needs.
//!
//! # Caching
//!
//! Each origin's merged document is loaded once, on first use. Resolved
//! nodes are cached by `(origin, normalized path)`. Nothing is ever
//! written to a document, so the caches are only dropped by
//! [`TokenStore::reset`].
//!
//! # Missing paths
//!
//! A path that runs past the document resolves to an empty mapping. It is
//! never an error: callers treat absence as "use the fallback default".
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tinct_tokens::{MemoryTokenSource, Origin, TokenQuery, TokenStore};
//!
//! let source = MemoryTokenSource::new().with_layer(Origin::Theme, json!({
//!     "settings": {"color": {"palette": [
//!         {"slug": "primary", "color": "#336699", "name": "Primary"}
//!     ]}}
//! }));
//! let store = TokenStore::new(source);
//!
//! let palette = TokenQuery::new("color.palette");
//! assert_eq!(store.choices(&palette)["primary"], "Primary");
//! assert_eq!(store.string(&palette.child("primary").child("color")), "#336699");
//! assert!(store.entries(&TokenQuery::new("color.missing")).is_empty());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::css_var::{css_var_from_slug, slug_from_css_var, var_reference};
use crate::entry::{self, TokenEntry};
use crate::error::TokenError;
use crate::origin::Origin;
use crate::path::{segment_matches, to_kebab, TokenPath};
use crate::source::TokenSource;

/// Default CSS variable prefix.
pub const DEFAULT_CSS_PREFIX: &str = "wp";

/// An immutable description of a token lookup: which origin, which path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenQuery {
    origin: Origin,
    path: TokenPath,
}

impl TokenQuery {
    /// A query against the theme origin.
    pub fn new(path: impl Into<TokenPath>) -> Self {
        Self {
            origin: Origin::Theme,
            path: path.into(),
        }
    }

    /// Returns the same query against another origin.
    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Returns a query for a child of this query's node.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        Self {
            origin: self.origin,
            path: self.path.child(segment),
        }
    }

    pub fn path(&self) -> &TokenPath {
        &self.path
    }

    pub fn get_origin(&self) -> Origin {
        self.origin
    }

    fn cache_key(&self) -> (Origin, String) {
        (self.origin, self.path.cache_key())
    }
}

/// Cached reader over a [`TokenSource`].
pub struct TokenStore {
    source: Box<dyn TokenSource>,
    prefix: String,
    documents: RefCell<HashMap<Origin, Rc<Value>>>,
    nodes: RefCell<HashMap<(Origin, String), Rc<Value>>>,
}

impl TokenStore {
    /// Creates a store over `source` with the default `wp` variable prefix.
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            prefix: DEFAULT_CSS_PREFIX.to_string(),
            documents: RefCell::new(HashMap::new()),
            nodes: RefCell::new(HashMap::new()),
        }
    }

    /// Sets the CSS variable prefix, returning `self` for chaining.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Loads (or returns the cached) merged document for `origin`.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the document cannot be read or parsed.
    /// Failed loads are not cached.
    pub fn document(&self, origin: Origin) -> Result<Rc<Value>, TokenError> {
        if let Some(doc) = self.documents.borrow().get(&origin) {
            return Ok(Rc::clone(doc));
        }

        let doc = Rc::new(self.source.merged_document(origin)?);
        tracing::debug!(source = self.source.name(), %origin, "loaded token document");
        self.documents.borrow_mut().insert(origin, Rc::clone(&doc));
        Ok(doc)
    }

    /// Resolves a query to its node.
    ///
    /// # Errors
    ///
    /// Only document loading fails; a missing path yields an empty mapping.
    pub fn try_load(&self, query: &TokenQuery) -> Result<Rc<Value>, TokenError> {
        let key = query.cache_key();
        if let Some(node) = self.nodes.borrow().get(&key) {
            return Ok(Rc::clone(node));
        }

        let doc = self.document(query.origin)?;
        let node = Rc::new(resolve(&doc, query.path.segments()).unwrap_or_else(empty));
        self.nodes.borrow_mut().insert(key, Rc::clone(&node));
        Ok(node)
    }

    /// Resolves a query to its node, treating load failures as absence.
    ///
    /// The failure is logged and an empty mapping returned, so that a broken
    /// token file degrades to fallback defaults rather than taking the
    /// settings UI down with it.
    pub fn load(&self, query: &TokenQuery) -> Rc<Value> {
        match self.try_load(query) {
            Ok(node) => node,
            Err(err) => {
                tracing::warn!(error = %err, path = %query.path, "token document unavailable");
                Rc::new(empty())
            }
        }
    }

    /// Drops every cached document and node.
    pub fn reset(&self) {
        self.documents.borrow_mut().clear();
        self.nodes.borrow_mut().clear();
    }

    /// The node as raw JSON.
    pub fn raw(&self, query: &TokenQuery) -> Value {
        entry::as_raw(&self.load(query))
    }

    /// The node as a string (`""` unless it is a scalar).
    pub fn string(&self, query: &TokenQuery) -> String {
        entry::as_string(&self.load(query))
    }

    /// The node flattened to `key → value`.
    pub fn map(&self, query: &TokenQuery) -> IndexMap<String, Value> {
        entry::as_map(&self.load(query))
    }

    /// The node as `slug → label` choice pairs.
    pub fn choices(&self, query: &TokenQuery) -> IndexMap<String, String> {
        entry::as_choices(&self.load(query))
    }

    /// The node as normalized entries, each with a `value`.
    pub fn entries(&self, query: &TokenQuery) -> Vec<TokenEntry> {
        entry::as_entries(&self.load(query))
    }

    /// The variable name for `slug` under `path`, using this store's prefix.
    pub fn css_var_from_slug(&self, path: &TokenPath, slug: &str) -> String {
        css_var_from_slug(&self.prefix, path, slug)
    }

    /// The slug encoded in a variable name or reference.
    pub fn slug_from_css_var(&self, input: &str) -> String {
        slug_from_css_var(input)
    }

    /// A `var(...)` reference to `slug` under `path`.
    ///
    /// Empty slugs produce an empty string rather than a dangling reference.
    pub fn var_reference(&self, path: &TokenPath, slug: &str) -> String {
        if to_kebab(slug).is_empty() {
            return String::new();
        }
        var_reference(&self.css_var_from_slug(path, slug))
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("source", &self.source.name())
            .field("prefix", &self.prefix)
            .field("cached_documents", &self.documents.borrow().len())
            .field("cached_nodes", &self.nodes.borrow().len())
            .finish()
    }
}

fn empty() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Walks `segments` down from `doc`.
///
/// A leading `settings` segment is optional: documents are accepted with or
/// without that wrapper. Array elements are addressed by slug or index.
fn resolve(doc: &Value, segments: &[String]) -> Option<Value> {
    let root = match doc.get("settings") {
        Some(settings)
            if segments.first().map(|s| s.as_str()) != Some("settings")
                && settings.is_object() =>
        {
            settings
        }
        _ => doc,
    };

    let mut node = root;
    for segment in segments {
        node = match node {
            Value::Object(map) => map
                .iter()
                .find(|(key, _)| segment_matches(key, segment))
                .map(|(_, v)| v)?,
            Value::Array(items) => find_in_array(items, segment)?,
            _ => return None,
        };
    }
    Some(node.clone())
}

fn find_in_array<'a>(items: &'a [Value], segment: &str) -> Option<&'a Value> {
    let slug = to_kebab(segment);
    items
        .iter()
        .find(|item| {
            item.get("slug")
                .and_then(Value::as_str)
                .is_some_and(|s| to_kebab(s) == slug)
        })
        .or_else(|| segment.parse::<usize>().ok().and_then(|i| items.get(i)))
}
