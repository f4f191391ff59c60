//! # Tinct Tokens - Design-Token Document Access
//!
//! `tinct-tokens` is the read side of the tinct theme-settings pipeline: it
//! loads a hierarchical design-token document, answers path queries against
//! it, and translates between token slugs and CSS custom property names.
//!
//! ## Core Concepts
//!
//! - [`TokenSource`]: where documents come from, one layer per [`Origin`]
//! - [`TokenStore`]: lazily loads and caches documents, resolves queries
//! - [`TokenQuery`]: an immutable `(origin, path)` lookup description
//! - [`TokenEntry`]: a normalized leaf with `slug`, `value` and `label`
//! - [`css_var_from_slug`] / [`slug_from_css_var`]: the variable name mapping
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tinct_tokens::{MemoryTokenSource, Origin, TokenPath, TokenQuery, TokenStore};
//!
//! let store = TokenStore::new(MemoryTokenSource::new().with_layer(
//!     Origin::Theme,
//!     json!({"settings": {"typography": {"fontSizes": [
//!         {"slug": "large", "size": "1.5rem", "name": "Large"}
//!     ]}}}),
//! ));
//!
//! let sizes = store.entries(&TokenQuery::new("typography.fontSizes"));
//! assert_eq!(sizes[0].value, "1.5rem");
//!
//! let var = store.css_var_from_slug(&TokenPath::parse("typography.fontSizes"), "large");
//! assert_eq!(var, "--wp--preset--font-size--large");
//! assert_eq!(store.slug_from_css_var(&var), "large");
//! ```
//!
//! ## Failure Policy
//!
//! Lookups never fail. A path that runs past the document yields an empty
//! mapping, and every accessor turns that into its own empty value. Only
//! reading or parsing a document is fallible, and [`TokenStore::load`] logs
//! and absorbs even that.

mod css_var;
pub mod entry;
mod error;
mod merge;
mod origin;
mod path;
mod source;
mod store;
mod stylesheet;

pub use css_var::{
    css_var_from_slug, is_css_var, preset_group, slug_from_css_var, var_reference, PRESET_GROUPS,
};
pub use entry::{TokenEntry, VALUE_KEYS};
pub use error::TokenError;
pub use merge::{deep_merge, deep_merge_into};
pub use origin::Origin;
pub use path::{humanize, to_kebab, to_snake, TokenPath};
pub use source::{DirTokenSource, MemoryTokenSource, TokenSource, TOKEN_EXTENSIONS};
pub use store::{TokenQuery, TokenStore, DEFAULT_CSS_PREFIX};
pub use stylesheet::{css_variables, to_css};
