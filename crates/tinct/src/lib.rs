//! # Tinct - Theme Settings From Design Tokens
//!
//! Tinct turns a design-token document into a schema of user-adjustable
//! theme settings, registers those settings with a customization host,
//! folds the stored values back into the token document, and keeps a live
//! preview consistent while values change.
//!
//! The pipeline is split across crates, re-exported here:
//!
//! - [`tokens`]: loading and querying token documents, CSS variable naming
//! - [`schema`]: setting definitions, schema sources, the registry, mod stores
//! - [`customize`]: sanitizers, host binding, reset endpoint, token patching
//! - [`preview`]: bindings, dependency rules and behaviours for live preview
//!
//! [`Tinct`] wires them together from a [`TinctConfig`], and the `tinct`
//! binary exposes the same operations on the command line.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use tinct::{Tinct, TinctConfig};
//!
//! # fn main() -> Result<(), tinct::TinctError> {
//! let tinct = Tinct::open(TinctConfig::load("tinct.yaml")?)?;
//! tinct.set("layout_content_width", json!(960))?;
//! println!("{}", tinct.stylesheet()?);
//! # Ok(())
//! # }
//! ```

mod app;
pub mod cli;
pub mod config;
mod error;

pub use tinct_customize as customize;
pub use tinct_preview as preview;
pub use tinct_schema as schema;
pub use tinct_tokens as tokens;

pub use app::{Tinct, STYLESHEET_SELECTOR};
pub use config::{TinctConfig, CONFIG_FILE};
pub use error::{Result, TinctError};

pub use tinct_schema::{MemoryModStore, ModStore, ResetTarget, SettingType};
pub use tinct_tokens::{MemoryTokenSource, Origin};
