//! # Tinct Preview - Live Setting Bindings
//!
//! `tinct-preview` is the browser side of the settings pipeline, expressed
//! over a small [`Dom`] abstraction. A [`PreviewClient`] receives setting
//! change events and, synchronously and in subscription order:
//!
//! 1. applies every [`Binding`] of the changed setting (text, CSS variable,
//!    visibility, class toggle, slug lookup)
//! 2. notifies subscribers
//! 3. tears down and conditionally rebuilds stateful [`Behaviour`]s
//! 4. runs the [`DependencyRule`]s triggered by the change, once
//!
//! Bindings, rules and behaviours are declared in a [`PreviewManifest`];
//! bindings for token-derived settings are generated from the schema.
//!
//! ```rust
//! use serde_json::json;
//! use tinct_preview::{PreviewClient, PreviewManifest, RecordingDom};
//!
//! let mut client = PreviewClient::new(RecordingDom::new())
//!     .with_value("display_archive_layout", json!("list"))
//!     .with_value("display_archive_view", json!("full"))
//!     .with_manifest(PreviewManifest::builtin().unwrap());
//!
//! let report = client.set("display_archive_layout", json!("grid")).unwrap();
//! assert_eq!(client.get("display_archive_view"), Some(&json!("excerpt")));
//! assert_eq!(report.corrections.len(), 1);
//! ```

mod behaviour;
mod binding;
mod client;
mod dom;
mod error;
mod manifest;
mod predicate;
mod rules;

pub use behaviour::{Behaviour, BehaviourSpec};
pub use binding::{Binding, BindingKind, BindingState};
pub use client::{ChangeReport, PreviewClient, SubscriptionId};
pub use dom::{Dom, DomOp, RecordingDom};
pub use error::PreviewError;
pub use manifest::{token_bindings, PreviewManifest, BUILTIN_PREVIEW_YAML};
pub use predicate::{is_truthy, loose_eq, Predicate};
pub use rules::{propagate, DependencyRule};
