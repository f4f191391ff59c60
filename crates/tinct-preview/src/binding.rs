//! Setting-to-DOM bindings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dom::Dom;
use crate::predicate::{display, is_truthy, Predicate};

/// Lifecycle of one binding.
///
/// `Idle → Bound` when attached to a client, `→ Notified` when its setting
/// changes, `→ Applied` once the DOM write has been attempted. The next
/// change moves it back to `Notified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingState {
    #[default]
    Idle,
    Bound,
    Notified,
    Applied,
}

/// What a binding does with a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingKind {
    /// Replaces the element's text.
    Text,
    /// Writes `{prefix}{value}{suffix}` to a custom property.
    CssVar {
        name: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        prefix: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        suffix: String,
    },
    /// Shows the element when the value is truthy (or falsy, inverted).
    Visibility {
        #[serde(default)]
        invert: bool,
    },
    /// Adds `class` while `when` holds.
    ClassToggle {
        class: String,
        #[serde(default)]
        when: Predicate,
    },
    /// Looks the stored slug up in `table` and writes the result to a
    /// custom property. Unknown slugs write nothing.
    SlugVar {
        name: String,
        table: IndexMap<String, String>,
    },
}

/// One setting bound to one selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub setting: String,
    pub selector: String,
    #[serde(flatten)]
    pub kind: BindingKind,
}

impl Binding {
    pub fn new(setting: impl Into<String>, selector: impl Into<String>, kind: BindingKind) -> Self {
        Self {
            setting: setting.into(),
            selector: selector.into(),
            kind,
        }
    }

    pub fn css_var(setting: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            setting,
            ":root",
            BindingKind::CssVar {
                name: name.into(),
                prefix: String::new(),
                suffix: String::new(),
            },
        )
    }

    /// Writes `value` to the DOM. Returns `false` when the selector matched
    /// nothing or the value had no mapping.
    pub fn apply(&self, value: &Value, dom: &mut dyn Dom) -> bool {
        if !dom.exists(&self.selector) {
            tracing::trace!(selector = %self.selector, "binding target absent");
            return false;
        }
        match &self.kind {
            BindingKind::Text => dom.set_text(&self.selector, &display(value)),
            BindingKind::CssVar {
                name,
                prefix,
                suffix,
            } => {
                let rendered = format!("{}{}{}", prefix, display(value), suffix);
                dom.set_css_var(&self.selector, name, &rendered);
            }
            BindingKind::Visibility { invert } => {
                dom.set_visible(&self.selector, is_truthy(value) != *invert)
            }
            BindingKind::ClassToggle { class, when } => {
                dom.toggle_class(&self.selector, class, when.matches(value))
            }
            BindingKind::SlugVar { name, table } => match table.get(&display(value)) {
                Some(reference) => dom.set_css_var(&self.selector, name, reference),
                None => return false,
            },
        }
        true
    }
}
