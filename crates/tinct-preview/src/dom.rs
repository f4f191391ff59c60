//! The preview surface.
//!
//! [`Dom`] is the small set of mutations bindings perform. Writes to a
//! selector that matches nothing are dropped by the caller, so implementations
//! only need to answer [`Dom::exists`] honestly.

use indexmap::IndexSet;

/// A mutation performed on the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomOp {
    SetText {
        selector: String,
        text: String,
    },
    SetCssVar {
        selector: String,
        name: String,
        value: String,
    },
    SetVisible {
        selector: String,
        visible: bool,
    },
    ToggleClass {
        selector: String,
        class: String,
        on: bool,
    },
    Build {
        behaviour: String,
        selector: String,
    },
    Teardown {
        behaviour: String,
        selector: String,
    },
}

/// Mutations a binding may perform.
pub trait Dom {
    /// Whether `selector` matches anything.
    fn exists(&self, selector: &str) -> bool;

    fn set_text(&mut self, selector: &str, text: &str);

    fn set_css_var(&mut self, selector: &str, name: &str, value: &str);

    fn set_visible(&mut self, selector: &str, visible: bool);

    fn toggle_class(&mut self, selector: &str, class: &str, on: bool);

    /// Constructs a stateful behaviour (e.g. a masonry layout) on `selector`.
    fn build_behaviour(&mut self, behaviour: &str, selector: &str);

    /// Destroys a behaviour built earlier, removing its listeners.
    fn teardown_behaviour(&mut self, behaviour: &str, selector: &str);
}

/// A DOM stand-in that records every mutation in order.
///
/// `:root` always exists; other selectors exist once added.
#[derive(Debug, Clone, Default)]
pub struct RecordingDom {
    elements: IndexSet<String>,
    ops: Vec<DomOp>,
}

impl RecordingDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements<'a, I: IntoIterator<Item = &'a str>>(elements: I) -> Self {
        Self {
            elements: elements.into_iter().map(str::to_string).collect(),
            ops: Vec::new(),
        }
    }

    pub fn add_element(&mut self, selector: impl Into<String>) {
        self.elements.insert(selector.into());
    }

    pub fn ops(&self) -> &[DomOp] {
        &self.ops
    }

    /// Returns and clears the recorded mutations.
    pub fn take_ops(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.ops)
    }

    /// The last value written to a CSS variable on `selector`.
    pub fn css_var(&self, selector: &str, name: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            DomOp::SetCssVar {
                selector: s,
                name: n,
                value,
            } if s == selector && n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// The last text written to `selector`.
    pub fn text(&self, selector: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            DomOp::SetText { selector: s, text } if s == selector => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Dom for RecordingDom {
    fn exists(&self, selector: &str) -> bool {
        selector == ":root" || self.elements.contains(selector)
    }

    fn set_text(&mut self, selector: &str, text: &str) {
        self.ops.push(DomOp::SetText {
            selector: selector.to_string(),
            text: text.to_string(),
        });
    }

    fn set_css_var(&mut self, selector: &str, name: &str, value: &str) {
        self.ops.push(DomOp::SetCssVar {
            selector: selector.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn set_visible(&mut self, selector: &str, visible: bool) {
        self.ops.push(DomOp::SetVisible {
            selector: selector.to_string(),
            visible,
        });
    }

    fn toggle_class(&mut self, selector: &str, class: &str, on: bool) {
        self.ops.push(DomOp::ToggleClass {
            selector: selector.to_string(),
            class: class.to_string(),
            on,
        });
    }

    fn build_behaviour(&mut self, behaviour: &str, selector: &str) {
        self.ops.push(DomOp::Build {
            behaviour: behaviour.to_string(),
            selector: selector.to_string(),
        });
    }

    fn teardown_behaviour(&mut self, behaviour: &str, selector: &str) {
        self.ops.push(DomOp::Teardown {
            behaviour: behaviour.to_string(),
            selector: selector.to_string(),
        });
    }
}
