//! Stateful DOM behaviours keyed off a setting.
//!
//! A behaviour (a masonry layout engine, say) owns listeners on the page, so
//! it must be torn down before it is built again. On every change of its
//! setting the existing instance is destroyed first; a new one is built only
//! if the new value matches `when`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dom::Dom;
use crate::predicate::Predicate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourSpec {
    pub name: String,
    pub setting: String,
    pub selector: String,
    pub when: Predicate,
}

/// A behaviour and whether an instance is live.
#[derive(Debug, Clone)]
pub struct Behaviour {
    spec: BehaviourSpec,
    active: bool,
}

impl Behaviour {
    pub fn new(spec: BehaviourSpec) -> Self {
        Self {
            spec,
            active: false,
        }
    }

    pub fn spec(&self) -> &BehaviourSpec {
        &self.spec
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rebinds for `value`: teardown of any live instance, then a
    /// conditional build.
    pub fn rebind(&mut self, value: &Value, dom: &mut dyn Dom) {
        if self.active {
            dom.teardown_behaviour(&self.spec.name, &self.spec.selector);
            self.active = false;
        }
        if self.spec.when.matches(value) && dom.exists(&self.spec.selector) {
            dom.build_behaviour(&self.spec.name, &self.spec.selector);
            self.active = true;
        }
    }
}
