//! Declarative cross-setting constraints.
//!
//! A [`DependencyRule`] says: when `trigger` changes to a value matching
//! `when`, `target` must equal `value`. Rules are evaluated once, for the
//! setting the user changed. Corrective writes never evaluate rules
//! themselves, so a mutual pair such as
//!
//! - layout ≠ list ⇒ view = excerpt
//! - view = full ⇒ layout = list
//!
//! settles after at most one step and cannot loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::predicate::{loose_eq, Predicate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRule {
    pub trigger: String,
    pub when: Predicate,
    pub target: String,
    pub value: Value,
}

impl DependencyRule {
    pub fn new(
        trigger: impl Into<String>,
        when: Predicate,
        target: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            when,
            target: target.into(),
            value: value.into(),
        }
    }

    /// The corrective write for `target`, if the rule fires and the target
    /// is out of compliance.
    pub fn correction(&self, trigger_value: &Value, target_value: &Value) -> Option<Value> {
        if !self.when.matches(trigger_value) || loose_eq(target_value, &self.value) {
            return None;
        }
        Some(self.value.clone())
    }
}

/// Computes the corrective writes a change to `trigger` requires.
///
/// `current` reads a setting's value as it stands after the change. Rules
/// are considered in order; a later rule on the same target sees the
/// correction of an earlier one.
pub fn propagate<F>(
    rules: &[DependencyRule],
    trigger: &str,
    value: &Value,
    current: F,
) -> Vec<(String, Value)>
where
    F: Fn(&str) -> Option<Value>,
{
    let mut writes: Vec<(String, Value)> = Vec::new();
    for rule in rules.iter().filter(|r| r.trigger == trigger) {
        let target_value = writes
            .iter()
            .rev()
            .find(|(id, _)| *id == rule.target)
            .map(|(_, v)| v.clone())
            .or_else(|| current(&rule.target))
            .unwrap_or(Value::Null);
        if let Some(corrected) = rule.correction(value, &target_value) {
            writes.push((rule.target.clone(), corrected));
        }
    }
    writes
}
