//! The preview binding client.
//!
//! [`PreviewClient`] holds the current value of every setting, applies
//! bindings when values change, fans changes out to subscribers, enforces
//! dependency rules and rebinds stateful behaviours. It persists nothing.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tinct_schema::{resolve_default, ModStore, ResetTarget, SettingsSchema};

use crate::behaviour::Behaviour;
use crate::binding::{Binding, BindingState};
use crate::dom::Dom;
use crate::error::PreviewError;
use crate::manifest::PreviewManifest;
use crate::predicate::loose_eq;
use crate::rules::{propagate, DependencyRule};

type Callback = Box<dyn FnMut(&str, &Value)>;

/// Handle returned by [`PreviewClient::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// What one call changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeReport {
    /// Settings written, in order: the requested change first, then any
    /// corrective writes.
    pub changes: Vec<(String, Value)>,
    /// The subset of `changes` made by dependency rules.
    pub corrections: Vec<(String, Value)>,
    /// Bindings that wrote to the DOM.
    pub applied: usize,
}

impl ChangeReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn extend(&mut self, other: ChangeReport) {
        self.changes.extend(other.changes);
        self.corrections.extend(other.corrections);
        self.applied += other.applied;
    }
}

struct Subscriber {
    id: SubscriptionId,
    setting: String,
    callback: Callback,
}

/// Live-preview client over a [`Dom`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_preview::{Binding, PreviewClient, RecordingDom};
///
/// let mut client = PreviewClient::new(RecordingDom::new())
///     .with_value("colors_palette_primary", json!("#336699"));
/// client.bind(Binding::css_var("colors_palette_primary", "--wp--preset--color--primary"));
///
/// client.set("colors_palette_primary", json!("#112233")).unwrap();
/// assert_eq!(
///     client.dom().css_var(":root", "--wp--preset--color--primary"),
///     Some("#112233")
/// );
/// ```
pub struct PreviewClient<D: Dom> {
    dom: D,
    values: IndexMap<String, Value>,
    defaults: IndexMap<String, Value>,
    subgroups: IndexMap<String, ResetTarget>,
    bindings: Vec<(Binding, BindingState)>,
    rules: Vec<DependencyRule>,
    behaviours: Vec<Behaviour>,
    subscribers: Vec<Subscriber>,
    next_subscription: usize,
}

impl<D: Dom> PreviewClient<D> {
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            values: IndexMap::new(),
            defaults: IndexMap::new(),
            subgroups: IndexMap::new(),
            bindings: Vec::new(),
            rules: Vec::new(),
            behaviours: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// A client seeded with every value-holding setting in `schema`, at its
    /// stored value or default.
    pub fn from_schema(dom: D, schema: &SettingsSchema, mods: &dyn ModStore) -> Self {
        let mut client = Self::new(dom);
        for setting in schema.settings() {
            if setting.definition.kind.is_structural() {
                continue;
            }
            if let Some(subgroup) = setting.subgroup() {
                client.subgroups.insert(
                    setting.id.clone(),
                    ResetTarget::new(setting.group_name, subgroup),
                );
            }
            let default = resolve_default(setting.definition);
            let value = mods.get(&setting.id, default.clone());
            client.defaults.insert(setting.id.clone(), default);
            client.values.insert(setting.id, value);
        }
        client
    }

    /// Declares a setting with its current value (and default).
    pub fn with_value(mut self, id: impl Into<String>, value: Value) -> Self {
        let id = id.into();
        self.defaults.entry(id.clone()).or_insert_with(|| value.clone());
        self.values.insert(id, value);
        self
    }

    /// Loads bindings, rules and behaviours from a manifest.
    pub fn with_manifest(mut self, manifest: PreviewManifest) -> Self {
        for binding in manifest.bindings {
            self.bind(binding);
        }
        self.rules.extend(manifest.rules);
        for spec in manifest.behaviours {
            self.behaviours.push(Behaviour::new(spec));
        }
        self
    }

    pub fn add_rule(&mut self, rule: DependencyRule) {
        self.rules.push(rule);
    }

    pub fn add_behaviour(&mut self, behaviour: Behaviour) {
        self.behaviours.push(behaviour);
    }

    /// Attaches a binding. Returns its index.
    pub fn bind(&mut self, binding: Binding) -> usize {
        if !self.values.contains_key(&binding.setting) {
            tracing::debug!(setting = %binding.setting, "binding for undeclared setting");
        }
        self.bindings.push((binding, BindingState::Bound));
        self.bindings.len() - 1
    }

    pub fn binding_state(&self, index: usize) -> Option<BindingState> {
        self.bindings.get(index).map(|(_, state)| *state)
    }

    /// Registers a callback for changes to `setting`. Callbacks run
    /// synchronously, in subscription order.
    pub fn subscribe<F>(&mut self, setting: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: FnMut(&str, &Value) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            setting: setting.into(),
            callback: Box::new(callback),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    /// Applies every binding and behaviour with the current values.
    pub fn apply_all(&mut self) -> usize {
        let mut applied = 0;
        for (binding, state) in &mut self.bindings {
            if let Some(value) = self.values.get(&binding.setting) {
                *state = BindingState::Notified;
                if binding.apply(value, &mut self.dom) {
                    applied += 1;
                }
                *state = BindingState::Applied;
            }
        }
        for behaviour in &mut self.behaviours {
            if let Some(value) = self.values.get(&behaviour.spec().setting) {
                behaviour.rebind(value, &mut self.dom);
            }
        }
        applied
    }

    /// Handles a change event for `id`.
    ///
    /// A value equal to the current one is a no-op. Otherwise bindings,
    /// subscribers and behaviours see the change, then the dependency rules
    /// triggered by `id` run once and their corrections are delivered the
    /// same way, without triggering further rules.
    pub fn set(&mut self, id: &str, value: Value) -> Result<ChangeReport, PreviewError> {
        let current = self
            .values
            .get(id)
            .ok_or_else(|| PreviewError::UnknownSetting(id.to_string()))?;
        let mut report = ChangeReport::default();
        if loose_eq(current, &value) {
            return Ok(report);
        }

        report.applied += self.deliver(id, value.clone());
        report.changes.push((id.to_string(), value.clone()));

        let corrections = propagate(&self.rules, id, &value, |target| {
            self.values.get(target).cloned()
        });
        for (target, corrected) in corrections {
            if !self.values.contains_key(&target) {
                continue;
            }
            tracing::debug!(trigger = id, target = %target, "dependency rule corrected setting");
            report.applied += self.deliver(&target, corrected.clone());
            report.changes.push((target.clone(), corrected.clone()));
            report.corrections.push((target, corrected));
        }
        Ok(report)
    }

    /// Declares which reset subgroup `id` belongs to.
    pub fn with_subgroup(mut self, id: impl Into<String>, target: ResetTarget) -> Self {
        self.subgroups.insert(id.into(), target);
        self
    }

    /// Writes each setting of a reset subgroup back to its default.
    ///
    /// Membership comes from the schema, so `header` never reaches into a
    /// sibling `header_top`.
    pub fn reset_group(&mut self, category: &str, kind: &str) -> ChangeReport {
        let ids: Vec<String> = self
            .subgroups
            .iter()
            .filter(|(id, target)| {
                self.defaults.contains_key(*id) && target.matches(category, Some(kind))
            })
            .map(|(id, _)| id.clone())
            .collect();
        let mut report = ChangeReport::default();
        for id in ids {
            let Some(default) = self.defaults.get(&id).cloned() else {
                continue;
            };
            if let Ok(change) = self.set(&id, default) {
                report.extend(change);
            }
        }
        report
    }

    /// Stores `value` and notifies everything bound to `id`.
    fn deliver(&mut self, id: &str, value: Value) -> usize {
        self.values.insert(id.to_string(), value.clone());

        let mut applied = 0;
        for (binding, state) in self.bindings.iter_mut().filter(|(b, _)| b.setting == id) {
            *state = BindingState::Notified;
            if binding.apply(&value, &mut self.dom) {
                applied += 1;
            }
            *state = BindingState::Applied;
        }
        for subscriber in self.subscribers.iter_mut().filter(|s| s.setting == id) {
            (subscriber.callback)(id, &value);
        }
        for behaviour in self.behaviours.iter_mut().filter(|b| b.spec().setting == id) {
            behaviour.rebind(&value, &mut self.dom);
        }
        applied
    }
}

impl<D: Dom + fmt::Debug> fmt::Debug for PreviewClient<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewClient")
            .field("dom", &self.dom)
            .field("values", &self.values)
            .field("bindings", &self.bindings.len())
            .field("rules", &self.rules.len())
            .field("behaviours", &self.behaviours.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKind;
    use crate::dom::RecordingDom;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn client() -> PreviewClient<RecordingDom> {
        PreviewClient::new(RecordingDom::with_elements([".site-footer__credit"]))
            .with_value("footer_credit", json!("Proudly powered by tinct"))
            .with_value("header_sticky", json!(true))
    }

    #[test]
    fn binding_states_advance() {
        let mut client = client();
        let index = client.bind(Binding::new(
            "footer_credit",
            ".site-footer__credit",
            BindingKind::Text,
        ));
        assert_eq!(client.binding_state(index), Some(BindingState::Bound));

        client.set("footer_credit", json!("Hello")).unwrap();
        assert_eq!(client.binding_state(index), Some(BindingState::Applied));
        assert_eq!(client.dom().text(".site-footer__credit"), Some("Hello"));
    }

    #[test]
    fn unchanged_value_is_a_noop() {
        let mut client = client();
        client.bind(Binding::new("footer_credit", ".site-footer__credit", BindingKind::Text));
        let report = client
            .set("footer_credit", json!("Proudly powered by tinct"))
            .unwrap();
        assert!(report.is_empty());
        assert!(client.dom().ops().is_empty());
    }

    #[test]
    fn subscribers_run_in_order() {
        let mut client = client();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            client.subscribe("header_sticky", move |_, value| {
                log.borrow_mut().push(format!("{}:{}", name, value));
            });
        }
        client.set("header_sticky", json!(false)).unwrap();
        assert_eq!(*log.borrow(), vec!["first:false", "second:false"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut client = client();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = client.subscribe("header_sticky", move |_, _| *counter.borrow_mut() += 1);
        assert!(client.unsubscribe(id));
        client.set("header_sticky", json!(false)).unwrap();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn unknown_setting_is_an_error() {
        let mut client = client();
        assert!(matches!(
            client.set("nope", json!(1)),
            Err(PreviewError::UnknownSetting(_))
        ));
    }
}
