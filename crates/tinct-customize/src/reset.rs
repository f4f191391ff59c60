//! Grouped reset of setting overrides.

use std::collections::HashSet;

use tinct_schema::{ModStore, ResetTarget, SchemaRegistry};

use crate::error::ResetError;

/// Capability required to reset settings by default.
pub const RESET_CAPABILITY: &str = "edit_theme_options";

/// Answers whether the current caller holds a capability.
pub trait Capabilities {
    fn has(&self, capability: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Capabilities for F {
    fn has(&self, capability: &str) -> bool {
        self(capability)
    }
}

/// A fixed set of granted capabilities.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet(HashSet<String>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, capability: impl Into<String>) -> Self {
        self.0.insert(capability.into());
        self
    }
}

impl Capabilities for CapabilitySet {
    fn has(&self, capability: &str) -> bool {
        self.0.contains(capability)
    }
}

/// The settings a reset matched and the overrides it removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetOutcome {
    pub matched: Vec<String>,
    pub removed: Vec<String>,
}

/// Removes every override in a subgroup.
///
/// A target matches the value-holding settings of group `category` whose
/// subgroup is exactly `type`. Sibling subgroups sharing a prefix
/// (`header` and `header_top`) stay apart. Headings and buttons in the
/// subgroup are ignored.
pub struct ResetEndpoint<'a> {
    registry: &'a SchemaRegistry,
    store: &'a dyn ModStore,
    capability: String,
}

impl<'a> ResetEndpoint<'a> {
    pub fn new(registry: &'a SchemaRegistry, store: &'a dyn ModStore) -> Self {
        Self {
            registry,
            store,
            capability: RESET_CAPABILITY.to_string(),
        }
    }

    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capability = capability.into();
        self
    }

    /// Setting ids the target covers, in schema order.
    pub fn targets(&self, target: &ResetTarget) -> Vec<String> {
        self.registry
            .get()
            .subgroup_members(target)
            .filter(|s| !s.definition.kind.is_structural())
            .map(|s| s.id)
            .collect()
    }

    pub fn handle(
        &self,
        target: &ResetTarget,
        caller: &dyn Capabilities,
    ) -> Result<ResetOutcome, ResetError> {
        if !caller.has(&self.capability) {
            tracing::warn!(
                category = %target.category,
                kind = %target.kind,
                "unauthorized reset request"
            );
            return Err(ResetError::Unauthorized {
                capability: self.capability.clone(),
            });
        }

        let matched = self.targets(target);
        let mut removed = Vec::new();
        for id in &matched {
            if self.store.contains(id) {
                self.store.remove(id)?;
                removed.push(id.clone());
            }
        }
        tracing::debug!(
            category = %target.category,
            kind = %target.kind,
            removed = removed.len(),
            "reset settings group"
        );
        Ok(ResetOutcome { matched, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tinct_schema::MemoryModStore;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .set_raw(json!({"colors": {"settings": {
                "palette_heading": {"type": "subheading"},
                "palette_primary": {"type": "color", "default": "#336699"},
                "palette_base": {"type": "color", "default": "#ffffff"},
                "palette_reset": {"type": "button", "reset": {"category": "colors", "type": "palette"}},
                "header_text": {"type": "color", "default": "#111111"}
            }}}))
            .unwrap();
        registry
    }

    fn mods() -> MemoryModStore {
        MemoryModStore::new()
            .with("colors_palette_primary", json!("#112233"))
            .with("colors_header_text", json!("#000000"))
    }

    #[test]
    fn removes_only_the_target_subgroup() {
        let registry = registry();
        let mods = mods();
        let endpoint = ResetEndpoint::new(&registry, &mods);
        let caller = CapabilitySet::new().grant(RESET_CAPABILITY);

        let outcome = endpoint
            .handle(&ResetTarget::new("colors", "palette"), &caller)
            .unwrap();

        assert_eq!(
            outcome.matched,
            vec!["colors_palette_primary", "colors_palette_base"]
        );
        assert_eq!(outcome.removed, vec!["colors_palette_primary"]);
        assert!(!mods.contains("colors_palette_primary"));
        assert!(mods.contains("colors_header_text"));
    }

    #[test]
    fn sibling_subgroup_with_shared_prefix_is_untouched() {
        let mut registry = SchemaRegistry::new();
        registry
            .set_raw(json!({"colors": {"settings": {
                "header_heading": {"type": "subheading", "subgroup": "header"},
                "header_text": {"type": "color", "default": "#111111", "subgroup": "header"},
                "header_reset": {"type": "button", "subgroup": "header",
                    "reset": {"category": "colors", "type": "header"}},
                "header_top_heading": {"type": "subheading", "subgroup": "header_top"},
                "header_top_text": {"type": "color", "default": "#222222", "subgroup": "header_top"},
                "header_top_reset": {"type": "button", "subgroup": "header_top",
                    "reset": {"category": "colors", "type": "header_top"}}
            }}}))
            .unwrap();
        let mods = MemoryModStore::new()
            .with("colors_header_text", json!("#000000"))
            .with("colors_header_top_text", json!("#333333"));
        let caller = CapabilitySet::new().grant(RESET_CAPABILITY);

        let outcome = ResetEndpoint::new(&registry, &mods)
            .handle(&ResetTarget::new("colors", "header"), &caller)
            .unwrap();

        assert_eq!(outcome.matched, vec!["colors_header_text"]);
        assert_eq!(outcome.removed, vec!["colors_header_text"]);
        assert!(mods.contains("colors_header_top_text"));
    }

    #[test]
    fn unauthorized_reset_mutates_nothing() {
        let registry = registry();
        let mods = mods();
        let endpoint = ResetEndpoint::new(&registry, &mods);
        let caller = |_: &str| false;

        let err = endpoint
            .handle(&ResetTarget::new("colors", "palette"), &caller)
            .unwrap_err();
        assert!(matches!(err, ResetError::Unauthorized { .. }));
        assert_eq!(mods.len(), 2);
    }
}
