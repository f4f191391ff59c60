//! The default-resolution chain.
//!
//! A setting's default comes from the first link that has one:
//!
//! 1. the explicit `default` declared on the definition
//! 2. a value read from the token document when the setting was generated
//! 3. a constant fallback chosen by the setting's type
//!
//! Token-derived settings run the chain once at generation time and store the
//! result as their explicit default, so reading a schema afterwards only ever
//! needs [`resolve_default`].

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::types::{SettingDefinition, SettingType};

/// Which link of the chain produced a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOrigin {
    Explicit,
    Tokens,
    Fallback,
}

impl fmt::Display for DefaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefaultOrigin::Explicit => "explicit",
            DefaultOrigin::Tokens => "tokens",
            DefaultOrigin::Fallback => "fallback",
        })
    }
}

/// A default value and the link that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDefault {
    pub value: Value,
    pub origin: DefaultOrigin,
}

/// The type-based fallback constant.
///
/// | Type | Fallback |
/// |------|----------|
/// | checkbox | `false` |
/// | radio, select | first choice key, or `null` without choices |
/// | number, range | `0` |
/// | anything else | `""` |
pub fn type_fallback(kind: SettingType, choices: &IndexMap<String, String>) -> Value {
    match kind {
        SettingType::Checkbox => Value::Bool(false),
        SettingType::Radio | SettingType::Select => choices
            .keys()
            .next()
            .map(|k| Value::String(k.clone()))
            .unwrap_or(Value::Null),
        SettingType::Number | SettingType::Range => Value::from(0),
        _ => Value::String(String::new()),
    }
}

/// The default of `def`: its explicit default, else the type fallback.
///
/// A pure function of the definition's default, type and choices.
pub fn resolve_default(def: &SettingDefinition) -> Value {
    match &def.default {
        Some(value) if !value.is_null() => value.clone(),
        _ => type_fallback(def.kind, &def.choices),
    }
}

/// Builder for the three-link chain.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tinct_schema::{DefaultChain, DefaultOrigin, SettingType};
///
/// let resolved = DefaultChain::new(SettingType::Color)
///     .token_value(json!("#336699"))
///     .resolve();
/// assert_eq!(resolved.value, json!("#336699"));
/// assert_eq!(resolved.origin, DefaultOrigin::Tokens);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultChain<'a> {
    kind: SettingType,
    explicit: Option<Value>,
    token: Option<Value>,
    choices: Option<&'a IndexMap<String, String>>,
}

impl<'a> DefaultChain<'a> {
    pub fn new(kind: SettingType) -> Self {
        Self {
            kind,
            explicit: None,
            token: None,
            choices: None,
        }
    }

    /// Starts a chain from a definition's type, choices and explicit default.
    pub fn for_definition(def: &'a SettingDefinition) -> Self {
        Self {
            kind: def.kind,
            explicit: def.default.clone(),
            token: None,
            choices: Some(&def.choices),
        }
    }

    pub fn explicit(mut self, value: impl Into<Value>) -> Self {
        self.explicit = Some(value.into());
        self
    }

    /// The value found in the token document. `null` and empty strings or
    /// containers count as absent.
    pub fn token_value(mut self, value: impl Into<Value>) -> Self {
        self.token = Some(value.into());
        self
    }

    pub fn choices(mut self, choices: &'a IndexMap<String, String>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn resolve(&self) -> ResolvedDefault {
        if let Some(value) = self.explicit.as_ref().filter(|v| !v.is_null()) {
            return ResolvedDefault {
                value: value.clone(),
                origin: DefaultOrigin::Explicit,
            };
        }
        if let Some(value) = self.token.as_ref().filter(|v| is_present(v)) {
            return ResolvedDefault {
                value: value.clone(),
                origin: DefaultOrigin::Tokens,
            };
        }
        let empty = IndexMap::new();
        ResolvedDefault {
            value: type_fallback(self.kind, self.choices.unwrap_or(&empty)),
            origin: DefaultOrigin::Fallback,
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
