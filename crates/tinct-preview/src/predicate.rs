//! Value predicates shared by rules, class toggles and behaviours.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A test over a setting value.
///
/// In YAML: `truthy`, `{ equals: grid }`, `{ not_equals: list }`,
/// `{ one_of: [grid, masonry] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    #[default]
    Truthy,
    Equals(Value),
    NotEquals(Value),
    OneOf(Vec<Value>),
}

impl Predicate {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Predicate::Truthy => is_truthy(value),
            Predicate::Equals(expected) => loose_eq(value, expected),
            Predicate::NotEquals(expected) => !loose_eq(value, expected),
            Predicate::OneOf(options) => options.iter().any(|o| loose_eq(value, o)),
        }
    }
}

/// Truthiness of a posted value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Equality that treats `700`, `700.0` and `"700"` alike.
///
/// Posted values arrive as strings from form controls while defaults may be
/// numbers.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

/// Renders a scalar for insertion into the DOM.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn predicates() {
        assert!(Predicate::Equals(json!("grid")).matches(&json!("grid")));
        assert!(Predicate::NotEquals(json!("list")).matches(&json!("masonry")));
        assert!(!Predicate::NotEquals(json!("list")).matches(&json!("list")));
        assert!(Predicate::OneOf(vec![json!("grid"), json!("masonry")]).matches(&json!("masonry")));
        assert!(Predicate::Truthy.matches(&json!("1")));
        assert!(!Predicate::Truthy.matches(&json!("")));
    }

    #[test]
    fn loose_equality() {
        assert!(loose_eq(&json!(700), &json!("700")));
        assert!(loose_eq(&json!(1.0), &json!(1)));
        assert!(!loose_eq(&json!(true), &json!("true")));
    }

    #[test]
    fn predicate_from_yaml() {
        let p: Predicate = serde_yaml::from_str("not_equals: list").unwrap();
        assert_eq!(p, Predicate::NotEquals(json!("list")));
        let p: Predicate = serde_yaml::from_str("truthy").unwrap();
        assert_eq!(p, Predicate::Truthy);
    }
}
