//! Per-type value sanitizers.
//!
//! Every value-holding [`SettingType`] maps to one [`Sanitizer`]. Sanitizing
//! never fails: out-of-domain input is projected back into the domain, by
//! falling back to the first choice, clamping, or dropping to the default.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Number, Value};
use tinct_schema::{SettingDefinition, SettingType};
use url::Url;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// A value sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sanitizer {
    /// Coerces to `true`/`false`.
    Boolean,
    /// Keeps the value if it is a choice key, else the first choice.
    Choice,
    /// `#rgb` or `#rrggbb`, else the default.
    HexColor,
    /// Numeric cast clamped to `input_attrs.min..=max`.
    Number,
    /// Absolute URL with an allowed scheme, else `""`.
    Url,
    /// Address of the form `local@domain.tld`, else `""`.
    Email,
    /// Attachment id or URL.
    Media,
    /// Single line, tags stripped.
    Text,
    /// Multi-line, tags stripped.
    Textarea,
}

impl Sanitizer {
    /// The sanitizer table. Structural types have none.
    pub fn for_type(kind: SettingType) -> Option<Sanitizer> {
        let sanitizer = match kind {
            SettingType::Checkbox => Sanitizer::Boolean,
            SettingType::Radio | SettingType::Select => Sanitizer::Choice,
            SettingType::Color => Sanitizer::HexColor,
            SettingType::Number | SettingType::Range => Sanitizer::Number,
            SettingType::Url => Sanitizer::Url,
            SettingType::Email => Sanitizer::Email,
            SettingType::Media => Sanitizer::Media,
            SettingType::Textarea => Sanitizer::Textarea,
            SettingType::Text => Sanitizer::Text,
            SettingType::Subheading | SettingType::Button => return None,
        };
        Some(sanitizer)
    }

    pub fn name(self) -> &'static str {
        match self {
            Sanitizer::Boolean => "boolean",
            Sanitizer::Choice => "choice",
            Sanitizer::HexColor => "hex_color",
            Sanitizer::Number => "number",
            Sanitizer::Url => "url",
            Sanitizer::Email => "email",
            Sanitizer::Media => "media",
            Sanitizer::Text => "text",
            Sanitizer::Textarea => "textarea",
        }
    }

    /// Projects `value` into the domain of `def`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use tinct_customize::Sanitizer;
    /// use tinct_schema::{SettingDefinition, SettingType};
    ///
    /// let def = SettingDefinition::new(SettingType::Radio, "Archive view")
    ///     .with_choices([("excerpt", "Excerpt"), ("full", "Full text")]);
    /// assert_eq!(Sanitizer::Choice.sanitize(&json!("bogus"), &def), json!("excerpt"));
    /// ```
    pub fn sanitize(self, value: &Value, def: &SettingDefinition) -> Value {
        match self {
            Sanitizer::Boolean => Value::Bool(truthy(value)),
            Sanitizer::Choice => sanitize_choice(value, def),
            Sanitizer::HexColor => match hex_color(&scalar_string(value)) {
                Some(color) => Value::String(color),
                None => def.resolved_default(),
            },
            Sanitizer::Number => sanitize_number(value, def),
            Sanitizer::Url => Value::String(url(&scalar_string(value)).unwrap_or_default()),
            Sanitizer::Email => {
                let email = scalar_string(value).trim().to_string();
                if EMAIL.is_match(&email) {
                    Value::String(email)
                } else {
                    Value::String(String::new())
                }
            }
            Sanitizer::Media => match value {
                Value::Number(n) if n.as_u64().is_some() => value.clone(),
                _ => Value::String(url(&scalar_string(value)).unwrap_or_default()),
            },
            Sanitizer::Text => Value::String(text(&scalar_string(value), false)),
            Sanitizer::Textarea => Value::String(text(&scalar_string(value), true)),
        }
    }
}

/// Whether `a` and `b` are the same value of `def` once sanitized.
///
/// `#FFFFFF` equals `#ffffff` and `"1.6"` equals `1.6`.
pub fn same_value(def: &SettingDefinition, a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match Sanitizer::for_type(def.kind) {
        Some(sanitizer) => sanitizer.sanitize(a, def) == sanitizer.sanitize(b, def),
        None => false,
    }
}

/// Truthiness of form input.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Validates `#rgb` / `#rrggbb`, lowercased. An empty string stays empty.
pub fn hex_color(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return Some(String::new());
    }
    let hex = input.strip_prefix('#')?;
    match hex.len() {
        3 | 6 if hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            Some(format!("#{}", hex.to_ascii_lowercase()))
        }
        _ => None,
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn sanitize_choice(value: &Value, def: &SettingDefinition) -> Value {
    let key = scalar_string(value);
    if def.choices.contains_key(&key) {
        return Value::String(key);
    }
    match def.choices.keys().next() {
        Some(first) => Value::String(first.clone()),
        None => def.resolved_default(),
    }
}

fn sanitize_number(value: &Value, def: &SettingDefinition) -> Value {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    let Some(mut n) = parsed.filter(|n| n.is_finite()) else {
        return def.resolved_default();
    };
    if let Some(min) = def.input_attrs.min {
        n = n.max(min);
    }
    if let Some(max) = def.input_attrs.max {
        n = n.min(max);
    }
    number_value(n)
}

/// Whole numbers stay integers so `720` does not become `720.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let parsed = Url::parse(input).ok()?;
    if URL_SCHEMES.contains(&parsed.scheme()) {
        Some(parsed.to_string())
    } else {
        tracing::debug!(scheme = parsed.scheme(), "rejected url scheme");
        None
    }
}

fn text(input: &str, multiline: bool) -> String {
    let stripped = TAGS.replace_all(input, "");
    if multiline {
        stripped
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_control()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    } else {
        stripped
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .filter(|c| !c.is_control())
            .collect()
    }
}
