//! Token paths and the case conventions used at their boundary.
//!
//! Token documents mix conventions: `fontFamilies` next to `line-height`
//! next to `font_sizes`. Paths compare segments by their snake_case form,
//! so callers may address a node in whichever convention they like while
//! the stored document keeps its original keys.

use std::fmt;

use deunicode::deunicode;

/// An ordered list of segments addressing a node in a token document.
///
/// # Example
///
/// ```rust
/// use tinct_tokens::TokenPath;
///
/// let path = TokenPath::parse("typography.fontFamilies");
/// assert_eq!(path.segments(), &["typography", "fontFamilies"]);
/// assert_eq!(path.to_string(), "typography.fontFamilies");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TokenPath {
    segments: Vec<String>,
}

impl TokenPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a dotted path such as `color.palette`.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments normalized to snake_case, with a leading `settings`
    /// segment removed.
    pub fn normalized(&self) -> Vec<String> {
        let mut out: Vec<String> = self.segments.iter().map(|s| to_snake(s)).collect();
        if out.first().map(String::as_str) == Some("settings") {
            out.remove(0);
        }
        out
    }

    /// The cache key for this path: normalized segments joined by `.`.
    pub fn cache_key(&self) -> String {
        self.segments
            .iter()
            .map(|s| to_snake(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for TokenPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl<S: AsRef<str>> From<&[S]> for TokenPath {
    fn from(segments: &[S]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for TokenPath {
    fn from(segments: [S; N]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

impl From<Vec<String>> for TokenPath {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

/// Splits an identifier into lowercase words at case changes and at any
/// character that is not ASCII alphanumeric.
fn words(input: &str) -> Vec<String> {
    let ascii = deunicode(input);
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            current.push(c.to_ascii_lowercase());
        } else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts an identifier to kebab-case: `fontFamily` → `font-family`.
///
/// Digits stay attached to the word they follow, so already-kebab slugs
/// such as `accent-2` or `h1` are returned unchanged.
pub fn to_kebab(input: &str) -> String {
    words(input).join("-")
}

/// Converts an identifier to snake_case: `line-height` → `line_height`.
pub fn to_snake(input: &str) -> String {
    words(input).join("_")
}

/// Turns a slug or key into a label: `line-height` → `Line height`.
pub fn humanize(input: &str) -> String {
    let joined = words(input).join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Whether a document key addresses the same node as a path segment.
pub(crate) fn segment_matches(key: &str, segment: &str) -> bool {
    key == segment || to_snake(key) == to_snake(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_from_camel() {
        assert_eq!(to_kebab("fontFamily"), "font-family");
        assert_eq!(to_kebab("fontFamilies"), "font-families");
    }

    #[test]
    fn kebab_keeps_kebab_and_digits() {
        assert_eq!(to_kebab("accent-2"), "accent-2");
        assert_eq!(to_kebab("h1"), "h1");
        assert_eq!(to_kebab("x-large"), "x-large");
    }

    #[test]
    fn kebab_strips_punctuation_and_unicode() {
        assert_eq!(to_kebab("Café Noir!"), "cafe-noir");
        assert_eq!(to_kebab("  spaced__out  "), "spaced-out");
    }

    #[test]
    fn snake_normalizes_all_conventions() {
        assert_eq!(to_snake("lineHeight"), "line_height");
        assert_eq!(to_snake("line-height"), "line_height");
        assert_eq!(to_snake("line_height"), "line_height");
    }

    #[test]
    fn humanize_labels() {
        assert_eq!(humanize("line-height"), "Line height");
        assert_eq!(humanize("headerBackground"), "Header background");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn segment_matching_crosses_conventions() {
        assert!(segment_matches("fontFamilies", "font_families"));
        assert!(segment_matches("line-height", "lineHeight"));
        assert!(!segment_matches("fontSizes", "font_families"));
    }

    #[test]
    fn path_parse_and_child() {
        let path = TokenPath::parse("settings.color").child("palette");
        assert_eq!(path.to_string(), "settings.color.palette");
        assert_eq!(path.normalized(), vec!["color", "palette"]);
    }

    #[test]
    fn cache_key_is_convention_stable() {
        let a = TokenPath::from(["typography", "fontSizes"]);
        let b = TokenPath::from(["typography", "font_sizes"]);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn parse_skips_empty_segments() {
        assert_eq!(TokenPath::parse("a..b.").segments(), &["a", "b"]);
        assert!(TokenPath::parse("").is_empty());
    }
}
