//! Translation between token paths and CSS custom property names.
//!
//! Names follow the pattern `--{prefix}--{kind}--{group}[--{subgroup}]--{slug}`:
//!
//! | Token path | Variable |
//! |------------|----------|
//! | `color.palette` + `primary` | `--wp--preset--color--primary` |
//! | `typography.fontFamilies` + `serif` | `--wp--preset--font-family--serif` |
//! | `typography.fontSizes` + `large` | `--wp--preset--font-size--large` |
//! | `custom.color.header` + `background` | `--wp--custom--color--header--background` |
//!
//! The reverse direction only recovers the slug. Callers that need the full
//! path already know it, so nothing more is encoded.

use crate::path::{to_kebab, TokenPath};

/// Preset collections and the group name their variables use.
///
/// Keys are snake_case normalized token paths (without `settings`).
pub const PRESET_GROUPS: &[(&str, &str)] = &[
    ("color.palette", "color"),
    ("color.gradients", "gradient"),
    ("color.duotone", "duotone"),
    ("typography.font_families", "font-family"),
    ("typography.font_sizes", "font-size"),
    ("spacing.spacing_sizes", "spacing"),
    ("border.radius_sizes", "border-radius"),
    ("shadow.presets", "shadow"),
];

/// Looks up the preset group for a normalized dotted path.
pub fn preset_group(normalized_path: &str) -> Option<&'static str> {
    PRESET_GROUPS
        .iter()
        .find(|(path, _)| *path == normalized_path)
        .map(|(_, group)| *group)
}

/// Builds the CSS variable name for `slug` under `path`.
///
/// Paths into a preset collection use the `preset` segment and the
/// collection's group name; paths under `custom` keep every segment,
/// kebab-cased. Anything else falls back to the kebab-cased path.
///
/// # Example
///
/// ```rust
/// use tinct_tokens::{css_var_from_slug, TokenPath};
///
/// let name = css_var_from_slug("wp", &TokenPath::parse("color.palette"), "Primary");
/// assert_eq!(name, "--wp--preset--color--primary");
///
/// let name = css_var_from_slug("wp", &TokenPath::parse("custom.color.header"), "text");
/// assert_eq!(name, "--wp--custom--color--header--text");
/// ```
pub fn css_var_from_slug(prefix: &str, path: &TokenPath, slug: &str) -> String {
    let normalized = path.normalized();
    let slug = to_kebab(slug);
    let mut parts: Vec<String> = Vec::with_capacity(normalized.len() + 3);
    if !prefix.is_empty() {
        parts.push(to_kebab(prefix));
    }

    if let Some(group) = preset_group(&normalized.join(".")) {
        parts.push("preset".to_string());
        parts.push(group.to_string());
    } else {
        parts.extend(normalized.iter().map(|s| to_kebab(s)));
    }
    parts.push(slug);

    format!("--{}", parts.join("--"))
}

/// Recovers the slug from a variable name or `var(...)` reference.
///
/// Accepts `--wp--preset--color--primary`, `var(--wp--preset--color--primary)`
/// and references with a fallback (`var(--x--slug, #fff)`). Input that is
/// not a variable is treated as a slug already and only kebab-normalized.
///
/// # Example
///
/// ```rust
/// use tinct_tokens::slug_from_css_var;
///
/// assert_eq!(slug_from_css_var("var(--wp--preset--font-size--x-large)"), "x-large");
/// assert_eq!(slug_from_css_var("--wp--custom--color--header--text"), "text");
/// assert_eq!(slug_from_css_var("Large"), "large");
/// ```
pub fn slug_from_css_var(input: &str) -> String {
    let name = variable_name(input);
    match name.strip_prefix("--") {
        Some(rest) => rest
            .rsplit("--")
            .find(|s| !s.is_empty())
            .map(to_kebab)
            .unwrap_or_default(),
        None => to_kebab(name),
    }
}

/// Whether `input` is a variable name or a `var(...)` reference.
pub fn is_css_var(input: &str) -> bool {
    variable_name(input).starts_with("--")
}

/// Wraps a variable name in `var(...)`.
pub fn var_reference(name: &str) -> String {
    format!("var({})", variable_name(name))
}

/// Extracts the bare variable name from a `var(...)` reference.
fn variable_name(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed
        .strip_prefix("var(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => inner.split(',').next().unwrap_or(inner).trim(),
        None => trimmed,
    }
}
