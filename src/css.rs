//! Syntax checks for the CSS-like values accepted in configuration.
//!
//! These are deliberately shallow: they accept the shapes a browser's
//! `background-*` properties accept for a single layer, and nothing that
//! would need a full CSS parser.

const UNITS: &[&str] = &[
    "px", "em", "rem", "cm", "mm", "in", "pt", "pc", "ex", "ch", "vh", "vw", "vmin", "vmax", "%",
];

const POSITION_KEYWORDS: &[&str] = &["left", "top", "center", "bottom", "right"];

/// An unsigned integer followed by a CSS length unit, e.g. `120px` or `50%`.
pub fn is_length(value: &str) -> bool {
    let digits = value.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let unit = value[digits..].to_ascii_lowercase();
    UNITS.contains(&unit.as_str())
}

fn one_or_two<F>(value: &str, accept: F) -> bool
where
    F: Fn(&str) -> bool,
{
    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    matches!(parts.len(), 1 | 2) && parts.iter().all(|part| accept(part))
}

fn is_global_keyword(value: &str) -> bool {
    value.eq_ignore_ascii_case("initial") || value.eq_ignore_ascii_case("inherit")
}

pub fn is_background_size(value: &str) -> bool {
    let value = value.trim();
    is_global_keyword(value)
        || ["contain", "cover"]
            .iter()
            .any(|kw| value.eq_ignore_ascii_case(kw))
        || one_or_two(value, is_length)
}

pub fn is_background_repeat(value: &str) -> bool {
    let value = value.trim();
    is_global_keyword(value)
        || ["repeat", "repeat-x", "repeat-y", "no-repeat"]
            .iter()
            .any(|kw| value.eq_ignore_ascii_case(kw))
}

pub fn is_background_position(value: &str) -> bool {
    let value = value.trim();
    let is_keyword = |part: &str| {
        POSITION_KEYWORDS
            .iter()
            .any(|kw| part.eq_ignore_ascii_case(kw))
    };
    is_global_keyword(value) || one_or_two(value, is_keyword) || one_or_two(value, is_length)
}

/// Hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), functional (`rgb(...)`,
/// `hsla(...)`, ...) or named colors.
pub fn is_color(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = value.to_ascii_lowercase();
    for func in ["rgb(", "rgba(", "hsl(", "hsla("] {
        if let Some(args) = lower.strip_prefix(func) {
            return args
                .strip_suffix(')')
                .is_some_and(|inner| !inner.trim().is_empty() && !inner.contains(['(', ')']));
        }
    }
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
}
