//! Regex pattern presets and the builder-tier pattern composer.
//!
//! Pattern tests resolve their regex from one of three tiers: a named preset
//! from the library below, a builder composition (character class + length +
//! prefix/suffix), or a user-supplied advanced pattern. Matching is always
//! full-string, regardless of anchors in the pattern itself.

use regex::Regex;

/// Preset library: (name, pattern, description).
pub const REGEX_PRESETS: &[(&str, &str, &str)] = &[
    (
        "email",
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
        "Email address",
    ),
    (
        "phone_us",
        r"^(\+1[-.\s]?)?(\(?\d{3}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}$",
        "US phone number (with optional country code and formatting)",
    ),
    ("zip_us_5", r"^\d{5}$", "US 5-digit ZIP code"),
    (
        "zip_us_9",
        r"^\d{5}(-\d{4})?$",
        "US ZIP+4 code (5 digits or 5+4 format)",
    ),
    ("url", r"^https?://[^\s/$.?#].[^\s]*$", "URL (HTTP or HTTPS)"),
    (
        "uuid",
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        "Universally Unique Identifier (UUID)",
    ),
    (
        "ipv4",
        r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
        "IPv4 address",
    ),
    (
        "ipv6",
        r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|:((:[0-9a-fA-F]{1,4}){1,7}|:)|fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]+|::(ffff(:0{1,4})?:)?((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9])|([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9]))$",
        "IPv6 address",
    ),
    ("numeric_only", r"^\d+$", "Numbers only (0-9)"),
    (
        "alphanumeric_only",
        r"^[a-zA-Z0-9]+$",
        "Letters and numbers only",
    ),
    ("letters_only", r"^[a-zA-Z]+$", "Letters only (A-Z, a-z)"),
];

/// Looks up the regex for a named preset.
pub fn preset_pattern(preset_name: &str) -> Option<&'static str> {
    REGEX_PRESETS
        .iter()
        .find(|(name, _, _)| *name == preset_name)
        .map(|(_, pattern, _)| *pattern)
}

/// Looks up the description for a named preset.
pub fn preset_description(preset_name: &str) -> Option<&'static str> {
    REGEX_PRESETS
        .iter()
        .find(|(name, _, _)| *name == preset_name)
        .map(|(_, _, description)| *description)
}

/// All preset names, in library order.
pub fn preset_names() -> Vec<&'static str> {
    REGEX_PRESETS.iter().map(|(name, _, _)| *name).collect()
}

/// Compiles a pattern, surfacing the regex error for reporting.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

/// Full-string match: the pattern must consume the entire value.
pub fn is_full_match(regex: &Regex, value: &str) -> bool {
    regex
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len())
}

/// Builds a regex from builder-tier parameters.
///
/// Character classes compose into one bracket expression; the length
/// constraint becomes a quantifier; prefix/suffix literals are escaped and
/// the whole pattern is anchored.
pub fn build_pattern_from_builder(
    allowed_characters: &[String],
    length_exact: Option<usize>,
    length_min: Option<usize>,
    length_max: Option<usize>,
    starts_with: Option<&str>,
    ends_with: Option<&str>,
) -> String {
    let mut char_class_parts = Vec::new();
    for char_type in allowed_characters {
        match char_type.as_str() {
            "digits" => char_class_parts.push("0-9"),
            "letters" => char_class_parts.push("a-zA-Z"),
            "alphanumeric" => char_class_parts.push("a-zA-Z0-9"),
            "uppercase" => char_class_parts.push("A-Z"),
            "lowercase" => char_class_parts.push("a-z"),
            _ => {}
        }
    }

    let char_class = if char_class_parts.is_empty() {
        ".".to_string()
    } else {
        format!("[{}]", char_class_parts.join(""))
    };

    let quantifier = match (length_exact, length_min, length_max) {
        (Some(exact), _, _) => format!("{{{exact}}}"),
        (None, Some(min), Some(max)) => format!("{{{min},{max}}}"),
        (None, Some(min), None) => format!("{{{min},}}"),
        (None, None, Some(max)) => format!("{{0,{max}}}"),
        (None, None, None) => "*".to_string(),
    };

    let mut pattern = String::from("^");
    if let Some(prefix) = starts_with {
        pattern.push_str(&regex::escape(prefix));
    }
    pattern.push_str(&char_class);
    pattern.push_str(&quantifier);
    if let Some(suffix) = ends_with {
        pattern.push_str(&regex::escape(suffix));
    }
    pattern.push('$');
    pattern
}
