//! String predicates
//!
//! Character-class, case, length and pattern checks over the coerced
//! subject string.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use super::registry::{Registry, RegistryBuilder};
use crate::error::{Error, Result};
use crate::value::{arg_number, arg_string, to_js_string};

static ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)[A-Z]+$").unwrap());
static ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)[0-9A-Z]+$").unwrap());
static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());
static HEXADECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)[0-9A-F]+$").unwrap());
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)#?(?:[0-9A-F]{3}|[0-9A-F]{6})$").unwrap());
static BASE64: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(?:[A-Z0-9+/]{4})*(?:[A-Z0-9+/]{2}==|[A-Z0-9+/]{3}=|[A-Z0-9+/]{4})$").unwrap()
});

/// Exact string equality.
pub fn equals(s: &str, comparison: &str) -> bool {
    s == comparison
}

/// ASCII letters only, at least one.
pub fn is_alpha(s: &str) -> bool {
    ALPHA.is_match(s)
}

/// ASCII letters and digits only, at least one.
pub fn is_alphanumeric(s: &str) -> bool {
    ALPHANUMERIC.is_match(s)
}

/// Optionally signed run of digits.
pub fn is_numeric(s: &str) -> bool {
    NUMERIC.is_match(s)
}

/// Hexadecimal digits only, at least one.
pub fn is_hexadecimal(s: &str) -> bool {
    HEXADECIMAL.is_match(s)
}

/// Three or six hex digits, with an optional leading `#`.
pub fn is_hex_color(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

/// Unchanged by lowercasing.
pub fn is_lowercase(s: &str) -> bool {
    s == s.to_lowercase()
}

/// Unchanged by uppercasing.
pub fn is_uppercase(s: &str) -> bool {
    s == s.to_uppercase()
}

/// Non-empty and ASCII only.
pub fn is_ascii(s: &str) -> bool {
    !s.is_empty() && s.is_ascii()
}

/// Padded base64 text.
pub fn is_base64(s: &str) -> bool {
    BASE64.is_match(s)
}

/// The empty string. `null`, missing values and empty arrays coerce to it.
pub fn is_null(s: &str) -> bool {
    s.is_empty()
}

/// Character count within `[min, max]`; an absent `max` is unbounded.
///
/// A `NaN` bound never holds.
pub fn is_length(s: &str, min: f64, max: Option<f64>) -> bool {
    within(s.chars().count() as f64, min, max)
}

/// UTF-8 byte count within `[min, max]`; an absent `max` is unbounded.
pub fn is_byte_length(s: &str, min: f64, max: Option<f64>) -> bool {
    within(s.len() as f64, min, max)
}

fn within(len: f64, min: f64, max: Option<f64>) -> bool {
    len >= min && max.is_none_or(|max| len <= max)
}

/// Compile a pattern argument with optional modifier letters.
///
/// The pattern is taken verbatim as the regex source; slashes are ordinary
/// characters. Modifier letters `i`, `m` and `s` map to case-insensitive,
/// multi-line and dot-matches-newline; `d`, `g`, `u` and `y` are accepted
/// and have no effect.
///
/// # Errors
///
/// [`Error::InvalidPattern`] for an unknown modifier or a pattern that does
/// not compile.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::compile_pattern;
///
/// let re = compile_pattern("^[a-z]{4}$", "").unwrap();
/// assert!(re.is_match("yolo"));
///
/// let re = compile_pattern("abc", "i").unwrap();
/// assert!(re.is_match("AbC"));
///
/// let re = compile_pattern("/usr/", "").unwrap();
/// assert!(!re.is_match("usr"));
/// ```
pub fn compile_pattern(pattern: &str, modifiers: &str) -> Result<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in modifiers.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'd' | 'g' | 'u' | 'y' => {}
            other => {
                return Err(Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: format!("invalid flag `{other}`"),
                })
            }
        }
    }
    builder
        .build()
        .map_err(|err| Error::invalid_pattern(pattern, &err))
}

/// Pattern search over the subject, using `args[0]` as the pattern and
/// `args[1]` as modifier letters.
pub(crate) fn pattern_matches(s: &str, args: &[Value]) -> Result<bool> {
    let modifiers = match args.get(1) {
        None | Some(Value::Null) => String::new(),
        Some(other) => to_js_string(other),
    };
    let regex = compile_pattern(&arg_string(args, 0), &modifiers)?;
    Ok(regex.is_match(s))
}

fn optional_bound(args: &[Value], index: usize) -> Option<f64> {
    args.get(index).map(|_| arg_number(args, index))
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register("equals", |s, args| equals(s, &arg_string(args, 0)))
        .register_derived(
            "matches",
            |s: &str, args: &[Value], _: &Registry| -> Result<bool> { pattern_matches(s, args) },
        )
        .register("isAlpha", |s, _| is_alpha(s))
        .register("isAlphanumeric", |s, _| is_alphanumeric(s))
        .register("isNumeric", |s, _| is_numeric(s))
        .register("isHexadecimal", |s, _| is_hexadecimal(s))
        .register("isHexColor", |s, _| is_hex_color(s))
        .register("isLowercase", |s, _| is_lowercase(s))
        .register("isUppercase", |s, _| is_uppercase(s))
        .register("isAscii", |s, _| is_ascii(s))
        .register("isBase64", |s, _| is_base64(s))
        .register("isNull", |s, _| is_null(s))
        .register("isLength", |s, args| {
            is_length(s, arg_number(args, 0), optional_bound(args, 1))
        })
        .register("isByteLength", |s, args| {
            is_byte_length(s, arg_number(args, 0), optional_bound(args, 1))
        })
}
