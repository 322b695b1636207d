//! Coercion of dynamic values into the shapes predicates consume
//!
//! Subjects and rule arguments arrive as [`serde_json::Value`]. Every
//! predicate receives its subject as a string, coerced with the same loose
//! rules a scripting runtime applies: `null` becomes `""`, whole floats lose
//! their fractional part, arrays are joined with `,` and objects collapse to
//! `"[object Object]"`.
//!
//! # Examples
//!
//! ```
//! use rulebook::value::{to_js_string, to_number, parse_float};
//! use serde_json::json;
//!
//! assert_eq!(to_js_string(&json!(null)), "");
//! assert_eq!(to_js_string(&json!(10.0)), "10");
//! assert_eq!(to_js_string(&json!([1, "a", null])), "1,a,");
//! assert_eq!(to_number(&json!(true)), 1.0);
//! assert_eq!(parse_float("12.5px"), 12.5);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").unwrap()
});

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)$").unwrap()
});

/// Coerce a value to the string form predicates operate on.
pub fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_js_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    let magnitude = f.abs();
    if f == 0.0 {
        "0".to_string()
    } else if !(1e-6..1e21).contains(&magnitude) {
        exponent_form(f)
    } else if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Shortest digits with a signed exponent, as in `1e-7` or `1.5e+21`.
fn exponent_form(f: f64) -> String {
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Whitespace as a scripting runtime's `\s` class sees it: the Unicode
/// space separators, the ASCII controls `\t` to `\r`, the line and paragraph
/// separators and the byte order mark. `U+0085` is not included.
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Strip leading and trailing [`is_js_whitespace`] characters.
pub fn js_trim(s: &str) -> &str {
    s.trim_matches(is_js_whitespace)
}

/// Numeric coercion of an argument; non-numeric input yields `NaN`.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => str_to_number(s),
        Value::Array(_) => str_to_number(&to_js_string(value)),
        Value::Object(_) => f64::NAN,
    }
}

/// Numeric coercion of an optional positional argument; absent is `NaN`.
pub fn arg_number(args: &[Value], index: usize) -> f64 {
    args.get(index).map(to_number).unwrap_or(f64::NAN)
}

/// String coercion of an optional positional argument; absent is `""`.
pub fn arg_string(args: &[Value], index: usize) -> String {
    args.get(index).map(to_js_string).unwrap_or_default()
}

fn str_to_number(s: &str) -> f64 {
    let trimmed = js_trim(s);
    if trimmed.is_empty() {
        return 0.0;
    }
    if !NUMERIC_LITERAL.is_match(trimmed) {
        return f64::NAN;
    }
    parse_literal(trimmed)
}

fn parse_literal(literal: &str) -> f64 {
    match literal {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        other => other.parse().unwrap_or(f64::NAN),
    }
}

/// Parse the longest leading decimal literal, ignoring leading whitespace.
///
/// Returns `NaN` when the string does not start with a number.
pub fn parse_float(s: &str) -> f64 {
    FLOAT_PREFIX
        .find(s.trim_start_matches(is_js_whitespace))
        .map(|m| parse_literal(m.as_str()))
        .unwrap_or(f64::NAN)
}

/// Parse the leading base-10 integer, ignoring leading whitespace.
pub fn parse_int(s: &str) -> f64 {
    let s = s.trim_start_matches(is_js_whitespace);
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return f64::NAN;
    }
    digits[..end]
        .parse::<f64>()
        .map(|n| sign * n)
        .unwrap_or(f64::NAN)
}

/// Truthiness of a value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Name of the JSON kind, used in error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
