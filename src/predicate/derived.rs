//! Derived predicates
//!
//! Convenience rules layered over the base set. Most of them delegate to a
//! sibling through the [`Registry`] they are handed, so overriding a base
//! predicate also changes every derived rule built on it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::registry::{Registry, RegistryBuilder};
use super::string::{is_null, pattern_matches};
use crate::error::Result;
use crate::value::{arg_number, is_truthy, js_trim, parse_float, to_js_string};

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:-?(?:[0-9]+))?(?:\.[0-9]*)?(?:[eE][+-]?(?:[0-9]+))?$").unwrap()
});

/// At least one character outside [`is_js_whitespace`](crate::value::is_js_whitespace).
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::not_empty;
///
/// assert!(not_empty("  a "));
/// assert!(!not_empty(" \t\r\n"));
/// ```
pub fn not_empty(s: &str) -> bool {
    !js_trim(s).is_empty()
}

/// Decimal literal: optional `-`, digits, fraction and exponent, all optional
/// but the whole string must be non-empty.
pub fn is_decimal(s: &str) -> bool {
    !s.is_empty() && DECIMAL.is_match(s)
}

/// Leading number is at least `bound`. Subjects without a leading number pass.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::min;
///
/// assert!(min("11", 10.0));
/// assert!(!min("9.99999", 10.0));
/// assert!(min("not a number", 10.0));
/// ```
pub fn min(s: &str, bound: f64) -> bool {
    let number = parse_float(s);
    number.is_nan() || number >= bound
}

/// Leading number is at most `bound`. Subjects without a leading number pass.
pub fn max(s: &str, bound: f64) -> bool {
    let number = parse_float(s);
    number.is_nan() || number <= bound
}

/// Substring check that also requires a truthy needle.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::contains;
/// use serde_json::json;
///
/// assert!(contains("foobar", &json!("oba")));
/// assert!(contains("a1", &json!(1)));
/// assert!(!contains("foobar", &json!("")));
/// ```
pub fn contains(s: &str, needle: &Value) -> bool {
    is_truthy(needle) && s.contains(&to_js_string(needle))
}

/// Arguments for a check wrapped by `optional`.
///
/// When the first argument after the check name is an array it supplies the
/// whole argument list.
fn optional_args(rest: &[Value]) -> &[Value] {
    match rest.first() {
        Some(Value::Array(expanded)) => expanded,
        _ => rest,
    }
}

fn optional(s: &str, args: &[Value], registry: &Registry) -> Result<bool> {
    if is_null(s) {
        return Ok(true);
    }
    let Some((check, rest)) = args.split_first() else {
        return Ok(true);
    };
    registry.call(&to_js_string(check), s, optional_args(rest))
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register("notEmpty", |s, _| not_empty(s))
        .register_derived(
            "len",
            |s: &str, args: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isLength", s, &args[..args.len().min(2)])
            },
        )
        .register_derived(
            "isUrl",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isURL", s, &[])
            },
        )
        .register_derived(
            "isIPv4",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isIP", s, &[json!(4)])
            },
        )
        .register_derived(
            "isIPv6",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isIP", s, &[json!(6)])
            },
        )
        .register_derived(
            "notIn",
            |s: &str, args: &[Value], registry: &Registry| -> Result<bool> {
                Ok(!registry.call("isIn", s, &args[..args.len().min(1)])?)
            },
        )
        .register_derived(
            "regex",
            |s: &str, args: &[Value], _: &Registry| -> Result<bool> { pattern_matches(s, args) },
        )
        .register_derived(
            "notRegex",
            |s: &str, args: &[Value], registry: &Registry| -> Result<bool> {
                Ok(!registry.call("regex", s, args)?)
            },
        )
        .register_derived(
            "is",
            |s: &str, args: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("regex", s, args)
            },
        )
        .register_derived(
            "not",
            |s: &str, args: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("notRegex", s, args)
            },
        )
        .register("isDecimal", |s, _| is_decimal(s))
        .register("min", |s, args| min(s, arg_number(args, 0)))
        .register("max", |s, args| max(s, arg_number(args, 0)))
        .register("contains", |s, args| {
            args.first().is_some_and(|needle| contains(s, needle))
        })
        .register_derived(
            "notContains",
            |s: &str, args: &[Value], registry: &Registry| -> Result<bool> {
                Ok(!registry.call("contains", s, args)?)
            },
        )
        .register_derived(
            "notNull",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                Ok(!registry.call("isNull", s, &[])?)
            },
        )
        .register_derived("optional", optional)
        .register_derived(
            "isUUIDv3",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isUUID", s, &[json!("3")])
            },
        )
        .register_derived(
            "isUUIDv4",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isUUID", s, &[json!("4")])
            },
        )
        .register_derived(
            "isUUIDv5",
            |s: &str, _: &[Value], registry: &Registry| -> Result<bool> {
                registry.call("isUUID", s, &[json!("5")])
            },
        )
}
