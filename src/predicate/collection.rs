//! Collection predicates
//!
//! Membership of the subject in a set of options.

use serde_json::Value;

use super::registry::RegistryBuilder;
use crate::value::to_js_string;

/// Whether `s` is one of `options`.
///
/// - an array: `s` equals one of its elements after string coercion,
/// - an object: `s` is one of its keys,
/// - a string: `s` is a substring of it,
/// - anything else (including no options): never.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::is_in;
/// use serde_json::json;
///
/// assert!(is_in("2", Some(&json!([1, 2, 3]))));
/// assert!(is_in("bar", Some(&json!({ "foo": 1, "bar": 2 }))));
/// assert!(is_in("oba", Some(&json!("foobar"))));
/// assert!(!is_in("foo", None));
/// ```
pub fn is_in(s: &str, options: Option<&Value>) -> bool {
    match options {
        Some(Value::Array(items)) => items.iter().any(|item| to_js_string(item) == s),
        Some(Value::Object(map)) => map.contains_key(s),
        Some(Value::String(haystack)) => haystack.contains(s),
        _ => false,
    }
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder.register("isIn", |s, args| is_in(s, args.first()))
}
