//! Subjects and the rules applied to them

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::rule::RuleSpec;
use crate::value::kind;

/// Rules for one subject, keyed by rule name, in declaration order.
pub type RuleSet = IndexMap<String, RuleSpec>;

/// One subject to validate and the rules to run against it.
///
/// # Example
///
/// ```rust
/// use rulebook::{Entry, RuleSpec};
/// use serde_json::json;
///
/// let entry = Entry::new("foo@bar.com")
///     .rule("isEmail", RuleSpec::flag())
///     .rule("isLength", RuleSpec::args(json!([3, 64])).with_message("Wrong length"))
///     .named("Email");
///
/// assert_eq!(entry.rules.len(), 2);
/// assert_eq!(entry.name.as_deref(), Some("Email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Entry {
    /// Subject under test. Missing values validate as `null`.
    #[serde(default)]
    pub value: Value,
    /// Rules to apply, in order.
    pub rules: RuleSet,
    /// Optional human label, carried into the report.
    #[serde(default)]
    pub name: Option<String>,
}

impl Entry {
    /// Entry with no rules.
    pub fn new(value: impl Into<Value>) -> Self {
        Entry {
            value: value.into(),
            rules: RuleSet::new(),
            name: None,
        }
    }

    /// Add or replace a rule.
    pub fn rule(mut self, name: impl Into<String>, spec: impl Into<RuleSpec>) -> Self {
        self.rules.insert(name.into(), spec.into());
        self
    }

    /// Set the human label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Read an entry from dynamic input of the form
    /// `{ "value": ..., "rules": { ... }, "name": "..." }`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEntry`] when `input` is not an object or has no
    /// `rules` object. `key` names the entry in the error.
    pub fn from_value(key: &str, input: &Value) -> Result<Self> {
        let Value::Object(fields) = input else {
            return Err(Error::invalid_entry(
                key,
                format!("expected an object, got {}", kind(input)),
            ));
        };
        let rules = match fields.get("rules") {
            Some(rules) => parse_rules(key, rules)?,
            None => return Err(Error::invalid_entry(key, "missing `rules`")),
        };
        Ok(Entry {
            value: fields.get("value").cloned().unwrap_or(Value::Null),
            rules,
            name: fields.get("name").and_then(Value::as_str).map(str::to_string),
        })
    }
}

/// Read a rule set from a dynamic `{ ruleName: spec }` object.
///
/// # Errors
///
/// [`Error::InvalidEntry`] when `rules` is not an object.
pub fn parse_rules(key: &str, rules: &Value) -> Result<RuleSet> {
    match rules {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(rule, spec)| (rule.clone(), RuleSpec::from(spec.clone())))
            .collect()),
        other => Err(Error::invalid_entry(
            key,
            format!("`rules` must be an object, got {}", kind(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleArgs;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let entry = Entry::from_value(
            "0",
            &json!({
                "value": "foo",
                "name": "Foo",
                "rules": { "isEmail": true, "isLength": { "args": [1, 3], "msg": "Too long" } }
            }),
        )
        .unwrap();
        assert_eq!(entry.value, json!("foo"));
        assert_eq!(entry.name.as_deref(), Some("Foo"));
        let names: Vec<&str> = entry.rules.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["isEmail", "isLength"]);
        assert_eq!(
            entry.rules["isLength"],
            RuleSpec::WithArgsAndMessage(
                RuleArgs::List(vec![json!(1), json!(3)]),
                "Too long".to_string()
            )
        );
    }

    #[test]
    fn test_missing_value_is_null() {
        let entry = Entry::from_value("a", &json!({ "rules": { "isNull": true } })).unwrap();
        assert_eq!(entry.value, Value::Null);
    }

    #[test]
    fn test_invalid_entries() {
        assert_eq!(
            Entry::from_value("a", &json!("foo")).unwrap_err(),
            Error::invalid_entry("a", "expected an object, got string")
        );
        assert_eq!(
            Entry::from_value("b", &json!({ "value": 1 })).unwrap_err(),
            Error::invalid_entry("b", "missing `rules`")
        );
        assert_eq!(
            Entry::from_value("c", &json!({ "value": 1, "rules": [] })).unwrap_err(),
            Error::invalid_entry("c", "`rules` must be an object, got array")
        );
    }

    #[test]
    fn test_deserialize() {
        let entry: Entry = serde_json::from_value(json!({
            "value": 11,
            "rules": { "min": { "args": 10 } }
        }))
        .unwrap();
        assert_eq!(entry.value, json!(11));
        assert_eq!(entry.rules["min"], RuleSpec::args(10));
        assert_eq!(entry.name, None);
    }

    #[test]
    fn test_builder() {
        let entry = Entry::new(5).rule("min", RuleSpec::args(1)).rule("min", RuleSpec::args(2));
        assert_eq!(entry.rules.len(), 1);
        assert_eq!(entry.rules["min"], RuleSpec::args(2));
    }
}
