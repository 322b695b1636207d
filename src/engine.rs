//! Batch runner
//!
//! [`Engine`] walks entries in input order and, for each entry, its rules in
//! declaration order. Every rule is normalized, evaluated against the shared
//! [`Registry`] and recorded as a [`ValidationItem`]. A failing rule is
//! ordinary output; only structural problems (unknown rule, malformed input,
//! bad pattern) abort the run.
//!
//! With [`EngineOptions::progressive`] enabled, the first failing rule of an
//! entry stops evaluation of that entry's remaining rules. Other entries are
//! still evaluated.
//!
//! # Example
//!
//! ```rust
//! use rulebook::{Engine, EngineOptions};
//! use serde_json::json;
//!
//! let input = json!([
//!     { "value": "foo@gmail", "rules": { "isEmail": true, "isNumeric": true } }
//! ]);
//!
//! let thorough = Engine::new().validate_all(&input).unwrap();
//! assert_eq!(thorough.all_messages().len(), 2);
//!
//! let progressive = Engine::with_options(EngineOptions::default().progressive(true));
//! let result = progressive.validate_all(&input).unwrap();
//! assert_eq!(result.all_messages(), vec!["Validation `isEmail` failed."]);
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::{parse_rules, Entry, RuleSet};
use crate::error::{Error, Result};
use crate::item::ValidationItem;
use crate::predicate::Registry;
use crate::result::{EntryKey, EntryReport, Items, ValidationResult};
use crate::rule::normalize;
use crate::value::kind;

/// Runner configuration.
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use rulebook::EngineOptions;
///
/// let options: EngineOptions = serde_json::from_str(r#"{ "progressive": true }"#).unwrap();
/// assert!(options.progressive);
/// assert_eq!(serde_json::from_str::<EngineOptions>("{}").unwrap(), EngineOptions::default());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Stop evaluating an entry's rules at its first failure.
    pub progressive: bool,
}

impl EngineOptions {
    /// Set progressive mode.
    pub fn progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }
}

/// Runs rule sets against subjects.
///
/// An engine is cheap to clone and safe to share between threads: its
/// registry is immutable and reference-counted.
#[derive(Debug, Clone)]
pub struct Engine {
    options: EngineOptions,
    registry: Arc<Registry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default options over the shared default registry.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Engine with the given options over the shared default registry.
    pub fn with_options(options: EngineOptions) -> Self {
        Self::with_registry(Registry::shared(), options)
    }

    /// Engine over a custom registry.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use rulebook::{Engine, EngineOptions, RegistryBuilder};
    /// use serde_json::json;
    ///
    /// let registry = RegistryBuilder::with_defaults()
    ///     .register("isYes", |s, _| s == "yes")
    ///     .build();
    /// let engine = Engine::with_registry(Arc::new(registry), EngineOptions::default());
    ///
    /// assert!(engine.validate_one("yes", json!({ "isYes": true })).unwrap().is_valid());
    /// ```
    pub fn with_registry(registry: Arc<Registry>, options: EngineOptions) -> Self {
        Engine { options, registry }
    }

    /// Current options.
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Registry rules are resolved against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Validate dynamic input: an array of `{ value, rules, name? }` entries,
    /// or an object mapping keys to such entries.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedInputShape`] when `input` is neither an array nor
    ///   an object.
    /// - [`Error::InvalidEntry`] when an entry is not an object with `rules`.
    /// - [`Error::UnknownRule`] or [`Error::InvalidPattern`] from evaluation.
    pub fn validate_all(&self, input: &Value) -> Result<ValidationResult> {
        #[cfg(feature = "tracing")]
        let _span = self.span(input_len(input)).entered();

        let items = match input {
            Value::Array(entries) => Items::List(
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, raw)| {
                        let key = index.to_string();
                        let entry = Entry::from_value(&key, raw)?;
                        self.check_entry(&key, &entry)
                    })
                    .collect::<Result<_>>()?,
            ),
            Value::Object(entries) => Items::Keyed(
                entries
                    .iter()
                    .map(|(key, raw)| {
                        let entry = Entry::from_value(key, raw)?;
                        Ok((key.clone(), self.check_entry(key, &entry)?))
                    })
                    .collect::<Result<_>>()?,
            ),
            other => {
                return Err(Error::UnsupportedInputShape { found: kind(other) });
            }
        };
        Ok(ValidationResult::new(items))
    }

    /// Validate typed entries; the result is indexed by position.
    pub fn validate_entries(&self, entries: &[Entry]) -> Result<ValidationResult> {
        #[cfg(feature = "tracing")]
        let _span = self.span(entries.len()).entered();

        let reports = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.check_entry(&EntryKey::Index(index), entry))
            .collect::<Result<_>>()?;
        Ok(ValidationResult::new(Items::List(reports)))
    }

    /// Validate typed entries keyed by name; the result keeps the same keys.
    pub fn validate_keyed(&self, entries: &IndexMap<String, Entry>) -> Result<ValidationResult> {
        #[cfg(feature = "tracing")]
        let _span = self.span(entries.len()).entered();

        let reports = entries
            .iter()
            .map(|(key, entry)| Ok((key.clone(), self.check_entry(key, entry)?)))
            .collect::<Result<_>>()?;
        Ok(ValidationResult::new(Items::Keyed(reports)))
    }

    /// Validate an object of values against a separate object of rule sets.
    ///
    /// Entries follow the key order of `rules`; a key missing from `values`
    /// validates `null`. Values without rules are ignored.
    ///
    /// ```rust
    /// use rulebook::Engine;
    /// use serde_json::json;
    ///
    /// let values = json!({ "email": "foo@bar.com", "age": "abc" });
    /// let rules = json!({
    ///     "email": { "isEmail": true },
    ///     "age": { "isInt": true },
    /// });
    ///
    /// let result = Engine::new().validate_object(&values, &rules).unwrap();
    /// assert!(!result.is_valid());
    /// assert_eq!(result.message("age", "isInt"), Some("Validation `isInt` failed."));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedInputShape`] when either argument is not an object,
    /// otherwise as [`validate_all`](Engine::validate_all).
    pub fn validate_object(&self, values: &Value, rules: &Value) -> Result<ValidationResult> {
        let (Value::Object(values), Value::Object(rules)) = (values, rules) else {
            let found = if values.is_object() { rules } else { values };
            return Err(Error::UnsupportedInputShape { found: kind(found) });
        };

        #[cfg(feature = "tracing")]
        let _span = self.span(rules.len()).entered();

        let reports = rules
            .iter()
            .map(|(key, raw_rules)| {
                let entry = Entry {
                    value: values.get(key).cloned().unwrap_or(Value::Null),
                    rules: parse_rules(key, raw_rules)?,
                    name: None,
                };
                Ok((key.clone(), self.check_entry(key, &entry)?))
            })
            .collect::<Result<_>>()?;
        Ok(ValidationResult::new(Items::Keyed(reports)))
    }

    /// Validate a single subject against a dynamic rule object.
    ///
    /// The result holds one entry at index `0`.
    ///
    /// ```rust
    /// use rulebook::Engine;
    /// use serde_json::json;
    ///
    /// let engine = Engine::new();
    /// assert!(engine.validate_one(11, json!({ "min": { "args": 10 } })).unwrap().is_valid());
    /// assert!(!engine.validate_one(9.99999, json!({ "min": { "args": 10 } })).unwrap().is_valid());
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEntry`] when `rules` is not an object, otherwise as
    /// [`validate_all`](Engine::validate_all).
    pub fn validate_one(&self, value: impl Into<Value>, rules: Value) -> Result<ValidationResult> {
        let rules = parse_rules("0", &rules)?;
        self.validate_value(&value.into(), &rules)
    }

    /// Validate a single subject against a typed rule set.
    pub fn validate_value(&self, value: &Value, rules: &RuleSet) -> Result<ValidationResult> {
        #[cfg(feature = "tracing")]
        let _span = self.span(1).entered();

        let report = self.check(&EntryKey::Index(0), value, rules, None)?;
        Ok(ValidationResult::new(Items::List(vec![report])))
    }

    fn check_entry(&self, key: &impl std::fmt::Display, entry: &Entry) -> Result<EntryReport> {
        self.check(key, &entry.value, &entry.rules, entry.name.clone())
    }

    fn check(
        &self,
        key: &impl std::fmt::Display,
        value: &Value,
        rules: &RuleSet,
        name: Option<String>,
    ) -> Result<EntryReport> {
        #[cfg(not(feature = "tracing"))]
        let _ = key;

        let mut outcomes = IndexMap::with_capacity(rules.len());
        for (rule, spec) in rules {
            let normalized = normalize(rule, spec);
            if self.registry.evaluate(value, &normalized, rule)? {
                outcomes.insert(rule.clone(), ValidationItem::valid());
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(rule = %rule, key = %key, "rule failed");

            let message = normalized
                .message
                .unwrap_or_else(|| default_message(rule));
            outcomes.insert(rule.clone(), ValidationItem::invalid(message));

            if self.options.progressive {
                #[cfg(feature = "tracing")]
                tracing::trace!(key = %key, skipped = rules.len() - outcomes.len(), "progressive stop");
                break;
            }
        }
        Ok(EntryReport::new(name, outcomes))
    }

    #[cfg(feature = "tracing")]
    fn span(&self, entries: usize) -> tracing::Span {
        tracing::debug_span!("validate", entries, progressive = self.options.progressive)
    }
}

fn default_message(rule: &str) -> String {
    format!("Validation `{rule}` failed.")
}

#[cfg(feature = "tracing")]
fn input_len(input: &Value) -> usize {
    match input {
        Value::Array(entries) => entries.len(),
        Value::Object(entries) => entries.len(),
        _ => 0,
    }
}


#[cfg(all(test, feature = "tracing"))]
mod tracing_tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_failures_are_logged() {
        let engine = Engine::with_options(EngineOptions::default().progressive(true));
        engine
            .validate_one("nope", json!({ "isEmail": true, "isInt": true }))
            .unwrap();
        assert!(logs_contain("rule failed"));
        assert!(logs_contain("isEmail"));
        assert!(logs_contain("progressive stop"));
    }
}
