//! Aggregate, queryable outcome of a validation run
//!
//! A [`ValidationResult`] mirrors the shape of the input it was built from:
//! an array of entries yields [`Items::List`], an object of entries yields
//! [`Items::Keyed`]. Lookups accept either an index or a key, and a key that
//! parses as an integer also works against a list.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::item::{RuleReport, ValidationItem};

/// Identifies one entry in a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EntryKey {
    /// Position in an array of entries.
    Index(usize),
    /// Key in an object of entries.
    Key(String),
}

impl From<usize> for EntryKey {
    fn from(index: usize) -> Self {
        EntryKey::Index(index)
    }
}

impl From<&str> for EntryKey {
    fn from(key: &str) -> Self {
        EntryKey::Key(key.to_string())
    }
}

impl From<String> for EntryKey {
    fn from(key: String) -> Self {
        EntryKey::Key(key)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Index(index) => write!(f, "{index}"),
            EntryKey::Key(key) => f.write_str(key),
        }
    }
}

/// Rule outcomes for one entry, in rule-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    rules: IndexMap<String, ValidationItem>,
}

impl EntryReport {
    /// Build a report from an optional entry label and its rule outcomes.
    pub fn new(name: Option<String>, rules: IndexMap<String, ValidationItem>) -> Self {
        EntryReport { name, rules }
    }

    /// Human label supplied with the entry, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Outcome of one rule.
    pub fn get(&self, rule: &str) -> Option<&ValidationItem> {
        self.rules.get(rule)
    }

    /// Rule outcomes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationItem)> {
        self.rules.iter().map(|(rule, item)| (rule.as_str(), item))
    }

    /// Number of recorded rule outcomes.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether every recorded rule held.
    pub fn is_valid(&self) -> bool {
        self.rules.values().all(ValidationItem::is_valid)
    }
}

/// Per-entry reports, shaped like the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Items {
    /// Reports for an array of entries.
    List(Vec<EntryReport>),
    /// Reports for an object of entries, in key order.
    Keyed(IndexMap<String, EntryReport>),
}

impl Items {
    /// Look up one entry's report.
    pub fn get(&self, key: &EntryKey) -> Option<&EntryReport> {
        match (self, key) {
            (Items::List(list), EntryKey::Index(index)) => list.get(*index),
            (Items::List(list), EntryKey::Key(key)) => {
                key.parse::<usize>().ok().and_then(|index| list.get(index))
            }
            (Items::Keyed(map), EntryKey::Key(key)) => map.get(key),
            (Items::Keyed(map), EntryKey::Index(index)) => map.get(&index.to_string()),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Items::List(list) => list.len(),
            Items::Keyed(map) => map.len(),
        }
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in input order, with their keys.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (EntryKey, &EntryReport)> + '_> {
        match self {
            Items::List(list) => Box::new(
                list.iter()
                    .enumerate()
                    .map(|(index, report)| (EntryKey::Index(index), report)),
            ),
            Items::Keyed(map) => Box::new(
                map.iter()
                    .map(|(key, report)| (EntryKey::Key(key.clone()), report)),
            ),
        }
    }
}

/// Outcome of a whole validation run.
///
/// The run is valid when every recorded rule outcome, across every entry,
/// is valid. An empty run is valid.
///
/// # Example
///
/// ```rust
/// use rulebook::Engine;
/// use serde_json::json;
///
/// let result = Engine::new()
///     .validate_all(&json!({
///         "email": { "value": "foo@bar.com", "rules": { "isEmail": true } },
///         "age": { "value": "abc", "rules": { "isInt": { "msg": "Age must be a whole number" } } },
///     }))
///     .unwrap();
///
/// assert!(!result.is_valid());
/// assert!(result.rule("email", "isEmail").unwrap().is_valid);
/// assert_eq!(result.message("age", "isInt"), Some("Age must be a whole number"));
/// assert_eq!(result.all_messages(), vec!["Age must be a whole number"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    validity: bool,
    items: Items,
}

impl ValidationResult {
    /// Aggregate per-entry reports into a result.
    pub fn new(items: Items) -> Self {
        let validity = items.iter().all(|(_, report)| report.is_valid());
        ValidationResult { validity, items }
    }

    /// Whether every rule on every entry held.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validity
    }

    /// All rule outcomes for one entry.
    pub fn item(&self, key: impl Into<EntryKey>) -> Option<&EntryReport> {
        self.items.get(&key.into())
    }

    /// Detached outcome of one rule on one entry.
    ///
    /// `None` when the entry is unknown or the rule was never evaluated,
    /// which includes rules skipped in progressive mode.
    pub fn rule(&self, key: impl Into<EntryKey>, rule: &str) -> Option<RuleReport> {
        self.item(key)?.get(rule).map(ValidationItem::raw)
    }

    /// Message of one rule on one entry; empty when the rule held.
    pub fn message(&self, key: impl Into<EntryKey>, rule: &str) -> Option<&str> {
        self.item(key)?.get(rule).map(ValidationItem::message)
    }

    /// Every failure message, in entry order then rule order.
    pub fn all_messages(&self) -> Vec<String> {
        self.failures()
            .map(|(_, _, item)| item.message().to_string())
            .collect()
    }

    /// Every failed rule with the entry it belongs to.
    pub fn failures(&self) -> impl Iterator<Item = (EntryKey, &str, &ValidationItem)> {
        self.items.iter().flat_map(|(key, report)| {
            report
                .iter()
                .filter(|(_, item)| !item.is_valid())
                .map(move |(rule, item)| (key.clone(), rule, item))
        })
    }

    /// Entry reports in input order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryKey, &EntryReport)> {
        self.items.iter()
    }

    /// The underlying per-entry reports.
    pub fn items(&self) -> &Items {
        &self.items
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the run had no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
