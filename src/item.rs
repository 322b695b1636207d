//! Outcome of one rule applied to one subject

use serde::{Deserialize, Serialize};

/// Pass/fail outcome of a single rule, plus its failure message.
///
/// Items are created once per rule evaluation and never change afterwards.
/// A passing item always carries an empty message.
///
/// # Example
///
/// ```rust
/// use rulebook::ValidationItem;
///
/// let ok = ValidationItem::valid();
/// assert!(ok.is_valid());
/// assert_eq!(ok.message(), "");
///
/// let failed = ValidationItem::invalid("Validation `isEmail` failed.");
/// assert!(!failed.is_valid());
/// assert_eq!(failed.message(), "Validation `isEmail` failed.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationItem {
    validity: bool,
    message: String,
}

impl ValidationItem {
    /// A passing item.
    pub fn valid() -> Self {
        Self::new(true, String::new())
    }

    /// A failing item with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    /// Build an item from its parts.
    pub fn new(validity: bool, message: impl Into<String>) -> Self {
        ValidationItem {
            validity,
            message: message.into(),
        }
    }

    /// Whether the rule held.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validity
    }

    /// Failure message; empty for passing items.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Plain `{ isValid, message }` view of this item.
    pub fn raw(&self) -> RuleReport {
        RuleReport {
            is_valid: self.validity,
            message: self.message.clone(),
        }
    }
}

/// Detached copy of one rule's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleReport {
    /// Whether the rule held.
    pub is_valid: bool,
    /// Failure message; empty for passing rules.
    pub message: String,
}

impl From<&ValidationItem> for RuleReport {
    fn from(item: &ValidationItem) -> Self {
        item.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_item_has_empty_message() {
        let item = ValidationItem::valid();
        assert!(item.is_valid());
        assert!(item.message().is_empty());
    }

    #[test]
    fn test_raw() {
        let item = ValidationItem::invalid("nope");
        assert_eq!(
            item.raw(),
            RuleReport {
                is_valid: false,
                message: "nope".to_string()
            }
        );
        assert_eq!(RuleReport::from(&item), item.raw());
    }

    #[test]
    fn test_serialize() {
        let item = ValidationItem::invalid("nope");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({ "validity": false, "message": "nope" })
        );
        assert_eq!(
            serde_json::to_value(item.raw()).unwrap(),
            json!({ "isValid": false, "message": "nope" })
        );
    }
}
