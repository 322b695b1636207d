//! Assertion helpers for tests that run validations
//!
//! # Examples
//!
//! ```rust
//! use rulebook::{assert_invalid, assert_messages, assert_valid, Engine};
//! use serde_json::json;
//!
//! let engine = Engine::new();
//!
//! assert_valid!(engine.validate_one("foo@bar.com", json!({ "isEmail": true })).unwrap());
//!
//! let result = engine.validate_one("", json!({ "notEmpty": { "msg": "Required" } })).unwrap();
//! assert_invalid!(result);
//! assert_messages!(result, ["Required"]);
//! ```

/// Assert that a validation result is valid.
///
/// Panics with every failure message otherwise.
///
/// # Example
///
/// ```rust
/// use rulebook::{assert_valid, Engine};
/// use serde_json::json;
///
/// let result = Engine::new().validate_one(11, json!({ "min": 10 })).unwrap();
/// assert_valid!(result);
/// ```
#[macro_export]
macro_rules! assert_valid {
    ($result:expr) => {{
        let result: &$crate::ValidationResult = &$result;
        if !result.is_valid() {
            panic!("Expected valid result, got failures: {:?}", result.all_messages());
        }
    }};
}

/// Assert that a validation result is invalid.
///
/// # Example
///
/// ```rust
/// use rulebook::{assert_invalid, Engine};
/// use serde_json::json;
///
/// let result = Engine::new().validate_one(9, json!({ "min": 10 })).unwrap();
/// assert_invalid!(result);
/// ```
#[macro_export]
macro_rules! assert_invalid {
    ($result:expr) => {{
        let result: &$crate::ValidationResult = &$result;
        if result.is_valid() {
            panic!("Expected invalid result, got valid: {:?}", result);
        }
    }};
}

/// Assert the exact failure messages of a result, in entry then rule order.
///
/// # Example
///
/// ```rust
/// use rulebook::{assert_messages, Engine};
/// use serde_json::json;
///
/// let result = Engine::new()
///     .validate_one("abc", json!({ "isInt": true, "isAlpha": true, "isNumeric": true }))
///     .unwrap();
/// assert_messages!(result, ["Validation `isInt` failed.", "Validation `isNumeric` failed."]);
/// ```
#[macro_export]
macro_rules! assert_messages {
    ($result:expr, $expected:expr) => {{
        let result: &$crate::ValidationResult = &$result;
        let expected: Vec<String> = $expected.iter().map(|m| m.to_string()).collect();
        assert_eq!(result.all_messages(), expected);
    }};
}

#[cfg(test)]
mod tests {
    use crate::Engine;
    use serde_json::json;

    #[test]
    fn assert_valid_macro() {
        let result = Engine::new()
            .validate_one("abc", json!({ "isAlpha": true }))
            .unwrap();
        assert_valid!(result);
    }

    #[test]
    #[should_panic(expected = "Expected valid result")]
    fn assert_valid_macro_panics() {
        let result = Engine::new()
            .validate_one("abc1", json!({ "isAlpha": true }))
            .unwrap();
        assert_valid!(result);
    }

    #[test]
    fn assert_invalid_macro() {
        let result = Engine::new()
            .validate_one("abc1", json!({ "isAlpha": true }))
            .unwrap();
        assert_invalid!(result);
    }

    #[test]
    #[should_panic(expected = "Expected invalid result")]
    fn assert_invalid_macro_panics() {
        let result = Engine::new().validate_all(&json!([])).unwrap();
        assert_invalid!(result);
    }

    #[test]
    fn assert_messages_macro() {
        let result = Engine::new()
            .validate_one("", json!({ "notEmpty": { "msg": "Required" }, "isNull": true }))
            .unwrap();
        assert_messages!(result, ["Required"]);
        assert_messages!(result, vec!["Required".to_string()]);
    }

    #[test]
    #[should_panic]
    fn assert_messages_macro_panics_on_mismatch() {
        let result = Engine::new()
            .validate_one("", json!({ "notEmpty": true }))
            .unwrap();
        assert_messages!(result, ["something else"]);
    }
}
