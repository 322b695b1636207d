//! Structural errors raised while running a validation batch
//!
//! A rule that does not hold is *not* an error: it is recorded as an invalid
//! [`ValidationItem`](crate::ValidationItem). The variants here describe
//! configuration mistakes that make the whole run meaningless, so they halt
//! the batch immediately and no partial result is returned.
//!
//! # Examples
//!
//! ```
//! use rulebook::{Engine, Error};
//! use serde_json::json;
//!
//! let engine = Engine::new();
//! let err = engine.validate_one(json!("x"), json!({ "isBanana": true })).unwrap_err();
//!
//! assert_eq!(err, Error::UnknownRule { rule: "isBanana".to_string() });
//! assert_eq!(err.to_string(), "invalid validator function: isBanana");
//! ```

use thiserror::Error;

/// Errors that abort a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The rule name does not resolve to a registered predicate.
    #[error("invalid validator function: {rule}")]
    UnknownRule {
        /// Name of the rule as supplied by the caller.
        rule: String,
    },

    /// The top-level input was neither an array nor an object of entries.
    #[error("unsupported input shape: expected an array or an object of entries, got {found}")]
    UnsupportedInputShape {
        /// JSON kind of the rejected input.
        found: &'static str,
    },

    /// An entry in dynamic input could not be read as `{ value, rules }`.
    #[error("invalid entry `{key}`: {reason}")]
    InvalidEntry {
        /// Index or key of the offending entry.
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A pattern handed to a regex rule failed to compile.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// Pattern source text.
        pattern: String,
        /// Compiler diagnostic from the regex engine.
        message: String,
    },
}

impl Error {
    pub(crate) fn unknown_rule(rule: impl Into<String>) -> Self {
        Error::UnknownRule { rule: rule.into() }
    }

    pub(crate) fn invalid_entry(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidEntry {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_pattern(pattern: impl Into<String>, source: &regex::Error) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            message: source.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
