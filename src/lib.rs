//! # Rulebook
//!
//! Declarative value validation: describe which named rules apply to which
//! values, run them, and query the per-rule outcome.
//!
//! A run takes a list (or keyed object) of entries, each a subject value and
//! a mapping from rule name to rule configuration. Every rule is dispatched
//! to a named predicate, and its pass/fail outcome and message are recorded
//! in a [`ValidationResult`]. A failing rule is data, not an error.
//!
//! Rules are configured in one of three shapes:
//!
//! - `true`: apply the rule as is,
//! - a value or an array: positional arguments for the predicate,
//! - `{ "args": ..., "msg": "..." }`: arguments plus a custom failure message.
//!
//! ## Quick Example
//!
//! ```rust
//! use rulebook::Engine;
//! use serde_json::json;
//!
//! let engine = Engine::new();
//! let result = engine
//!     .validate_all(&json!([
//!         { "value": "foo@bar.com", "rules": { "isEmail": true, "len": [5, 64] } },
//!         { "value": 17, "rules": { "min": { "args": 18, "msg": "Must be 18 or older" } } },
//!         { "value": null, "rules": { "optional": { "args": ["isURL"] } } },
//!     ]))
//!     .unwrap();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.all_messages(), vec!["Must be 18 or older"]);
//! assert!(result.rule(0, "isEmail").unwrap().is_valid);
//! ```
//!
//! ## Custom predicates
//!
//! ```rust
//! use std::sync::Arc;
//! use rulebook::{Engine, EngineOptions, RegistryBuilder};
//! use serde_json::json;
//!
//! let registry = RegistryBuilder::with_defaults()
//!     .register("startsWith", |s, args| {
//!         args.first().and_then(|p| p.as_str()).is_some_and(|p| s.starts_with(p))
//!     })
//!     .build();
//! let engine = Engine::with_registry(Arc::new(registry), EngineOptions::default());
//!
//! let result = engine.validate_one("rulebook", json!({ "startsWith": "rule" })).unwrap();
//! assert!(result.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod engine;
pub mod entry;
pub mod error;
pub mod item;
pub mod predicate;
pub mod result;
pub mod rule;
pub mod testing;
pub mod value;

// Re-exports
pub use engine::{Engine, EngineOptions};
pub use entry::{Entry, RuleSet};
pub use error::{Error, Result};
pub use item::{RuleReport, ValidationItem};
pub use predicate::{Predicate, Registry, RegistryBuilder};
pub use result::{EntryKey, EntryReport, Items, ValidationResult};
pub use rule::{RuleArgs, RuleSpec};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{Engine, EngineOptions};
    pub use crate::entry::{Entry, RuleSet};
    pub use crate::error::{Error, Result};
    pub use crate::predicate::{Registry, RegistryBuilder};
    pub use crate::result::ValidationResult;
    pub use crate::rule::RuleSpec;
}
