//! Named predicates and the registry that dispatches to them
//!
//! A predicate answers one validation question about a subject string,
//! optionally parameterised by positional arguments. Predicates are looked up
//! by rule name in an immutable [`Registry`], built once through a
//! [`RegistryBuilder`] and then shared read-only.
//!
//! The default registry is seeded with a base set of general-purpose checks
//! (email, URL, IP, character classes, lengths, dates, credit cards, JSON,
//! UUIDs, pattern matching, set membership) and a derived set layered on top
//! of them (`notEmpty`, `len`, `notIn`, `regex`, `min`, `optional`, ...).
//! Derived predicates receive the registry explicitly so they can delegate to
//! their siblings.
//!
//! # Example
//!
//! ```rust
//! use rulebook::predicate::Registry;
//! use serde_json::json;
//!
//! let registry = Registry::default();
//! assert!(registry.call("isEmail", "foo@bar.com", &[]).unwrap());
//! assert!(registry.call("len", "Pizza", &[json!(5), json!(10)]).unwrap());
//! assert!(!registry.call("notIn", "foo", &[json!(["foo", "bar"])]).unwrap());
//! ```
//!
//! # Custom predicates
//!
//! ```rust
//! use rulebook::predicate::RegistryBuilder;
//! use serde_json::json;
//!
//! let registry = RegistryBuilder::with_defaults()
//!     .register("isEven", |s, _| s.parse::<i64>().is_ok_and(|n| n % 2 == 0))
//!     .build();
//!
//! assert!(registry.call("isEven", "42", &[]).unwrap());
//! assert!(registry.call("optional", "", &[json!("isEven")]).unwrap());
//! ```

mod collection;
mod date;
mod derived;
mod format;
mod network;
mod number;
mod registry;
mod string;

// Re-export dispatch types
pub use registry::{Predicate, Registry, RegistryBuilder};

// Re-export base predicates
pub use collection::is_in;
pub use date::{is_after, is_before, is_date, parse_date};
pub use format::{is_credit_card, is_json, is_uuid};
pub use network::{is_email, is_fqdn, is_ip, is_url, IpVersion};
pub use number::{is_divisible_by, is_float, is_int};
pub use string::{
    compile_pattern, equals, is_alpha, is_alphanumeric, is_ascii, is_base64, is_byte_length,
    is_hex_color, is_hexadecimal, is_length, is_lowercase, is_null, is_numeric, is_uppercase,
};

// Re-export derived predicates that stand on their own
pub use derived::{contains, is_decimal, max, min, not_empty};
