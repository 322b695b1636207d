//! Predicate trait, registry and evaluator

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::rule::NormalizedRule;
use crate::value::to_js_string;

/// A named validation check.
///
/// `subject` is the already-coerced value under test and `args` the rule's
/// positional arguments. The registry is passed so a predicate can delegate
/// to other registered predicates.
///
/// Closures with the matching signature implement this trait.
pub trait Predicate: Send + Sync {
    /// Check whether the subject satisfies this predicate.
    fn check(&self, subject: &str, args: &[Value], registry: &Registry) -> Result<bool>;
}

impl<F> Predicate for F
where
    F: Fn(&str, &[Value], &Registry) -> Result<bool> + Send + Sync,
{
    #[inline]
    fn check(&self, subject: &str, args: &[Value], registry: &Registry) -> Result<bool> {
        self(subject, args, registry)
    }
}

static DEFAULT_REGISTRY: Lazy<Arc<Registry>> =
    Lazy::new(|| Arc::new(RegistryBuilder::with_defaults().build()));

/// Immutable mapping from rule name to predicate.
#[derive(Clone)]
pub struct Registry {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl Registry {
    /// Start a builder seeded with the base and derived predicates.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::with_defaults()
    }

    /// Process-wide default registry, built on first use.
    pub fn shared() -> Arc<Registry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    /// Whether a predicate is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Number of registered predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the registry holds no predicates.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a predicate by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownRule`] when nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&dyn Predicate> {
        self.predicates
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| Error::unknown_rule(name))
    }

    /// Run the named predicate against an already-coerced subject.
    pub fn call(&self, name: &str, subject: &str, args: &[Value]) -> Result<bool> {
        self.resolve(name)?.check(subject, args, self)
    }

    /// Evaluate one normalized rule against a subject value.
    ///
    /// The value is coerced to its string form, then handed to the predicate
    /// registered as `rule`, followed by the rule's arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rulebook::predicate::Registry;
    /// use rulebook::rule::{normalize, RuleSpec};
    /// use serde_json::json;
    ///
    /// let registry = Registry::default();
    /// let rule = normalize("min", &RuleSpec::args(10));
    ///
    /// assert!(registry.evaluate(&json!(11), &rule, "min").unwrap());
    /// assert!(!registry.evaluate(&json!(9.99999), &rule, "min").unwrap());
    /// ```
    pub fn evaluate(&self, value: &Value, rule: &NormalizedRule, name: &str) -> Result<bool> {
        let predicate = self.resolve(name)?;
        predicate.check(&to_js_string(value), &rule.args, self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        RegistryBuilder::with_defaults().build()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("predicates", &self.names())
            .finish()
    }
}

/// Builder for a [`Registry`].
///
/// Registration overwrites any predicate already installed under the same
/// name. Once [`build`](RegistryBuilder::build) is called the registry is
/// frozen.
#[derive(Clone, Default)]
pub struct RegistryBuilder {
    predicates: HashMap<String, Arc<dyn Predicate>>,
}

impl RegistryBuilder {
    /// Builder with no predicates at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder seeded with the base predicates and the derived set.
    pub fn with_defaults() -> Self {
        let builder = Self::empty();
        let builder = super::string::register(builder);
        let builder = super::number::register(builder);
        let builder = super::collection::register(builder);
        let builder = super::network::register(builder);
        let builder = super::format::register(builder);
        let builder = super::date::register(builder);
        super::derived::register(builder)
    }

    /// Install a self-contained predicate over the subject and its arguments.
    pub fn register<F>(self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.register_derived(
            name,
            move |subject: &str, args: &[Value], _: &Registry| -> Result<bool> {
                Ok(predicate(subject, args))
            },
        )
    }

    /// Install a predicate that may delegate to other registered predicates.
    pub fn register_derived<P>(mut self, name: impl Into<String>, predicate: P) -> Self
    where
        P: Predicate + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
        self
    }

    /// Freeze the builder into a registry.
    pub fn build(self) -> Registry {
        #[cfg(feature = "tracing")]
        tracing::trace!(predicates = self.predicates.len(), "predicate registry built");

        Registry {
            predicates: self.predicates,
        }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RegistryBuilder")
            .field("predicates", &names)
            .finish()
    }
}

/// Rule names with the base and derived predicates they cover.
#[cfg(test)]
pub(crate) const DEFAULT_RULES: &[&str] = &[
    "equals",
    "matches",
    "isEmail",
    "isURL",
    "isFQDN",
    "isIP",
    "isAlpha",
    "isAlphanumeric",
    "isNumeric",
    "isHexadecimal",
    "isHexColor",
    "isLowercase",
    "isUppercase",
    "isInt",
    "isFloat",
    "isDivisibleBy",
    "isNull",
    "isLength",
    "isByteLength",
    "isUUID",
    "isDate",
    "isAfter",
    "isBefore",
    "isIn",
    "isCreditCard",
    "isJSON",
    "isAscii",
    "isBase64",
    "notEmpty",
    "len",
    "isUrl",
    "isIPv4",
    "isIPv6",
    "notIn",
    "regex",
    "notRegex",
    "is",
    "not",
    "isDecimal",
    "min",
    "max",
    "contains",
    "notContains",
    "notNull",
    "optional",
    "isUUIDv3",
    "isUUIDv4",
    "isUUIDv5",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{normalize, RuleSpec};
    use serde_json::json;

    #[test]
    fn test_default_registry_has_every_rule() {
        let registry = Registry::default();
        for name in DEFAULT_RULES {
            assert!(registry.contains(name), "missing predicate {name}");
        }
        assert_eq!(registry.len(), DEFAULT_RULES.len());
    }

    #[test]
    fn test_unknown_rule() {
        let registry = Registry::default();
        assert_eq!(
            registry.call("isBanana", "x", &[]).unwrap_err(),
            Error::unknown_rule("isBanana")
        );
        let rule = normalize("isBanana", &RuleSpec::Flag);
        assert!(matches!(
            registry.evaluate(&json!("x"), &rule, "isBanana"),
            Err(Error::UnknownRule { .. })
        ));
    }

    #[test]
    fn test_register_overwrites() {
        let registry = RegistryBuilder::with_defaults()
            .register("isEmail", |_, _| true)
            .build();
        assert!(registry.call("isEmail", "definitely not", &[]).unwrap());
    }

    #[test]
    fn test_derived_sees_custom_predicates() {
        let registry = RegistryBuilder::with_defaults()
            .register("isYes", |s, _| s == "yes")
            .build();
        assert!(registry.call("optional", "yes", &[json!("isYes")]).unwrap());
        assert!(!registry.call("optional", "no", &[json!("isYes")]).unwrap());
    }

    #[test]
    fn test_empty_registry() {
        let registry = RegistryBuilder::empty().build();
        assert!(registry.is_empty());
        assert!(registry.call("isEmail", "a@b.co", &[]).is_err());
    }

    #[test]
    fn test_evaluate_coerces_subject() {
        let registry = Registry::default();
        let rule = normalize("isInt", &RuleSpec::Flag);
        assert!(registry.evaluate(&json!(42), &rule, "isInt").unwrap());
        assert!(!registry.evaluate(&json!(null), &rule, "isInt").unwrap());
    }

    #[test]
    fn test_shared_is_reused() {
        let a = Registry::shared();
        let b = Registry::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
