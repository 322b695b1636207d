//! Rule specifications and their normalization
//!
//! A caller configures a rule in one of three shapes, mirrored by
//! [`RuleSpec`]:
//!
//! - a bare flag (`true`): run the rule with no meaningful arguments,
//! - an argument value or list: the predicate's positional arguments,
//! - arguments plus a custom failure message.
//!
//! Before evaluation every spec is flattened by [`normalize`] into a
//! [`NormalizedRule`]: an ordered argument list and an optional message.
//!
//! # Example
//!
//! ```
//! use rulebook::rule::{normalize, RuleSpec};
//! use serde_json::json;
//!
//! let spec = RuleSpec::from(json!({ "args": [5, 10], "msg": "bad length" }));
//! let rule = normalize("len", &spec);
//!
//! assert_eq!(rule.args, vec![json!(5), json!(10)]);
//! assert_eq!(rule.message.as_deref(), Some("bad length"));
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::value::{is_truthy, to_js_string};

/// Rules whose predicates take no configuration beyond an optional message.
const MESSAGE_ONLY_RULES: [&str; 3] = ["isUrl", "isURL", "isEmail"];

/// Rule for which a lone non-list argument means "autodetect".
const AUTODETECT_RULE: &str = "isIP";

/// Argument source of a rule: one value, or an ordered list of values.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleArgs {
    /// A single positional argument.
    Single(Value),
    /// Several positional arguments, in order.
    List(Vec<Value>),
}

impl From<Value> for RuleArgs {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RuleArgs::List(items),
            other => RuleArgs::Single(other),
        }
    }
}

/// One rule's configuration as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// `true`: apply the rule with its default behaviour.
    Flag,
    /// Explicit arguments, default failure message.
    WithArgs(RuleArgs),
    /// Explicit arguments and a custom failure message.
    WithArgsAndMessage(RuleArgs, String),
}

impl RuleSpec {
    /// Bare flag.
    pub fn flag() -> Self {
        RuleSpec::Flag
    }

    /// Arguments from a value; an array supplies several positional arguments.
    ///
    /// ```
    /// use rulebook::rule::{RuleArgs, RuleSpec};
    /// use serde_json::json;
    ///
    /// assert_eq!(RuleSpec::args(10), RuleSpec::WithArgs(RuleArgs::Single(json!(10))));
    /// assert_eq!(
    ///     RuleSpec::args(json!([5, 10])),
    ///     RuleSpec::WithArgs(RuleArgs::List(vec![json!(5), json!(10)]))
    /// );
    /// ```
    pub fn args(args: impl Into<Value>) -> Self {
        RuleSpec::WithArgs(RuleArgs::from(args.into()))
    }

    /// Attach a custom failure message, keeping the current arguments.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let args = match self {
            RuleSpec::Flag => RuleArgs::Single(Value::Bool(true)),
            RuleSpec::WithArgs(args) | RuleSpec::WithArgsAndMessage(args, _) => args,
        };
        RuleSpec::WithArgsAndMessage(args, message.into())
    }

    /// Custom failure message, if one was configured and is non-empty.
    pub fn message(&self) -> Option<&str> {
        match self {
            RuleSpec::WithArgsAndMessage(_, msg) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            RuleSpec::Flag | RuleSpec::WithArgsAndMessage(..) => true,
            RuleSpec::WithArgs(RuleArgs::List(_)) => true,
            RuleSpec::WithArgs(RuleArgs::Single(value)) => is_truthy(value),
        }
    }
}

impl From<bool> for RuleSpec {
    fn from(flag: bool) -> Self {
        if flag {
            RuleSpec::Flag
        } else {
            RuleSpec::WithArgs(RuleArgs::Single(Value::Bool(false)))
        }
    }
}

/// Read a spec from its dynamic shape.
///
/// An object carrying `args` or `msg` is the explicit wrapper; when its
/// `args` is missing or falsy the whole object becomes the argument.
impl From<Value> for RuleSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(true) => RuleSpec::Flag,
            Value::Object(map) if map.contains_key("args") || map.contains_key("msg") => {
                from_wrapper(map)
            }
            other => RuleSpec::WithArgs(RuleArgs::from(other)),
        }
    }
}

fn from_wrapper(map: Map<String, Value>) -> RuleSpec {
    let message = map
        .get("msg")
        .filter(|msg| is_truthy(msg))
        .map(to_js_string);
    let explicit = map.get("args").filter(|args| is_truthy(args)).cloned();
    let args = match explicit {
        Some(args) => RuleArgs::from(args),
        None => RuleArgs::Single(Value::Object(map)),
    };
    match message {
        Some(message) => RuleSpec::WithArgsAndMessage(args, message),
        None => RuleSpec::WithArgs(args),
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RuleSpec::from)
    }
}

/// Canonical form of a rule: ordered arguments and an optional message.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRule {
    /// Positional arguments passed after the subject.
    pub args: Vec<Value>,
    /// Custom failure message.
    pub message: Option<String>,
}

/// Flatten a rule spec into its argument list and message.
///
/// `isUrl`, `isURL` and `isEmail` accept no options: a configured message is
/// kept and every other setting dropped. For `isIP` a single non-list
/// argument is discarded so the predicate autodetects the address family.
/// List arguments are copied, never shared with the caller's spec.
pub fn normalize(rule: &str, spec: &RuleSpec) -> NormalizedRule {
    let message = spec.message().map(str::to_string);

    if MESSAGE_ONLY_RULES.contains(&rule) {
        if let Some(msg) = &message {
            let mut only_msg = Map::new();
            only_msg.insert("msg".to_string(), Value::String(msg.clone()));
            return NormalizedRule {
                args: vec![Value::Object(only_msg)],
                message,
            };
        }
        if spec.is_truthy() {
            return NormalizedRule {
                args: vec![Value::Object(Map::new())],
                message: None,
            };
        }
    }

    let args = match spec {
        RuleSpec::Flag => resolve_single(rule, &Value::Bool(true)),
        RuleSpec::WithArgs(args) | RuleSpec::WithArgsAndMessage(args, _) => match args {
            RuleArgs::Single(value) => resolve_single(rule, value),
            RuleArgs::List(values) => values.clone(),
        },
    };

    NormalizedRule { args, message }
}

fn resolve_single(rule: &str, value: &Value) -> Vec<Value> {
    if rule == AUTODETECT_RULE {
        Vec::new()
    } else {
        vec![value.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flag_resolves_to_true_argument() {
        let rule = normalize("isNumeric", &RuleSpec::Flag);
        assert_eq!(rule.args, vec![json!(true)]);
        assert_eq!(rule.message, None);
    }

    #[test]
    fn test_bare_value_is_single_argument() {
        let rule = normalize("min", &RuleSpec::from(json!(10)));
        assert_eq!(rule.args, vec![json!(10)]);
    }

    #[test]
    fn test_bare_array_is_argument_list() {
        let rule = normalize("len", &RuleSpec::from(json!([5, 10])));
        assert_eq!(rule.args, vec![json!(5), json!(10)]);
    }

    #[test]
    fn test_wrapper_with_single_arg() {
        let rule = normalize("min", &RuleSpec::from(json!({ "args": 10 })));
        assert_eq!(rule.args, vec![json!(10)]);
        assert_eq!(rule.message, None);
    }

    #[test]
    fn test_wrapper_with_message() {
        let spec = RuleSpec::from(json!({ "args": ["foo"], "msg": "needs foo" }));
        let rule = normalize("contains", &spec);
        assert_eq!(rule.args, vec![json!("foo")]);
        assert_eq!(rule.message.as_deref(), Some("needs foo"));
    }

    #[test]
    fn test_wrapper_without_args_passes_whole_object() {
        let spec = RuleSpec::from(json!({ "msg": "oops" }));
        let rule = normalize("notEmpty", &spec);
        assert_eq!(rule.args, vec![json!({ "msg": "oops" })]);
        assert_eq!(rule.message.as_deref(), Some("oops"));
    }

    #[test]
    fn test_empty_message_is_ignored() {
        let spec = RuleSpec::from(json!({ "args": 3, "msg": "" }));
        assert_eq!(spec, RuleSpec::WithArgs(RuleArgs::Single(json!(3))));
        assert_eq!(normalize("min", &spec).message, None);
    }

    #[test]
    fn test_message_only_rules_strip_options() {
        let spec = RuleSpec::from(json!({ "args": { "require_tld": false }, "msg": "bad email" }));
        let rule = normalize("isEmail", &spec);
        assert_eq!(rule.args, vec![json!({ "msg": "bad email" })]);
        assert_eq!(rule.message.as_deref(), Some("bad email"));

        let rule = normalize("isURL", &RuleSpec::from(json!({ "args": ["x"] })));
        assert_eq!(rule.args, vec![json!({})]);

        let rule = normalize("isUrl", &RuleSpec::Flag);
        assert_eq!(rule.args, vec![json!({})]);
        assert_eq!(rule.message, None);
    }

    #[test]
    fn test_message_only_rule_keeps_falsy_spec() {
        let rule = normalize("isEmail", &RuleSpec::from(false));
        assert_eq!(rule.args, vec![json!(false)]);
    }

    #[test]
    fn test_ip_single_argument_autodetects() {
        assert_eq!(normalize("isIP", &RuleSpec::Flag).args, Vec::<Value>::new());
        assert_eq!(normalize("isIP", &RuleSpec::args(4)).args, Vec::<Value>::new());
        assert_eq!(normalize("isIP", &RuleSpec::args(json!([6]))).args, vec![json!(6)]);
    }

    #[test]
    fn test_normalize_copies_argument_list() {
        let spec = RuleSpec::args(json!([1, 2]));
        let mut rule = normalize("isLength", &spec);
        rule.args.push(json!(3));
        assert_eq!(spec, RuleSpec::WithArgs(RuleArgs::List(vec![json!(1), json!(2)])));
    }

    #[test]
    fn test_with_message_builder() {
        let spec = RuleSpec::flag().with_message("required");
        assert_eq!(spec.message(), Some("required"));
        assert_eq!(normalize("notEmpty", &spec).args, vec![json!(true)]);

        let spec = RuleSpec::args(10).with_message("too small");
        assert_eq!(normalize("min", &spec).args, vec![json!(10)]);
    }

    #[test]
    fn test_deserialize_spec() {
        let spec: RuleSpec = serde_json::from_str(r#"{"args":[2,3],"msg":"x"}"#).unwrap();
        assert_eq!(
            spec,
            RuleSpec::WithArgsAndMessage(RuleArgs::List(vec![json!(2), json!(3)]), "x".into())
        );
        let spec: RuleSpec = serde_json::from_str("true").unwrap();
        assert_eq!(spec, RuleSpec::Flag);
    }
}
