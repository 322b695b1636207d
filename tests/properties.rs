//! Property-based tests for the batch runner and derived predicates

use proptest::prelude::*;
use rulebook::{Engine, EngineOptions, Registry, ValidationResult};
use serde_json::{json, Value};

/// Rules that never error, paired with their rule spec.
fn rule_strategy() -> impl Strategy<Value = (&'static str, Value)> {
    prop_oneof![
        Just(("isAlpha", json!(true))),
        Just(("isInt", json!(true))),
        Just(("notEmpty", json!(true))),
        Just(("isLowercase", json!(true))),
        Just(("isEmail", json!(true))),
        (0u32..5, 5u32..12).prop_map(|(min, max)| ("len", json!([min, max]))),
        (-50i64..50).prop_map(|bound| ("min", json!(bound))),
        (-50i64..50).prop_map(|bound| ("max", json!({ "args": bound, "msg": "too big" }))),
        Just(("optional", json!(["isNumeric"]))),
        Just(("notIn", json!([["a", "b", "c"]]))),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 @.]{0,12}".prop_map(Value::from),
        (-100i64..100).prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn entry_strategy() -> impl Strategy<Value = Value> {
    (
        value_strategy(),
        prop::collection::vec(rule_strategy(), 0..6),
    )
        .prop_map(|(value, rules)| {
            let rules: serde_json::Map<String, Value> = rules
                .into_iter()
                .map(|(rule, spec)| (rule.to_string(), spec))
                .collect();
            json!({ "value": value, "rules": rules })
        })
}

fn batch_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(entry_strategy(), 0..6).prop_map(Value::Array)
}

fn invalid_count(result: &ValidationResult) -> usize {
    result
        .entries()
        .map(|(_, report)| report.iter().filter(|(_, item)| !item.is_valid()).count())
        .sum()
}

proptest! {
    #[test]
    fn prop_validity_is_conjunction_of_items(batch in batch_strategy()) {
        let result = Engine::new().validate_all(&batch).unwrap();
        let every_item_valid = result
            .entries()
            .all(|(_, report)| report.iter().all(|(_, item)| item.is_valid()));
        prop_assert_eq!(result.is_valid(), every_item_valid);
    }

    #[test]
    fn prop_message_count_matches_invalid_items(batch in batch_strategy()) {
        let result = Engine::new().validate_all(&batch).unwrap();
        prop_assert_eq!(result.all_messages().len(), invalid_count(&result));
    }

    #[test]
    fn prop_items_carry_messages_only_on_failure(batch in batch_strategy()) {
        let result = Engine::new().validate_all(&batch).unwrap();
        for (_, report) in result.entries() {
            for (rule, item) in report.iter() {
                if item.is_valid() {
                    prop_assert_eq!(item.message(), "");
                } else if rule == "max" {
                    prop_assert_eq!(item.message(), "too big");
                } else {
                    prop_assert_eq!(item.message(), format!("Validation `{rule}` failed."));
                }
            }
        }
    }

    #[test]
    fn prop_progressive_records_at_most_one_failure_per_entry(batch in batch_strategy()) {
        let progressive = Engine::with_options(EngineOptions::default().progressive(true));
        let stopped = progressive.validate_all(&batch).unwrap();
        let thorough = Engine::new().validate_all(&batch).unwrap();

        prop_assert_eq!(stopped.is_valid(), thorough.is_valid());
        for ((_, short), (_, full)) in stopped.entries().zip(thorough.entries()) {
            let failures = short.iter().filter(|(_, item)| !item.is_valid()).count();
            prop_assert!(failures <= 1);
            prop_assert!(short.len() <= full.len());
            if failures == 1 {
                let (last, _) = short.iter().last().unwrap();
                prop_assert!(!short.get(last).unwrap().is_valid());
            }
        }
    }

    #[test]
    fn prop_regex_and_not_regex_are_negations(
        subject in "[a-zA-Z0-9 ]{0,10}",
        pattern in prop_oneof![
            Just("^[a-z]+$"),
            Just("[0-9]"),
            Just("^$"),
            Just("^[A-Z]{4}$"),
            Just("/a/"),
            Just("a.c"),
        ],
        modifiers in prop_oneof![Just(""), Just("i")],
    ) {
        let registry = Registry::shared();
        let args = [json!(pattern), json!(modifiers)];
        let matched = registry.call("regex", &subject, &args).unwrap();
        prop_assert_eq!(registry.call("is", &subject, &args).unwrap(), matched);
        prop_assert_eq!(registry.call("notRegex", &subject, &args).unwrap(), !matched);
        prop_assert_eq!(registry.call("not", &subject, &args).unwrap(), !matched);
    }

    #[test]
    fn prop_not_empty_agrees_with_trim(subject in "[ \t\r\na-z.]{0,8}") {
        let registry = Registry::shared();
        prop_assert_eq!(
            registry.call("notEmpty", &subject, &[]).unwrap(),
            !subject.trim().is_empty()
        );
    }

    #[test]
    fn prop_min_and_max_fail_open(subject in "[a-z ]{0,8}", bound in -1000i64..1000) {
        let registry = Registry::shared();
        prop_assert!(registry.call("min", &subject, &[json!(bound)]).unwrap());
        prop_assert!(registry.call("max", &subject, &[json!(bound)]).unwrap());
    }

    #[test]
    fn prop_optional_passes_null_like(check in prop_oneof![Just("isEmail"), Just("isInt"), Just("isUUIDv4")]) {
        let engine = Engine::new();
        for value in [Value::Null, json!(""), json!([])] {
            let result = engine
                .validate_one(value, json!({ "optional": { "args": [check] } }))
                .unwrap();
            prop_assert!(result.is_valid());
        }
    }
}
