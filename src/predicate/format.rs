//! Structured-format predicates: UUIDs, credit card numbers, JSON documents

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::registry::RegistryBuilder;
use crate::value::to_js_string;

static UUID_ANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}$").unwrap()
});
static UUID_V3: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[0-9A-F]{8}-[0-9A-F]{4}-3[0-9A-F]{3}-[0-9A-F]{4}-[0-9A-F]{12}$").unwrap()
});
static UUID_V4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[0-9A-F]{8}-[0-9A-F]{4}-4[0-9A-F]{3}-[89AB][0-9A-F]{3}-[0-9A-F]{12}$")
        .unwrap()
});
static UUID_V5: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[0-9A-F]{8}-[0-9A-F]{4}-5[0-9A-F]{3}-[89AB][0-9A-F]{3}-[0-9A-F]{12}$")
        .unwrap()
});
static CREDIT_CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|6(?:011|5[0-9][0-9])[0-9]{12}",
        r"|3[47][0-9]{13}|3(?:0[0-5]|[68][0-9])[0-9]{11}|(?:2131|1800|35[0-9]{3})[0-9]{11})$",
    ))
    .unwrap()
});

/// UUID in canonical hyphenated form.
///
/// `version` restricts the match to versions 3, 4 or 5; `None` accepts any
/// version. Other versions never match.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::is_uuid;
///
/// let v4 = "4a68b601-35bd-4a4a-91a5-f4e634e34943";
/// assert!(is_uuid(v4, None));
/// assert!(is_uuid(v4, Some("4")));
/// assert!(!is_uuid(v4, Some("3")));
/// ```
pub fn is_uuid(s: &str, version: Option<&str>) -> bool {
    let pattern = match version {
        None | Some("") | Some("all") => &*UUID_ANY,
        Some("3") => &*UUID_V3,
        Some("4") => &*UUID_V4,
        Some("5") => &*UUID_V5,
        Some(_) => return false,
    };
    pattern.is_match(s)
}

/// Card number from a known issuer range that passes the Luhn checksum.
///
/// Separators are ignored: every non-digit is stripped first.
pub fn is_credit_card(s: &str) -> bool {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();
    if !CREDIT_CARD.is_match(&digits) {
        return false;
    }
    luhn(&digits)
}

fn luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// JSON text whose top-level value is an object or array.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::is_json;
///
/// assert!(is_json(r#"{ "key": "value" }"#));
/// assert!(!is_json("1234"));
/// assert!(!is_json("{ key: \"value\" }"));
/// ```
pub fn is_json(s: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(s),
        Ok(Value::Object(_)) | Ok(Value::Array(_))
    )
}

fn version_arg(args: &[Value]) -> Option<String> {
    match args.first() {
        None | Some(Value::Null) | Some(Value::Bool(_)) => None,
        Some(other) => Some(to_js_string(other)),
    }
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register("isUUID", |s, args| {
            is_uuid(s, version_arg(args).as_deref())
        })
        .register("isCreditCard", |s, _| is_credit_card(s))
        .register("isJSON", |s, _| is_json(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_UUIDS: [&str; 7] = [
        "",
        "xxxA987FBC9-4BED-3078-CF07-9141BA07C9F3",
        "A987FBC9-4BED-3078-CF07-9141BA07C9F3xxx",
        "A987FBC94BED3078CF079141BA07C9F3",
        "934859",
        "987FBC9-4BED-3078-CF07A-9141BA07C9F3",
        "AAAAAAAA-1111-1111-AAAG-111111111111",
    ];

    #[test]
    fn test_uuid_versions() {
        assert!(is_uuid("4fb968a7-cbdd-4755-8b90-b41b60100483", Some("4")));
        assert!(is_uuid("c478211b-224d-30b1-9116-c06048999ce2", Some("3")));
        assert!(is_uuid("74738ff5-5367-5958-9aee-98fffdcd1876", Some("5")));
        assert!(!is_uuid("c478211b-224d-30b1-9116-c06048999ce2", Some("4")));
        assert!(!is_uuid("4fb968a7-cbdd-4755-8b90-b41b60100483", Some("7")));
        for bad in NOT_UUIDS {
            assert!(!is_uuid(bad, None), "{bad}");
            assert!(!is_uuid(bad, Some("4")), "{bad}");
        }
    }

    #[test]
    fn test_credit_card() {
        for ok in [
            "375556917985515",
            "36050234196908",
            "4716461583322103",
            "4716-2210-5188-5662",
            "4929 7226 5379 7141",
            "5398228707871527",
        ] {
            assert!(is_credit_card(ok), "{ok}");
        }
        for bad in ["foo", "5398228707871528", ""] {
            assert!(!is_credit_card(bad), "{bad}");
        }
    }

    #[test]
    fn test_json() {
        assert!(is_json("{}"));
        assert!(is_json("[1, 2]"));
        for bad in [
            "{ key: \"value\" }",
            "{ 'key': 'value' }",
            "null",
            "1234",
            "false",
            "\"nope\"",
            "[object Object]",
        ] {
            assert!(!is_json(bad), "{bad}");
        }
    }
}
