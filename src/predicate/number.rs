//! Number predicates
//!
//! Grammar checks for numeric strings, plus divisibility.

use once_cell::sync::Lazy;
use regex::Regex;

use super::registry::RegistryBuilder;
use crate::value::{arg_string, parse_float, parse_int};

static INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").unwrap());
static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-+]?[0-9]+)?(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?$").unwrap()
});

/// Integer without leading zeros, optionally signed.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::is_int;
///
/// assert!(is_int("-0"));
/// assert!(is_int("+1"));
/// assert!(!is_int("01"));
/// assert!(!is_int("100e10"));
/// ```
pub fn is_int(s: &str) -> bool {
    INT.is_match(s)
}

/// Floating-point literal, optionally signed, with optional exponent.
///
/// The empty string is rejected. A sign needs integer digits after it, so
/// `-.123` is not a float while `.0` is.
pub fn is_float(s: &str) -> bool {
    !s.is_empty() && FLOAT.is_match(s)
}

/// Leading number of `s` is an exact multiple of the integer `divisor`.
pub fn is_divisible_by(s: &str, divisor: f64) -> bool {
    parse_float(s) % divisor == 0.0
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register("isInt", |s, _| is_int(s))
        .register("isFloat", |s, _| is_float(s))
        .register("isDivisibleBy", |s, args| {
            is_divisible_by(s, parse_int(&arg_string(args, 0)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int() {
        for ok in ["13", "123", "0", "-0", "+1"] {
            assert!(is_int(ok), "{ok}");
        }
        for bad in ["01", "-01", "000", "100e10", "123.123", "   ", ""] {
            assert!(!is_int(bad), "{bad}");
        }
    }

    #[test]
    fn test_float() {
        for ok in [
            "123",
            "123.",
            "123.123",
            "-123.123",
            "-0.123",
            "+0.123",
            "0.123",
            ".0",
            "01.123",
            "-0.22250738585072011e-307",
        ] {
            assert!(is_float(ok), "{ok}");
        }
        for bad in ["-.123", "  ", "", "foo"] {
            assert!(!is_float(bad), "{bad}");
        }
    }

    #[test]
    fn test_divisible_by() {
        for ok in ["2", "4", "100", "1000"] {
            assert!(is_divisible_by(ok, 2.0), "{ok}");
        }
        for bad in ["1", "2.5", "101", "foo", ""] {
            assert!(!is_divisible_by(bad, 2.0), "{bad}");
        }
        assert!(!is_divisible_by("4", f64::NAN));
    }
}
