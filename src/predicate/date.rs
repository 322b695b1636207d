//! Date predicates
//!
//! Dates are parsed leniently from the layouts people actually type. All
//! parsed values are treated as UTC; a trailing `GMT`/`UTC` marker and
//! anything after it is ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use super::registry::RegistryBuilder;
use crate::value::to_js_string;

const TIME: &str = r"(?:[ T]+([0-9]{1,2}):([0-9]{2})(?::([0-9]{2})(?:\.[0-9]+)?)?)?";

static YEAR_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^([0-9]{{4}})[-/.]([0-9]{{1,2}})[-/.]([0-9]{{1,2}})\.?{TIME}$"
    ))
    .unwrap()
});
static MONTH_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^([0-9]{{1,2}})[-/.]\s*([0-9]{{1,2}})[-/.]\s*([0-9]{{4}})\.?{TIME}$"
    ))
    .unwrap()
});

const TEXT_LAYOUTS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%a %b %d %Y",
];

const TEXT_DATETIME_LAYOUTS: [&str; 2] = ["%a %b %d %Y %H:%M:%S", "%b %d, %Y %H:%M:%S"];

/// Parse a date or date-time.
///
/// Accepted layouts: RFC 3339, RFC 2822, `YYYY-MM-DD` (with `-`, `/` or `.`
/// separators), `MM/DD/YYYY` (likewise, including `MM. DD. YYYY.`), each
/// with an optional `HH:MM[:SS]` time, and English month-name forms such as
/// `Aug 4, 2011`.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::parse_date;
///
/// assert!(parse_date("2011-08-04").is_some());
/// assert!(parse_date("4. 8. 2011. GMT").is_some());
/// assert!(parse_date("2011-foo-04").is_none());
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(s) {
        return Some(parsed.naive_utc());
    }

    let s = strip_zone(s);
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = YEAR_FIRST.captures(s) {
        return from_captures(&caps, 1, 2, 3);
    }
    if let Some(caps) = MONTH_FIRST.captures(s) {
        return from_captures(&caps, 3, 1, 2);
    }

    TEXT_DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .or_else(|| {
            TEXT_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn strip_zone(s: &str) -> &str {
    ["GMT", "UTC"]
        .iter()
        .filter_map(|zone| s.find(zone))
        .min()
        .map_or(s, |idx| s[..idx].trim_end())
}

fn from_captures(
    caps: &Captures<'_>,
    year: usize,
    month: usize,
    day: usize,
) -> Option<NaiveDateTime> {
    let number = |idx: usize| -> Option<u32> { caps.get(idx)?.as_str().parse().ok() };
    let year = i32::try_from(number(year)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(month)?, number(day)?)?;
    let time = match number(4) {
        Some(hour) => NaiveTime::from_hms_opt(hour, number(5)?, number(6).unwrap_or(0))?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}

/// Parseable as a date.
pub fn is_date(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Strictly later than `reference`, which defaults to the current time.
///
/// An unparseable subject or reference never holds.
pub fn is_after(s: &str, reference: Option<&str>) -> bool {
    compare(s, reference).is_some_and(|(date, reference)| date > reference)
}

/// Strictly earlier than `reference`, which defaults to the current time.
///
/// An unparseable subject or reference never holds.
pub fn is_before(s: &str, reference: Option<&str>) -> bool {
    compare(s, reference).is_some_and(|(date, reference)| date < reference)
}

fn compare(s: &str, reference: Option<&str>) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let reference = match reference {
        Some(reference) => parse_date(reference)?,
        None => Utc::now().naive_utc(),
    };
    Some((parse_date(s)?, reference))
}

fn reference_arg(args: &[Value]) -> Option<String> {
    match args.first() {
        None | Some(Value::Null) | Some(Value::Bool(_)) => None,
        Some(other) => Some(to_js_string(other)).filter(|s| !s.is_empty()),
    }
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register("isDate", |s, _| is_date(s))
        .register("isAfter", |s, args| {
            is_after(s, reference_arg(args).as_deref())
        })
        .register("isBefore", |s, args| {
            is_before(s, reference_arg(args).as_deref())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepted_layouts() {
        for ok in [
            "2011-08-04",
            "04. 08. 2011.",
            "08/04/2011",
            "2011.08.04",
            "4. 8. 2011. GMT",
            "2011-08-04 12:00",
            "2011-08-04T12:00:00Z",
            "Thu, 04 Aug 2011 12:00:00 +0000",
            "Aug 4, 2011",
            "Wed Aug 10 2011 00:00:00 GMT+0300",
        ] {
            assert!(is_date(ok), "{ok}");
        }
    }

    #[test]
    fn test_rejected_layouts() {
        for bad in ["foo", "2011-foo-04", "GMT", "", "2011-13-01", "02/30/2011"] {
            assert!(!is_date(bad), "{bad}");
        }
    }

    #[test]
    fn test_month_first_ordering() {
        let parsed = parse_date("08/04/2011").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2011, 8, 4).unwrap());
    }

    #[test]
    fn test_after() {
        for ok in ["2011-08-04", "2011-09-10"] {
            assert!(is_after(ok, Some("2011-08-03")), "{ok}");
        }
        for bad in ["2010-07-02", "2011-08-03", "1970-01-01", "foo"] {
            assert!(!is_after(bad, Some("2011-08-03")), "{bad}");
        }
        assert!(!is_after("2011-08-04", Some("not a date")));
    }

    #[test]
    fn test_before() {
        for ok in ["2010-07-02", "2010-08-04", "1970-01-01"] {
            assert!(is_before(ok, Some("08/04/2011")), "{ok}");
        }
        for bad in ["08/04/2011", "2011-10-10"] {
            assert!(!is_before(bad, Some("08/04/2011")), "{bad}");
        }
    }

    #[test]
    fn test_default_reference_is_now() {
        assert!(is_before("1999-01-01", None));
        assert!(is_after("2999-01-01", None));
    }

    #[test]
    fn test_reference_arg() {
        assert_eq!(reference_arg(&[]), None);
        assert_eq!(reference_arg(&[json!(true)]), None);
        assert_eq!(reference_arg(&[json!("")]), None);
        assert_eq!(reference_arg(&[json!("2011-08-03")]).as_deref(), Some("2011-08-03"));
    }
}
