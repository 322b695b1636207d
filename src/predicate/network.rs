//! Network predicates
//!
//! Email addresses, URLs, domain names and IP addresses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::registry::RegistryBuilder;
use crate::value::to_js_string;

const URL_PROTOCOLS: [&str; 3] = ["http", "https", "ftp"];
const MAX_URL_LEN: usize = 2083;
const MAX_EMAIL_USER_BYTES: usize = 64;
const MAX_EMAIL_DOMAIN_BYTES: usize = 256;

static EMAIL_USER_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i)[a-z0-9!#$%&'*+\-/=?^_`{|}~\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]+$",
    )
    .unwrap()
});
static QUOTED_EMAIL_USER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?i)(?:[\s\x01-\x08\x0b\x0c\x0e-\x1f\x7f\x21\x23-\x5b\x5d-\x7e",
        r"\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]",
        r"|\\[\x01-\x09\x0b\x0c\x0d-\x7f\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}])*$",
    ))
    .unwrap()
});
static TLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(?:[a-z\x{A1}-\x{10FFFF}]{2,}|xn[a-z0-9-]{2,})$").unwrap());
static DOMAIN_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)[a-z0-9\x{A1}-\x{10FFFF}-]+$").unwrap());
static FULL_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{FF01}-\x{FF5E}]").unwrap());
static IPV4: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)$").unwrap());
static IPV6_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)[0-9A-F]{1,4}$").unwrap());

/// IP address family accepted by [`is_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    /// Either family.
    Any,
    /// Dotted-quad IPv4.
    V4,
    /// IPv6, including the IPv4-mapped tail form.
    V6,
}

impl IpVersion {
    /// Read a version argument.
    ///
    /// Absent, `null`, boolean and empty arguments mean [`IpVersion::Any`];
    /// `4`/`"4"` and `6`/`"6"` select a family; anything else is `None`.
    pub fn from_arg(arg: Option<&Value>) -> Option<Self> {
        match arg {
            None | Some(Value::Null) | Some(Value::Bool(_)) => Some(IpVersion::Any),
            Some(other) => match to_js_string(other).as_str() {
                "" => Some(IpVersion::Any),
                "4" => Some(IpVersion::V4),
                "6" => Some(IpVersion::V6),
                _ => None,
            },
        }
    }
}

/// Email address with a fully-qualified domain.
///
/// Dots in the local part are ignored for `gmail.com`/`googlemail.com`,
/// and a quoted local part may contain spaces and escaped characters.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::is_email;
///
/// assert!(is_email("foo+bar@bar.com"));
/// assert!(is_email("\"foobar\"@example.com"));
/// assert!(!is_email("z@co.c"));
/// ```
pub fn is_email(s: &str) -> bool {
    let (user, domain) = match s.rfind('@') {
        Some(at) => (&s[..at], &s[at + 1..]),
        None => ("", s),
    };

    let lower_domain = domain.to_lowercase();
    let user = if lower_domain == "gmail.com" || lower_domain == "googlemail.com" {
        user.replace('.', "").to_lowercase()
    } else {
        user.to_string()
    };

    if user.len() > MAX_EMAIL_USER_BYTES || domain.len() > MAX_EMAIL_DOMAIN_BYTES {
        return false;
    }
    if !is_fqdn(domain) {
        return false;
    }

    if let Some(quoted) = user.strip_prefix('"') {
        let inner = quoted.strip_suffix('"').unwrap_or(quoted);
        return QUOTED_EMAIL_USER.is_match(inner);
    }

    user.split('.').all(|part| EMAIL_USER_PART.is_match(part))
}

/// Fully-qualified domain name with a top-level domain.
///
/// Labels may contain letters, digits, non-ASCII characters and hyphens, but
/// may not start or end with a hyphen or contain three in a row. Full-width
/// characters, underscores and a trailing dot are rejected.
pub fn is_fqdn(s: &str) -> bool {
    let mut labels: Vec<&str> = s.split('.').collect();
    let tld = labels.pop().unwrap_or_default();
    if labels.is_empty() || !TLD.is_match(tld) {
        return false;
    }
    labels.iter().all(|label| {
        DOMAIN_LABEL.is_match(label)
            && !FULL_WIDTH.is_match(label)
            && !label.starts_with('-')
            && !label.ends_with('-')
            && !label.contains("---")
    })
}

/// URL over `http`, `https` or `ftp`; the protocol itself is optional.
///
/// The host must be an IP address, a fully-qualified domain or `localhost`,
/// and an explicit port must be within `1..=65535`.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::is_url;
///
/// assert!(is_url("foobar.com"));
/// assert!(is_url("http://localhost:3000/"));
/// assert!(!is_url("xyz://foobar.com"));
/// assert!(!is_url("http://www.foobar.com:0/"));
/// ```
pub fn is_url(s: &str) -> bool {
    if s.is_empty()
        || s.encode_utf16().count() >= MAX_URL_LEN
        || s.chars().any(char::is_whitespace)
        || s.starts_with("mailto:")
    {
        return false;
    }

    let rest = match s.split_once("://") {
        Some((protocol, rest)) => {
            if !URL_PROTOCOLS.contains(&protocol) {
                return false;
            }
            rest
        }
        None => s,
    };

    let rest = rest.split('#').next().unwrap_or_default();
    let rest = rest.split('?').next().unwrap_or_default();
    let authority = rest.split('/').next().unwrap_or_default();

    let hostname = match authority.split_once('@') {
        Some((auth, hostname)) => {
            if auth.split(':').count() > 2 {
                return false;
            }
            hostname
        }
        None => authority,
    };

    let host = match hostname.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            match port.parse::<u32>() {
                Ok(port) if (1..=65535).contains(&port) => {}
                _ => return false,
            }
            host
        }
        None => hostname,
    };

    is_ip(host, IpVersion::Any) || is_fqdn(host) || host == "localhost"
}

/// IP address of the requested family.
///
/// # Example
///
/// ```rust
/// use rulebook::predicate::{is_ip, IpVersion};
///
/// assert!(is_ip("127.0.0.1", IpVersion::V4));
/// assert!(is_ip("::ffff:127.0.0.1", IpVersion::V6));
/// assert!(!is_ip("::1", IpVersion::V4));
/// assert!(is_ip("fe80::a6db:30ff:fe98:e946", IpVersion::Any));
/// ```
pub fn is_ip(s: &str, version: IpVersion) -> bool {
    match version {
        IpVersion::Any => is_ipv4(s) || is_ipv6(s),
        IpVersion::V4 => is_ipv4(s),
        IpVersion::V6 => is_ipv6(s),
    }
}

fn is_ipv4(s: &str) -> bool {
    let Some(caps) = IPV4.captures(s) else {
        return false;
    };
    caps.iter()
        .skip(1)
        .flatten()
        .all(|octet| octet.as_str().parse::<u16>().is_ok_and(|n| n <= 255))
}

fn is_ipv6(s: &str) -> bool {
    let mut blocks: Vec<&str> = s.split(':').collect();
    let ipv4_tail = blocks.last().is_some_and(|last| is_ipv4(last));
    let expected = if ipv4_tail { 7 } else { 8 };
    if blocks.len() > expected {
        return false;
    }

    let mut omitted = false;
    if s == "::" {
        return true;
    } else if s.starts_with("::") {
        blocks.drain(..2);
        omitted = true;
    } else if s.ends_with("::") {
        blocks.truncate(blocks.len() - 2);
        omitted = true;
    }

    let count = blocks.len();
    for (i, block) in blocks.iter().enumerate() {
        if block.is_empty() && i > 0 && i < count - 1 {
            if omitted {
                return false;
            }
            omitted = true;
        } else if ipv4_tail && i == count - 1 {
            // already checked as an IPv4 address
        } else if !IPV6_BLOCK.is_match(block) {
            return false;
        }
    }

    if omitted {
        count >= 1
    } else {
        count == expected
    }
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register("isEmail", |s, _| is_email(s))
        .register("isURL", |s, _| is_url(s))
        .register("isFQDN", |s, _| is_fqdn(s))
        .register("isIP", |s, args| {
            IpVersion::from_arg(args.first()).is_some_and(|version| is_ip(s, version))
        })
}
