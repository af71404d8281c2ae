//! String format checks backed by regular expressions.
//!
//! The date and timestamp patterns check shape only: "2023-06-31" is
//! accepted even though June has 30 days.

use std::sync::LazyLock;

use regex::Regex;
use shapeguard_core::{Validation, Value};
use tracing::debug;

static FORMATS: LazyLock<Formats> = LazyLock::new(Formats::new);

struct Formats {
    email: Regex,
    ipv4: Regex,
    ipv6: Regex,
    iso_date: Regex,
    iso_timestamp: Regex,
    uuid: Regex,
}

const IPV4_OCTET: &str = r"(?:25[0-5]|(?:2[0-4]|1\d|[1-9])?\d)";

impl Formats {
    fn new() -> Self {
        let ipv4 = format!(r"{IPV4_OCTET}(?:\.{IPV4_OCTET}){{3}}");
        let h16 = r"[\da-f]{1,4}";
        let ipv6 = [
            format!(r"(?:{h16}:){{7}}{h16}"),
            format!(r"(?:{h16}:){{1,7}}:"),
            format!(r"(?:{h16}:){{1,6}}:{h16}"),
            format!(r"(?:{h16}:){{1,5}}(?::{h16}){{1,2}}"),
            format!(r"(?:{h16}:){{1,4}}(?::{h16}){{1,3}}"),
            format!(r"(?:{h16}:){{1,3}}(?::{h16}){{1,4}}"),
            format!(r"(?:{h16}:){{1,2}}(?::{h16}){{1,5}}"),
            format!(r"{h16}:(?::{h16}){{1,6}}"),
            format!(r":(?:(?::{h16}){{1,7}}|:)"),
            // link-local with zone index
            r"fe80:(?::[\da-f]{0,4}){0,4}%[\da-z]+".to_string(),
            // IPv4-mapped and IPv4-embedded
            format!(r"::(?:f{{4}}(?::0{{1,4}})?:)?{ipv4}"),
            format!(r"(?:{h16}:){{1,4}}:{ipv4}"),
        ]
        .join("|");

        Self {
            email: Regex::new(r"(?i)^[\w+-]+(?:\.[\w+-]+)*@[\da-z]+(?:[.-][\da-z]+)*\.[a-z]{2,}$")
                .expect("static regex must compile"),
            ipv4: Regex::new(&format!("^{ipv4}$")).expect("static regex must compile"),
            ipv6: Regex::new(&format!("(?i)^(?:{ipv6})$")).expect("static regex must compile"),
            iso_date: Regex::new(r"^\d{4}-(?:0[1-9]|1[0-2])-(?:[12]\d|0[1-9]|3[01])$")
                .expect("static regex must compile"),
            iso_timestamp: Regex::new(
                r"^\d{4}-(?:0[1-9]|1[0-2])-(?:[12]\d|0[1-9]|3[01])T(?:[01]\d|2[0-3]):[0-5]\d:[0-5]\d\.\d{3}Z$",
            )
            .expect("static regex must compile"),
            uuid: Regex::new(r"(?i)^[\da-f]{8}(?:-[\da-f]{4}){3}-[\da-f]{12}$")
                .expect("static regex must compile"),
        }
    }
}

fn matching(name: &'static str, message: &str, pattern: fn(&Formats) -> &Regex) -> Validation {
    Validation::new(name, message, move |input| {
        input.as_str().is_some_and(|s| pattern(&FORMATS).is_match(s))
    })
}

/// Input must be a string matching `pattern`.
pub fn regex(pattern: Regex) -> Validation {
    debug!(pattern = pattern.as_str(), "building regex validation");
    Validation::new("regex", "Invalid format", move |input: &Value| {
        input.as_str().is_some_and(|s| pattern.is_match(s))
    })
}

pub fn email() -> Validation {
    matching("email", "Invalid email", |f| &f.email)
}

/// IPv4 or IPv6 address.
pub fn ip() -> Validation {
    Validation::new("ip", "Invalid IP address", |input| {
        input
            .as_str()
            .is_some_and(|s| FORMATS.ipv4.is_match(s) || FORMATS.ipv6.is_match(s))
    })
}

pub fn ipv4() -> Validation {
    matching("ipv4", "Invalid IPv4 address", |f| &f.ipv4)
}

pub fn ipv6() -> Validation {
    matching("ipv6", "Invalid IPv6 address", |f| &f.ipv6)
}

/// `yyyy-mm-dd`.
pub fn iso_date() -> Validation {
    matching("iso_date", "Invalid date", |f| &f.iso_date)
}

/// `yyyy-mm-ddThh:mm:ss.sssZ`.
pub fn iso_timestamp() -> Validation {
    matching("iso_timestamp", "Invalid timestamp", |f| &f.iso_timestamp)
}

pub fn uuid() -> Validation {
    matching("uuid", "Invalid UUID", |f| &f.uuid)
}
