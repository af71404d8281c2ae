//! Comparisons against a fixed requirement.
//!
//! Only values of the same kind are ordered: numbers with numbers, bigints
//! with bigints, strings lexicographically, dates chronologically. Any
//! other pairing (or a NaN) is incomparable and fails every check here.

use std::cmp::Ordering;

use shapeguard_core::{Validation, Value};

fn compare(input: &Value, requirement: &Value) -> Option<Ordering> {
    match (input, requirement) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn shown(requirement: &Value) -> String {
    requirement.to_json().to_string()
}

pub fn min_value(requirement: impl Into<Value>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "min_value",
        format!("Must be at least {}", shown(&requirement)),
        move |input| matches!(compare(input, &requirement), Some(Ordering::Greater | Ordering::Equal)),
    )
}

pub fn max_value(requirement: impl Into<Value>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "max_value",
        format!("Must be at most {}", shown(&requirement)),
        move |input| matches!(compare(input, &requirement), Some(Ordering::Less | Ordering::Equal)),
    )
}

/// Input must equal `requirement`.
pub fn value(requirement: impl Into<Value>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "value",
        format!("Must be {}", shown(&requirement)),
        move |input| compare(input, &requirement) == Some(Ordering::Equal),
    )
}

/// Input must be comparable with `requirement` and differ from it.
pub fn not_value(requirement: impl Into<Value>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "not_value",
        format!("Must not be {}", shown(&requirement)),
        move |input| matches!(compare(input, &requirement), Some(Ordering::Less | Ordering::Greater)),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_number_bounds_inclusive() {
        assert!(min_value(3).validate(Value::from(3)).is_ok());
        assert!(min_value(3).validate(Value::from(2.5)).is_err());
        assert!(max_value(3).validate(Value::from(3)).is_ok());
        assert!(max_value(3).validate(Value::from(4)).is_err());
    }

    #[test]
    fn test_bigint_and_string_ordering() {
        assert!(min_value(Value::BigInt(10)).validate(Value::BigInt(11)).is_ok());
        assert!(max_value("m").validate("apple".into()).is_ok());
        assert!(max_value("m").validate("zebra".into()).is_err());
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(min_value(cutoff).validate(later.into()).is_ok());
        assert!(max_value(cutoff).validate(later.into()).is_err());
    }

    #[test]
    fn test_mixed_kinds_fail() {
        assert!(min_value(0).validate("5".into()).is_err());
        assert!(max_value(Value::BigInt(5)).validate(Value::from(1)).is_err());
        assert!(min_value(0).validate(Value::Number(f64::NAN)).is_err());
    }

    #[test]
    fn test_value_and_not_value() {
        assert!(value("on").validate("on".into()).is_ok());
        assert!(value("on").validate("off".into()).is_err());
        assert!(not_value(0).validate(Value::from(1)).is_ok());
        let issue = not_value(0).validate(Value::from(0)).unwrap_err();
        assert_eq!(issue.validation, "not_value");
        assert_eq!(issue.message, "Must not be 0");
        // a string is not comparable with a number, so it is not "different" either
        assert!(not_value(0).validate("0".into()).is_err());
    }
}
