//! Content checks on strings and arrays.

use shapeguard_core::{Validation, Value};

/// Substring test for strings, membership test for arrays. `None` when the
/// input/requirement pairing is not one of those two.
fn contains(input: &Value, requirement: &Value) -> Option<bool> {
    match (input, requirement) {
        (Value::String(s), Value::String(part)) => Some(s.contains(part.as_str())),
        (Value::String(_), _) => None,
        (Value::Array(items), _) => Some(items.contains(requirement)),
        _ => None,
    }
}

pub fn includes(requirement: impl Into<Value>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "includes",
        format!("Must include {}", requirement.to_json()),
        move |input| contains(input, &requirement) == Some(true),
    )
}

pub fn excludes(requirement: impl Into<Value>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "excludes",
        format!("Must not include {}", requirement.to_json()),
        move |input| contains(input, &requirement) == Some(false),
    )
}

pub fn starts_with(requirement: impl Into<String>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "starts_with",
        format!("Must start with \"{requirement}\""),
        move |input| input.as_str().is_some_and(|s| s.starts_with(&requirement)),
    )
}

pub fn ends_with(requirement: impl Into<String>) -> Validation {
    let requirement = requirement.into();
    Validation::new(
        "ends_with",
        format!("Must end with \"{requirement}\""),
        move |input| input.as_str().is_some_and(|s| s.ends_with(&requirement)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_substrings() {
        assert!(includes("@").validate("a@b".into()).is_ok());
        assert!(includes("@").validate("ab".into()).is_err());
        assert!(excludes(" ").validate("ab".into()).is_ok());
        assert!(excludes(" ").validate("a b".into()).is_err());
    }

    #[test]
    fn test_array_membership() {
        let tags = Value::Array(vec!["red".into(), Value::from(2)]);
        assert!(includes(2).validate(tags.clone()).is_ok());
        assert!(includes("blue").validate(tags.clone()).is_err());
        assert!(excludes("blue").validate(tags).is_ok());
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(starts_with("https://").validate("https://x.io".into()).is_ok());
        assert!(ends_with(".io").validate("https://x.io".into()).is_ok());
        assert!(ends_with(".io").validate("x.com".into()).is_err());
    }

    #[test]
    fn test_inapplicable_pairings_fail() {
        // a number is neither a substring nor absent from a string
        assert!(excludes(1).validate("abc".into()).is_err());
        assert!(includes("a").validate(Value::from(1)).is_err());
        let issue = starts_with("a").validate(Value::Null).unwrap_err();
        assert_eq!(issue.validation, "starts_with");
    }
}
