//! Length checks for strings (counted in chars) and arrays (counted in
//! elements).

use shapeguard_core::{Validation, Value};

fn length_of(input: &Value) -> Option<usize> {
    match input {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

pub fn min_length(requirement: usize) -> Validation {
    Validation::new(
        "min_length",
        format!("Must have a length of at least {requirement}"),
        move |input| length_of(input).is_some_and(|n| n >= requirement),
    )
}

pub fn max_length(requirement: usize) -> Validation {
    Validation::new(
        "max_length",
        format!("Must have a length of at most {requirement}"),
        move |input| length_of(input).is_some_and(|n| n <= requirement),
    )
}

/// Exact length.
pub fn length(requirement: usize) -> Validation {
    Validation::new(
        "length",
        format!("Must have a length of exactly {requirement}"),
        move |input| length_of(input) == Some(requirement),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passes(check: &Validation, input: Value) -> bool {
        check.validate(input).is_ok()
    }

    #[test]
    fn test_strings_count_chars_not_bytes() {
        assert!(passes(&max_length(3), "äöü".into()));
        assert!(passes(&length(3), "äöü".into()));
        assert!(!passes(&min_length(4), "äöü".into()));
    }

    #[test]
    fn test_arrays_count_elements() {
        let pair = Value::Array(vec![Value::Null, Value::from(1)]);
        assert!(passes(&min_length(2), pair.clone()));
        assert!(!passes(&max_length(1), pair.clone()));
        assert!(!passes(&length(3), pair));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(passes(&min_length(2), "ab".into()));
        assert!(passes(&max_length(2), "ab".into()));
        assert!(passes(&min_length(0), "".into()));
    }

    #[test]
    fn test_inapplicable_input_fails() {
        let issue = min_length(0).validate(Value::from(12)).unwrap_err();
        assert_eq!(issue.validation, "min_length");
        assert_eq!(issue.input, Value::from(12));
        assert!(!passes(&max_length(10), Value::Null));
    }

    #[test]
    fn test_default_message_names_requirement() {
        let issue = max_length(2).validate("abc".into()).unwrap_err();
        assert_eq!(issue.message, "Must have a length of at most 2");
        let issue = max_length(2).with_message("too long").validate("abc".into()).unwrap_err();
        assert_eq!(issue.message, "too long");
    }
}
