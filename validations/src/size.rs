//! Size checks for sets and objects.

use shapeguard_core::{Validation, Value};

fn size_of(input: &Value) -> Option<usize> {
    match input {
        Value::Set(set) => Some(set.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

pub fn min_size(requirement: usize) -> Validation {
    Validation::new(
        "min_size",
        format!("Must contain at least {requirement} entries"),
        move |input| size_of(input).is_some_and(|n| n >= requirement),
    )
}

pub fn max_size(requirement: usize) -> Validation {
    Validation::new(
        "max_size",
        format!("Must contain at most {requirement} entries"),
        move |input| size_of(input).is_some_and(|n| n <= requirement),
    )
}

pub fn size(requirement: usize) -> Validation {
    Validation::new(
        "size",
        format!("Must contain exactly {requirement} entries"),
        move |input| size_of(input) == Some(requirement),
    )
}

#[cfg(test)]
mod tests {
    use shapeguard_core::{Map, ValueSet};

    use super::*;

    fn set_of(n: i32) -> Value {
        Value::Set((0..n).map(Value::from).collect::<ValueSet>())
    }

    #[test]
    fn test_set_size() {
        assert!(min_size(2).validate(set_of(2)).is_ok());
        assert!(max_size(2).validate(set_of(3)).is_err());
        assert!(size(0).validate(set_of(0)).is_ok());
    }

    #[test]
    fn test_object_size_counts_keys() {
        let mut map = Map::new();
        map.insert("a".into(), Value::Undefined);
        map.insert("b".into(), Value::Null);
        assert!(size(2).validate(Value::Object(map)).is_ok());
    }

    #[test]
    fn test_arrays_are_not_sized() {
        let issue = max_size(5).validate(Value::Array(Vec::new())).unwrap_err();
        assert_eq!(issue.validation, "max_size");
    }
}
