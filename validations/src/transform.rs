//! Transform steps. Non-string input passes through unchanged.

use shapeguard_core::{Action, Value};

fn map_str(map: fn(&str) -> String) -> Action {
    Action::transform(move |input| match input {
        Value::String(s) => Value::String(map(&s)),
        other => other,
    })
}

/// Strips leading and trailing whitespace.
pub fn to_trimmed() -> Action {
    map_str(|s| s.trim().to_string())
}

pub fn to_lower_case() -> Action {
    map_str(str::to_lowercase)
}

pub fn to_upper_case() -> Action {
    map_str(str::to_uppercase)
}

/// Arbitrary infallible rewrite of the value.
pub fn transform<F>(map: F) -> Action
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    Action::transform(map)
}
