//! Error types for schema construction and parsing.
//!
//! Input-validation failures travel as [`Issues`] inside a
//! [`ParseResult`](crate::ParseResult). The only errors raised outside that
//! channel are [`SchemaError`]s from malformed constructor calls, plus the
//! [`ValidationError`] wrapper returned by the "throwing" entry points.

use thiserror::Error;

use crate::Issues;

/// Malformed schema construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A tuple needs at least one fixed item.
    #[error("tuple schema requires at least one item")]
    EmptyTuple,
    /// An intersection received fewer options than it needs.
    #[error("intersect requires at least {expected} options, got {found}")]
    TooFewOptions { expected: usize, found: usize },
    /// An object merge received fewer schemas than it needs.
    #[error("merge requires at least {expected} object schemas, got {found}")]
    TooFewSchemas { expected: usize, found: usize },
    /// A selected key is not declared by the source object schema.
    #[error("key is not declared by the object schema: {0}")]
    UnknownKey(String),
}

/// Convenience alias for construction results.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Failure returned by [`parse`](crate::parse) and
/// [`parse_async`](crate::parse_async).
///
/// Displays every issue as `path: message`, separated by `; `. The
/// structured list is available through [`issues`](ValidationError::issues).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{issues}")]
pub struct ValidationError {
    issues: Issues,
}

impl ValidationError {
    pub fn new(issues: Issues) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    pub fn into_issues(self) -> Issues {
        self.issues
    }
}

impl From<Issues> for ValidationError {
    fn from(issues: Issues) -> Self {
        Self::new(issues)
    }
}
