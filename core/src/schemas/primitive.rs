//! Leaf schemas backed by a native representation check.
//!
//! Each leaf checks the input's variant, returns a single `type` issue on
//! mismatch, and otherwise hands the value to its pipe. Pipes never add a
//! path segment.

use crate::schema::type_issue;
use crate::{
    BoxFuture, IssueReason, ParseContext, ParseResult, Pipe, PipeAsync, Schema, SchemaAsync,
    SchemaKind, SchemaNode, Value,
};

/// Default message for failed type checks.
pub const INVALID_TYPE: &str = "Invalid type";

/// Describes one native type check.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    kind: SchemaKind,
    reason: IssueReason,
    check: fn(&Value) -> bool,
}

impl Primitive {
    pub const fn new(kind: SchemaKind, reason: IssueReason, check: fn(&Value) -> bool) -> Self {
        Self {
            kind,
            reason,
            check,
        }
    }

    pub fn matches(&self, input: &Value) -> bool {
        (self.check)(input)
    }
}

pub const ANY: Primitive = Primitive::new(SchemaKind::Any, IssueReason::Any, |_| true);
pub const UNKNOWN: Primitive = Primitive::new(SchemaKind::Unknown, IssueReason::Unknown, |_| true);
pub const NEVER: Primitive = Primitive::new(SchemaKind::Never, IssueReason::Type, |_| false);
pub const STRING: Primitive =
    Primitive::new(SchemaKind::String, IssueReason::String, |v| matches!(v, Value::String(_)));
pub const NUMBER: Primitive = Primitive::new(SchemaKind::Number, IssueReason::Number, |v| {
    matches!(v, Value::Number(n) if !n.is_nan())
});
pub const NAN: Primitive = Primitive::new(SchemaKind::Nan, IssueReason::Type, |v| {
    matches!(v, Value::Number(n) if n.is_nan())
});
pub const BIGINT: Primitive =
    Primitive::new(SchemaKind::Bigint, IssueReason::Bigint, |v| matches!(v, Value::BigInt(_)));
pub const BOOLEAN: Primitive =
    Primitive::new(SchemaKind::Boolean, IssueReason::Boolean, |v| matches!(v, Value::Bool(_)));
pub const DATE: Primitive =
    Primitive::new(SchemaKind::Date, IssueReason::Date, |v| matches!(v, Value::Date(_)));
pub const NULL: Primitive =
    Primitive::new(SchemaKind::Null, IssueReason::Type, |v| matches!(v, Value::Null));
pub const UNDEFINED: Primitive =
    Primitive::new(SchemaKind::Undefined, IssueReason::Type, |v| matches!(v, Value::Undefined));

/// Synchronous leaf schema.
///
/// # Examples
///
/// ```
/// use shapeguard_core::*;
///
/// let ctx = ParseContext::default();
/// let schema = number().with_message("Expected a number");
///
/// assert_eq!(schema.parse(&Value::from(4), &ctx), Ok(Value::from(4)));
///
/// let issues = schema.parse(&Value::from("4"), &ctx).unwrap_err();
/// assert_eq!(issues.first().reason, IssueReason::Type);
/// assert_eq!(issues.first().message, "Expected a number");
/// ```
#[derive(Debug, Clone)]
pub struct PrimitiveSchema {
    primitive: Primitive,
    message: Option<String>,
    pipe: Pipe,
}

impl PrimitiveSchema {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            message: None,
            pipe: Pipe::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pipe(mut self, pipe: Pipe) -> Self {
        self.pipe = pipe;
        self
    }
}

impl SchemaNode for PrimitiveSchema {
    fn kind(&self) -> SchemaKind {
        self.primitive.kind
    }
}

impl Schema for PrimitiveSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        if !self.primitive.matches(input) {
            return Err(type_issue(
                ctx,
                &self.primitive.kind.to_string(),
                self.message.as_deref().unwrap_or(INVALID_TYPE),
                input,
            ));
        }
        self.pipe.execute(input.clone(), ctx, self.primitive.reason)
    }
}

/// Leaf schema whose pipe may suspend.
#[derive(Debug, Clone)]
pub struct PrimitiveSchemaAsync {
    primitive: Primitive,
    message: Option<String>,
    pipe: PipeAsync,
}

impl PrimitiveSchemaAsync {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            message: None,
            pipe: PipeAsync::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pipe(mut self, pipe: impl Into<PipeAsync>) -> Self {
        self.pipe = pipe.into();
        self
    }
}

impl SchemaNode for PrimitiveSchemaAsync {
    fn kind(&self) -> SchemaKind {
        self.primitive.kind
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for PrimitiveSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            if !self.primitive.matches(input) {
                return Err(type_issue(
                    ctx,
                    &self.primitive.kind.to_string(),
                    self.message.as_deref().unwrap_or(INVALID_TYPE),
                    input,
                ));
            }
            self.pipe.execute(input.clone(), ctx, self.primitive.reason).await
        })
    }
}

/// Accepts any value.
pub fn any() -> PrimitiveSchema {
    PrimitiveSchema::new(ANY)
}

/// Accepts any value.
pub fn unknown() -> PrimitiveSchema {
    PrimitiveSchema::new(UNKNOWN)
}

/// Rejects every value.
pub fn never() -> PrimitiveSchema {
    PrimitiveSchema::new(NEVER)
}

pub fn string() -> PrimitiveSchema {
    PrimitiveSchema::new(STRING)
}

/// Accepts numbers other than NaN.
pub fn number() -> PrimitiveSchema {
    PrimitiveSchema::new(NUMBER)
}

/// Accepts only NaN.
pub fn nan() -> PrimitiveSchema {
    PrimitiveSchema::new(NAN)
}

pub fn bigint() -> PrimitiveSchema {
    PrimitiveSchema::new(BIGINT)
}

pub fn boolean() -> PrimitiveSchema {
    PrimitiveSchema::new(BOOLEAN)
}

pub fn date() -> PrimitiveSchema {
    PrimitiveSchema::new(DATE)
}

pub fn null() -> PrimitiveSchema {
    PrimitiveSchema::new(NULL)
}

/// Accepts only [`Value::Undefined`].
pub fn undefined() -> PrimitiveSchema {
    PrimitiveSchema::new(UNDEFINED)
}

pub fn any_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(ANY)
}

pub fn unknown_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(UNKNOWN)
}

pub fn never_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(NEVER)
}

pub fn string_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(STRING)
}

pub fn number_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(NUMBER)
}

pub fn nan_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(NAN)
}

pub fn bigint_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(BIGINT)
}

pub fn boolean_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(BOOLEAN)
}

pub fn date_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(DATE)
}

pub fn null_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(NULL)
}

pub fn undefined_async() -> PrimitiveSchemaAsync {
    PrimitiveSchemaAsync::new(UNDEFINED)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Action, PipeIssue};

    fn ctx() -> ParseContext {
        ParseContext::default()
    }

    #[test]
    fn test_type_mismatch_yields_single_type_issue() {
        let cases: Vec<(PrimitiveSchema, Value)> = vec![
            (string(), Value::from(1)),
            (number(), Value::from("1")),
            (number(), Value::Number(f64::NAN)),
            (nan(), Value::from(1)),
            (bigint(), Value::from(1)),
            (boolean(), Value::Null),
            (date(), Value::from("2024-01-01")),
            (null(), Value::Undefined),
            (undefined(), Value::Null),
            (never(), Value::from(true)),
        ];
        for (schema, input) in cases {
            let issues = schema.parse(&input, &ctx()).unwrap_err();
            assert_eq!(issues.len(), 1, "{}", schema.kind());
            assert_eq!(issues.first().reason, IssueReason::Type);
            assert_eq!(issues.first().validation, schema.kind().to_string());
            assert_eq!(issues.first().message, INVALID_TYPE);
            assert!(issues.first().path.is_empty());
        }
    }

    #[test]
    fn test_matching_input_passes_through() {
        let when = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let cases: Vec<(PrimitiveSchema, Value)> = vec![
            (any(), Value::Undefined),
            (unknown(), Value::from("x")),
            (string(), Value::from("x")),
            (number(), Value::from(1.5)),
            (bigint(), Value::BigInt(1 << 70)),
            (boolean(), Value::from(false)),
            (date(), Value::Date(when)),
            (null(), Value::Null),
            (undefined(), Value::Undefined),
        ];
        for (schema, input) in cases {
            assert_eq!(schema.parse(&input, &ctx()), Ok(input.clone()));
        }
    }

    #[test]
    fn test_nan_schema_accepts_nan() {
        let out = nan().parse(&Value::Number(f64::NAN), &ctx()).unwrap();
        assert!(out.as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_pipe_issue_uses_schema_reason() {
        let schema = string().with_pipe(Pipe::new().step(Action::new(|input| {
            Err(PipeIssue::new("always", "nope", input))
        })));
        let issues = schema.parse(&"x".into(), &ctx()).unwrap_err();
        assert_eq!(issues.first().reason, IssueReason::String);
        assert_eq!(issues.first().validation, "always");
    }

    #[test]
    fn test_pipe_does_not_run_after_type_failure() {
        let schema = string().with_pipe(Pipe::new().step(Action::new(|input| {
            Err(PipeIssue::new("always", "nope", input))
        })));
        let issues = schema.parse(&Value::from(1), &ctx()).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.first().validation, "string");
    }

    #[tokio::test]
    async fn test_async_leaf_matches_sync_leaf() {
        let input = Value::from(3);
        assert_eq!(
            number_async().parse_async(&input, &ctx()).await,
            number().parse(&input, &ctx())
        );
        let bad = Value::from("3");
        assert_eq!(
            number_async().parse_async(&bad, &ctx()).await,
            number().parse(&bad, &ctx())
        );
        assert!(number_async().is_async());
    }
}
