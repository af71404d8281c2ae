//! Top-level parse entry points.
//!
//! [`safe_parse`] returns the full [`ParseResult`]; [`parse`] turns issues
//! into a [`ValidationError`]; [`is_valid`] only reports success. Each takes
//! an optional context and falls back to [`ParseContext::default`].

use tracing::debug;

use crate::{ParseContext, ParseResult, Schema, SchemaAsync, ValidationError, Value};

fn log_outcome(kind: &str, result: &ParseResult) {
    match result {
        Ok(output) => debug!(schema = kind, output = output.type_name(), "parse succeeded"),
        Err(issues) => debug!(schema = kind, issues = issues.len(), "parse failed"),
    }
}

/// Parses `input`, returning every issue on failure.
///
/// ```
/// use shapeguard_core::*;
///
/// let result = safe_parse(&number(), &Value::from("1"), None);
/// assert_eq!(result.unwrap_err().first().reason, IssueReason::Type);
/// ```
pub fn safe_parse<S>(schema: &S, input: &Value, ctx: Option<&ParseContext>) -> ParseResult
where
    S: Schema + ?Sized,
{
    let ctx = ctx.copied().unwrap_or_default();
    let result = schema.parse(input, &ctx);
    log_outcome(&schema.kind().to_string(), &result);
    result
}

/// Parses `input`, failing with a [`ValidationError`].
///
/// ```
/// use shapeguard_core::*;
///
/// let ctx = ParseContext::default().with_abort_early(true);
/// let input = Value::Array(vec!["a".into(), "b".into()]);
/// let err = parse(&array(number().shared()), &input, Some(&ctx)).unwrap_err();
/// assert_eq!(err.issues().len(), 1);
/// assert_eq!(err.to_string(), "0: Invalid type");
/// ```
pub fn parse<S>(
    schema: &S,
    input: &Value,
    ctx: Option<&ParseContext>,
) -> Result<Value, ValidationError>
where
    S: Schema + ?Sized,
{
    safe_parse(schema, input, ctx).map_err(ValidationError::new)
}

/// `true` if `input` parses without issues.
pub fn is_valid<S>(schema: &S, input: &Value, ctx: Option<&ParseContext>) -> bool
where
    S: Schema + ?Sized,
{
    safe_parse(schema, input, ctx).is_ok()
}

/// Async counterpart of [`safe_parse`]; accepts sync schemas too.
pub async fn safe_parse_async<S>(
    schema: &S,
    input: &Value,
    ctx: Option<&ParseContext>,
) -> ParseResult
where
    S: SchemaAsync + ?Sized,
{
    let ctx = ctx.copied().unwrap_or_default();
    let result = schema.parse_async(input, &ctx).await;
    log_outcome(&schema.kind().to_string(), &result);
    result
}

pub async fn parse_async<S>(
    schema: &S,
    input: &Value,
    ctx: Option<&ParseContext>,
) -> Result<Value, ValidationError>
where
    S: SchemaAsync + ?Sized,
{
    safe_parse_async(schema, input, ctx)
        .await
        .map_err(ValidationError::new)
}

pub async fn is_valid_async<S>(schema: &S, input: &Value, ctx: Option<&ParseContext>) -> bool
where
    S: SchemaAsync + ?Sized,
{
    safe_parse_async(schema, input, ctx).await.is_ok()
}
