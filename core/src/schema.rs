//! The schema-node contract.
//!
//! Every schema kind implements [`SchemaNode`] plus exactly one of
//! [`Schema`] (synchronous `parse`) or [`SchemaAsync`] (`parse_async` may
//! suspend). Every synchronous schema is also usable wherever an
//! asynchronous one is expected, through a blanket impl. The reverse is a
//! type error: synchronous composites only accept [`SchemaRef`] children, so
//! an async child can never hide inside a sync parent.
//!
//! Schemas are immutable once built and are shared through [`Arc`], so a
//! single schema can serve any number of concurrent parse calls.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::{Issue, IssueReason, Issues, ParseContext, Value};

/// Output of one parse: the typed value, or a non-empty issue list.
pub type ParseResult = Result<Value, Issues>;

/// Boxed future returned by [`SchemaAsync::parse_async`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shared handle to a synchronous schema.
pub type SchemaRef = Arc<dyn Schema>;

/// Shared handle to a schema that may suspend.
pub type SchemaAsyncRef = Arc<dyn SchemaAsync>;

/// Discriminant identifying a schema variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Any,
    Array,
    Bigint,
    Boolean,
    Date,
    Intersect,
    Nan,
    Never,
    NonNullable,
    NonNullish,
    NonOptional,
    Null,
    Nullable,
    Nullish,
    Number,
    Object,
    Optional,
    Set,
    Special,
    String,
    Tuple,
    Undefined,
    Unknown,
    /// A leaf kind implemented outside this crate.
    Custom(&'static str),
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::Any => "any",
            SchemaKind::Array => "array",
            SchemaKind::Bigint => "bigint",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Date => "date",
            SchemaKind::Intersect => "intersect",
            SchemaKind::Nan => "nan",
            SchemaKind::Never => "never",
            SchemaKind::NonNullable => "non_nullable",
            SchemaKind::NonNullish => "non_nullish",
            SchemaKind::NonOptional => "non_optional",
            SchemaKind::Null => "null",
            SchemaKind::Nullable => "nullable",
            SchemaKind::Nullish => "nullish",
            SchemaKind::Number => "number",
            SchemaKind::Object => "object",
            SchemaKind::Optional => "optional",
            SchemaKind::Set => "set",
            SchemaKind::Special => "special",
            SchemaKind::String => "string",
            SchemaKind::Tuple => "tuple",
            SchemaKind::Undefined => "undefined",
            SchemaKind::Unknown => "unknown",
            SchemaKind::Custom(name) => name,
        };
        f.write_str(name)
    }
}

/// Identity shared by synchronous and asynchronous schemas.
pub trait SchemaNode: Send + Sync {
    fn kind(&self) -> SchemaKind;

    /// `true` if parsing may suspend.
    fn is_async(&self) -> bool {
        false
    }
}

/// A schema whose parse runs to completion without suspending.
pub trait Schema: SchemaNode {
    /// Validates `input`, returning the typed output or every issue found.
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult;

    /// Moves the schema behind a shared handle.
    fn shared(self) -> SchemaRef
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// A schema whose parse may suspend.
///
/// Nested parses and pipe steps are awaited one at a time in traversal
/// order, so the issue list is identical to what a synchronous equivalent
/// produces.
pub trait SchemaAsync: SchemaNode {
    fn parse_async<'a>(&'a self, input: &'a Value, ctx: &'a ParseContext)
        -> BoxFuture<'a, ParseResult>;

    /// Moves the schema behind a shared async handle.
    fn shared_async(self) -> SchemaAsyncRef
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

impl<S: SchemaNode + ?Sized> SchemaNode for Arc<S> {
    fn kind(&self) -> SchemaKind {
        (**self).kind()
    }

    fn is_async(&self) -> bool {
        (**self).is_async()
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        (**self).parse(input, ctx)
    }
}

impl<S: Schema + ?Sized> SchemaAsync for S {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(std::future::ready(self.parse(input, ctx)))
    }
}

/// Re-exposes an existing synchronous handle as an async one.
pub fn into_async(schema: SchemaRef) -> SchemaAsyncRef {
    Arc::new(schema)
}

/// Builds the single type issue a schema returns when its native check
/// fails.
pub(crate) fn type_issue(
    ctx: &ParseContext,
    validation: &str,
    message: &str,
    input: &Value,
) -> Issues {
    Issues::new(
        Issue::new(IssueReason::Type, validation, message, input.clone()).with_origin(ctx.origin),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{number, string};

    #[test]
    fn test_sync_schema_is_usable_as_async() {
        let schema: SchemaAsyncRef = string().shared_async();
        assert!(!schema.is_async());
        assert_eq!(schema.kind(), SchemaKind::String);
    }

    #[tokio::test]
    async fn test_blanket_async_matches_sync() {
        let schema = number().shared();
        let ctx = ParseContext::default();
        let input = Value::from("nope");
        let sync_result = schema.parse(&input, &ctx);
        let async_result = into_async(schema.clone()).parse_async(&input, &ctx).await;
        assert_eq!(sync_result, async_result);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SchemaKind::NonOptional.to_string(), "non_optional");
        assert_eq!(SchemaKind::Custom("uuid").to_string(), "uuid");
    }
}
