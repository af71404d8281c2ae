//! Leaf schemas with a caller-supplied native check.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::schema::type_issue;
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, IssueReason, ParseContext, ParseResult, Pipe, PipeAsync, Schema, SchemaAsync,
    SchemaKind, SchemaNode, Value,
};

type Check = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type CheckAsync = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;

/// Schema whose type check is an arbitrary predicate.
///
/// # Examples
///
/// ```
/// use shapeguard_core::*;
///
/// let even = special(|v| v.as_f64().is_some_and(|n| n % 2.0 == 0.0));
/// let ctx = ParseContext::default();
/// assert!(even.parse(&Value::from(4), &ctx).is_ok());
/// assert!(even.parse(&Value::from(3), &ctx).is_err());
/// ```
#[derive(Clone)]
pub struct SpecialSchema {
    check: Check,
    message: Option<String>,
    pipe: Pipe,
}

impl SpecialSchema {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pipe(mut self, pipe: Pipe) -> Self {
        self.pipe = pipe;
        self
    }
}

impl fmt::Debug for SpecialSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecialSchema")
            .field("message", &self.message)
            .field("pipe", &self.pipe)
            .finish_non_exhaustive()
    }
}

pub fn special<F>(check: F) -> SpecialSchema
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    SpecialSchema {
        check: Arc::new(check),
        message: None,
        pipe: Pipe::new(),
    }
}

impl SchemaNode for SpecialSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Special
    }
}

impl Schema for SpecialSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        if !(self.check)(input) {
            return Err(type_issue(
                ctx,
                "special",
                self.message.as_deref().unwrap_or(INVALID_TYPE),
                input,
            ));
        }
        self.pipe.execute(input.clone(), ctx, IssueReason::Special)
    }
}

/// Schema whose type check may suspend.
#[derive(Clone)]
pub struct SpecialSchemaAsync {
    check: CheckAsync,
    message: Option<String>,
    pipe: PipeAsync,
}

impl SpecialSchemaAsync {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pipe(mut self, pipe: impl Into<PipeAsync>) -> Self {
        self.pipe = pipe.into();
        self
    }
}

impl fmt::Debug for SpecialSchemaAsync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecialSchemaAsync")
            .field("message", &self.message)
            .field("pipe", &self.pipe)
            .finish_non_exhaustive()
    }
}

pub fn special_async<F, Fut>(check: F) -> SpecialSchemaAsync
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    SpecialSchemaAsync {
        check: Arc::new(move |input| Box::pin(check(input))),
        message: None,
        pipe: PipeAsync::new(),
    }
}

impl SchemaNode for SpecialSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Special
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for SpecialSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            if !(self.check)(input.clone()).await {
                return Err(type_issue(
                    ctx,
                    "special",
                    self.message.as_deref().unwrap_or(INVALID_TYPE),
                    input,
                ));
            }
            self.pipe.execute(input.clone(), ctx, IssueReason::Special).await
        })
    }
}
