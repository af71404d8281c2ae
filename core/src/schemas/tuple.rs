//! Tuple schemas: fixed positional items plus an optional rest schema.

use crate::error::{Result, SchemaError};
use crate::issue::{ChildPaths, accumulate};
use crate::schema::type_issue;
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, ContainerKind, IssueReason, Issues, ParseContext, ParseResult, Pipe,
    PipeAsync, Schema, SchemaAsync, SchemaAsyncRef, SchemaKind, SchemaNode, SchemaRef, Value,
};

/// Returns the elements when `input` is a sequence long enough for `arity`
/// fixed items.
fn fixed_slots(input: &Value, arity: usize) -> Option<&[Value]> {
    match input {
        Value::Array(values) if values.len() >= arity => Some(values),
        _ => None,
    }
}

/// Validates a sequence position by position.
///
/// The input must hold at least one element per fixed item. Elements past
/// the fixed items are checked against `rest` when one is set and are left
/// out of the output otherwise.
///
/// # Examples
///
/// ```
/// use shapeguard_core::*;
///
/// let pair = tuple(vec![string().shared(), number().shared()])?;
/// let ctx = ParseContext::default();
///
/// let input = Value::Array(vec!["a".into(), 1.into(), true.into()]);
/// assert_eq!(
///     pair.parse(&input, &ctx),
///     Ok(Value::Array(vec!["a".into(), 1.into()]))
/// );
///
/// let with_rest = pair.with_rest(boolean().shared());
/// assert_eq!(with_rest.parse(&input, &ctx), Ok(input.clone()));
/// # Ok::<(), SchemaError>(())
/// ```
#[derive(Clone)]
pub struct TupleSchema {
    items: Vec<SchemaRef>,
    rest: Option<SchemaRef>,
    message: Option<String>,
    pipe: Pipe,
}

impl TupleSchema {
    /// Fails with [`SchemaError::EmptyTuple`] when `items` is empty.
    pub fn new(items: Vec<SchemaRef>) -> Result<Self> {
        if items.is_empty() {
            return Err(SchemaError::EmptyTuple);
        }
        Ok(Self {
            items,
            rest: None,
            message: None,
            pipe: Pipe::new(),
        })
    }

    pub fn with_rest(mut self, rest: SchemaRef) -> Self {
        self.rest = Some(rest);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pipe(mut self, pipe: Pipe) -> Self {
        self.pipe = pipe;
        self
    }

    pub fn items(&self) -> &[SchemaRef] {
        &self.items
    }

    pub fn rest(&self) -> Option<&SchemaRef> {
        self.rest.as_ref()
    }
}

impl std::fmt::Debug for TupleSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items: Vec<_> = self.items.iter().map(|item| item.kind()).collect();
        f.debug_struct("TupleSchema")
            .field("items", &items)
            .field("rest", &self.rest.as_ref().map(|rest| rest.kind()))
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn tuple(items: Vec<SchemaRef>) -> Result<TupleSchema> {
    TupleSchema::new(items)
}

impl SchemaNode for TupleSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Tuple
    }
}

impl Schema for TupleSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        let Some(values) = fixed_slots(input, self.items.len()) else {
            return Err(type_issue(
                ctx,
                "tuple",
                self.message.as_deref().unwrap_or(INVALID_TYPE),
                input,
            ));
        };

        let mut issues: Option<Issues> = None;
        let mut paths = ChildPaths::new(ContainerKind::Tuple, input);
        let mut output = Vec::with_capacity(values.len());

        for (key, (item, value)) in self.items.iter().zip(values).enumerate() {
            match item.parse(value, ctx) {
                Ok(parsed) => output.push(parsed),
                Err(item_issues) => {
                    let path = paths.item(key, value);
                    accumulate(&mut issues, item_issues.with_path_item(path));
                    if ctx.abort_early {
                        break;
                    }
                }
            }
        }

        let rest = self.rest.as_ref().filter(|_| !(ctx.abort_early && issues.is_some()));
        if let Some(rest) = rest {
            for (key, value) in values.iter().enumerate().skip(self.items.len()) {
                match rest.parse(value, ctx) {
                    Ok(parsed) => output.push(parsed),
                    Err(rest_issues) => {
                        let path = paths.item(key, value);
                        accumulate(&mut issues, rest_issues.with_path_item(path));
                        if ctx.abort_early {
                            break;
                        }
                    }
                }
            }
        }

        match issues {
            Some(issues) => Err(issues),
            None => self.pipe.execute(Value::Array(output), ctx, IssueReason::Tuple),
        }
    }
}

/// Tuple schema whose items, rest or pipe may suspend.
#[derive(Clone)]
pub struct TupleSchemaAsync {
    items: Vec<SchemaAsyncRef>,
    rest: Option<SchemaAsyncRef>,
    message: Option<String>,
    pipe: PipeAsync,
}

impl TupleSchemaAsync {
    pub fn new(items: Vec<SchemaAsyncRef>) -> Result<Self> {
        if items.is_empty() {
            return Err(SchemaError::EmptyTuple);
        }
        Ok(Self {
            items,
            rest: None,
            message: None,
            pipe: PipeAsync::new(),
        })
    }

    pub fn with_rest(mut self, rest: SchemaAsyncRef) -> Self {
        self.rest = Some(rest);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pipe(mut self, pipe: impl Into<PipeAsync>) -> Self {
        self.pipe = pipe.into();
        self
    }

    pub fn items(&self) -> &[SchemaAsyncRef] {
        &self.items
    }

    pub fn rest(&self) -> Option<&SchemaAsyncRef> {
        self.rest.as_ref()
    }
}

impl std::fmt::Debug for TupleSchemaAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items: Vec<_> = self.items.iter().map(|item| item.kind()).collect();
        f.debug_struct("TupleSchemaAsync")
            .field("items", &items)
            .field("rest", &self.rest.as_ref().map(|rest| rest.kind()))
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn tuple_async(items: Vec<SchemaAsyncRef>) -> Result<TupleSchemaAsync> {
    TupleSchemaAsync::new(items)
}

impl SchemaNode for TupleSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Tuple
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for TupleSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            let Some(values) = fixed_slots(input, self.items.len()) else {
                return Err(type_issue(
                    ctx,
                    "tuple",
                    self.message.as_deref().unwrap_or(INVALID_TYPE),
                    input,
                ));
            };

            let mut issues: Option<Issues> = None;
            let mut paths = ChildPaths::new(ContainerKind::Tuple, input);
            let mut output = Vec::with_capacity(values.len());

            for (key, (item, value)) in self.items.iter().zip(values).enumerate() {
                match item.parse_async(value, ctx).await {
                    Ok(parsed) => output.push(parsed),
                    Err(item_issues) => {
                        let path = paths.item(key, value);
                        accumulate(&mut issues, item_issues.with_path_item(path));
                        if ctx.abort_early {
                            break;
                        }
                    }
                }
            }

            let rest = self.rest.as_ref().filter(|_| !(ctx.abort_early && issues.is_some()));
            if let Some(rest) = rest {
                for (key, value) in values.iter().enumerate().skip(self.items.len()) {
                    match rest.parse_async(value, ctx).await {
                        Ok(parsed) => output.push(parsed),
                        Err(rest_issues) => {
                            let path = paths.item(key, value);
                            accumulate(&mut issues, rest_issues.with_path_item(path));
                            if ctx.abort_early {
                                break;
                            }
                        }
                    }
                }
            }

            match issues {
                Some(issues) => Err(issues),
                None => {
                    self.pipe
                        .execute(Value::Array(output), ctx, IssueReason::Tuple)
                        .await
                }
            }
        })
    }
}
