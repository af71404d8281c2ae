//! Intersection schemas: the input must satisfy every option.
//!
//! Options run in order against the same input. When all of them pass, their
//! outputs are folded into one value with [`merge_outputs`]. A fold that
//! fails is reported as a single `type` issue for the whole intersection.

use tracing::trace;

use crate::error::{Result, SchemaError};
use crate::issue::accumulate;
use crate::schema::type_issue;
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, Issues, ParseContext, ParseResult, Schema, SchemaAsync, SchemaAsyncRef,
    SchemaKind, SchemaNode, SchemaRef, Value,
};

const MIN_OPTIONS: usize = 2;

/// Merges two successful option outputs.
///
/// Objects merge key by key, recursing on keys present in both and keeping
/// keys present in only one. Any other pairing merges only when both sides
/// are equal. Returns `None` on conflict.
///
/// ```
/// use shapeguard_core::*;
///
/// let left = Value::from(serde_json::json!({ "a": 1, "n": { "x": 1 } }));
/// let right = Value::from(serde_json::json!({ "b": 2, "n": { "y": 2 } }));
/// let merged = merge_outputs(left, right).unwrap();
/// assert_eq!(merged.to_json(), serde_json::json!({ "a": 1, "n": { "x": 1, "y": 2 }, "b": 2 }));
///
/// assert!(merge_outputs(Value::from(1), Value::from(2)).is_none());
/// ```
pub fn merge_outputs(left: Value, right: Value) -> Option<Value> {
    match (left, right) {
        (Value::Object(mut merged), Value::Object(other)) => {
            for (key, value) in other {
                match merged.get_mut(&key) {
                    Some(existing) => {
                        let current = std::mem::take(existing);
                        *existing = merge_outputs(current, value)?;
                    }
                    None => {
                        merged.insert(key, value);
                    }
                }
            }
            Some(Value::Object(merged))
        }
        (left, right) if left == right => Some(left),
        _ => None,
    }
}

fn fold_outputs(outputs: Vec<Value>) -> Option<Value> {
    let mut outputs = outputs.into_iter();
    let first = outputs.next()?;
    outputs.try_fold(first, merge_outputs)
}

fn check_options(found: usize) -> Result<()> {
    if found < MIN_OPTIONS {
        return Err(SchemaError::TooFewOptions {
            expected: MIN_OPTIONS,
            found,
        });
    }
    Ok(())
}

/// Finishes a parse once every option ran.
fn conclude(
    issues: Option<Issues>,
    outputs: Vec<Value>,
    input: &Value,
    ctx: &ParseContext,
    message: Option<&str>,
) -> ParseResult {
    if let Some(issues) = issues {
        return Err(issues);
    }
    match fold_outputs(outputs) {
        Some(output) => Ok(output),
        None => {
            trace!(input = input.type_name(), "intersect outputs conflict");
            Err(type_issue(
                ctx,
                "intersect",
                message.unwrap_or(INVALID_TYPE),
                input,
            ))
        }
    }
}

/// Requires the input to pass every option schema.
///
/// # Examples
///
/// ```
/// use shapeguard_core::*;
///
/// let named = object([("name", string().shared())]);
/// let aged = object([("age", number().shared())]);
/// let person = intersect(vec![named.shared(), aged.shared()])?;
///
/// let input = Value::from(serde_json::json!({ "name": "Ada", "age": 36 }));
/// assert_eq!(person.parse(&input, &ParseContext::default()), Ok(input.clone()));
/// # Ok::<(), SchemaError>(())
/// ```
#[derive(Clone)]
pub struct IntersectSchema {
    options: Vec<SchemaRef>,
    message: Option<String>,
}

impl IntersectSchema {
    /// Fails with [`SchemaError::TooFewOptions`] for fewer than two options.
    pub fn new(options: Vec<SchemaRef>) -> Result<Self> {
        check_options(options.len())?;
        Ok(Self {
            options,
            message: None,
        })
    }

    /// Message for the merge conflict issue.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn options(&self) -> &[SchemaRef] {
        &self.options
    }
}

impl std::fmt::Debug for IntersectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options: Vec<_> = self.options.iter().map(|option| option.kind()).collect();
        f.debug_struct("IntersectSchema")
            .field("options", &options)
            .finish()
    }
}

pub fn intersect(options: Vec<SchemaRef>) -> Result<IntersectSchema> {
    IntersectSchema::new(options)
}

impl SchemaNode for IntersectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Intersect
    }
}

impl Schema for IntersectSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        let mut issues: Option<Issues> = None;
        let mut outputs = Vec::with_capacity(self.options.len());

        for option in &self.options {
            match option.parse(input, ctx) {
                Ok(output) => outputs.push(output),
                Err(option_issues) => {
                    accumulate(&mut issues, option_issues);
                    if ctx.abort_early {
                        break;
                    }
                }
            }
        }

        conclude(issues, outputs, input, ctx, self.message.as_deref())
    }
}

/// Intersection whose options may suspend.
#[derive(Clone)]
pub struct IntersectSchemaAsync {
    options: Vec<SchemaAsyncRef>,
    message: Option<String>,
}

impl IntersectSchemaAsync {
    pub fn new(options: Vec<SchemaAsyncRef>) -> Result<Self> {
        check_options(options.len())?;
        Ok(Self {
            options,
            message: None,
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn options(&self) -> &[SchemaAsyncRef] {
        &self.options
    }
}

impl std::fmt::Debug for IntersectSchemaAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options: Vec<_> = self.options.iter().map(|option| option.kind()).collect();
        f.debug_struct("IntersectSchemaAsync")
            .field("options", &options)
            .finish()
    }
}

pub fn intersect_async(options: Vec<SchemaAsyncRef>) -> Result<IntersectSchemaAsync> {
    IntersectSchemaAsync::new(options)
}

impl SchemaNode for IntersectSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Intersect
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for IntersectSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            let mut issues: Option<Issues> = None;
            let mut outputs = Vec::with_capacity(self.options.len());

            for option in &self.options {
                match option.parse_async(input, ctx).await {
                    Ok(output) => outputs.push(output),
                    Err(option_issues) => {
                        accumulate(&mut issues, option_issues);
                        if ctx.abort_early {
                            break;
                        }
                    }
                }
            }

            conclude(issues, outputs, input, ctx, self.message.as_deref())
        })
    }
}
