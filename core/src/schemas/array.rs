//! Array schemas: every element validated against one item schema.

use crate::issue::{ChildPaths, accumulate};
use crate::schema::type_issue;
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, ContainerKind, IssueReason, Issues, ParseContext, ParseResult, Pipe,
    PipeAsync, Schema, SchemaAsync, SchemaAsyncRef, SchemaKind, SchemaNode, SchemaRef, Value,
};

/// Validates an ordered sequence element by element.
///
/// Failing elements are left out of the output and their issues are keyed
/// by index. With `abort_early` the scan stops at the first failing
/// element. The schema pipe only runs when every element passed.
///
/// # Examples
///
/// ```
/// use shapeguard_core::*;
///
/// let schema = array(number().shared());
/// let input = Value::Array(vec!["x".into(), 2.into(), "y".into()]);
///
/// let all = schema.parse(&input, &ParseContext::default()).unwrap_err();
/// assert_eq!(all.len(), 2);
///
/// let first = schema
///     .parse(&input, &ParseContext::default().with_abort_early(true))
///     .unwrap_err();
/// assert_eq!(first.len(), 1);
/// assert_eq!(first.first().path[0].key, PathKey::Index(0));
/// ```
#[derive(Clone)]
pub struct ArraySchema {
    item: SchemaRef,
    message: Option<String>,
    pipe: Pipe,
}

impl ArraySchema {
    pub fn new(item: SchemaRef) -> Self {
        Self {
            item,
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

    pub fn item(&self) -> &SchemaRef {
        &self.item
    }
}

impl std::fmt::Debug for ArraySchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArraySchema")
            .field("item", &self.item.kind())
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn array(item: SchemaRef) -> ArraySchema {
    ArraySchema::new(item)
}

impl SchemaNode for ArraySchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }
}

impl Schema for ArraySchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        let Value::Array(items) = input else {
            return Err(type_issue(
                ctx,
                "array",
                self.message.as_deref().unwrap_or(INVALID_TYPE),
                input,
            ));
        };

        let mut issues: Option<Issues> = None;
        let mut paths = ChildPaths::new(ContainerKind::Array, input);
        let mut output = Vec::with_capacity(items.len());

        for (key, value) in items.iter().enumerate() {
            match self.item.parse(value, ctx) {
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

        match issues {
            Some(issues) => Err(issues),
            None => self.pipe.execute(Value::Array(output), ctx, IssueReason::Array),
        }
    }
}

/// Array schema whose item schema or pipe may suspend.
#[derive(Clone)]
pub struct ArraySchemaAsync {
    item: SchemaAsyncRef,
    message: Option<String>,
    pipe: PipeAsync,
}

impl ArraySchemaAsync {
    pub fn new(item: SchemaAsyncRef) -> Self {
        Self {
            item,
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

    pub fn item(&self) -> &SchemaAsyncRef {
        &self.item
    }
}

impl std::fmt::Debug for ArraySchemaAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArraySchemaAsync")
            .field("item", &self.item.kind())
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn array_async(item: SchemaAsyncRef) -> ArraySchemaAsync {
    ArraySchemaAsync::new(item)
}

impl SchemaNode for ArraySchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for ArraySchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            let Value::Array(items) = input else {
                return Err(type_issue(
                    ctx,
                    "array",
                    self.message.as_deref().unwrap_or(INVALID_TYPE),
                    input,
                ));
            };

            let mut issues: Option<Issues> = None;
            let mut paths = ChildPaths::new(ContainerKind::Array, input);
            let mut output = Vec::with_capacity(items.len());

            for (key, value) in items.iter().enumerate() {
                match self.item.parse_async(value, ctx).await {
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

            match issues {
                Some(issues) => Err(issues),
                None => {
                    self.pipe
                        .execute(Value::Array(output), ctx, IssueReason::Array)
                        .await
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::{Action, ActionAsync, PipeIssue, number, number_async, string};

    fn mixed() -> Value {
        Value::Array(vec!["x".into(), 2.into(), "y".into()])
    }

    #[test]
    fn test_collects_issue_per_failing_element() {
        let issues = array(number().shared())
            .parse(&mixed(), &ParseContext::default())
            .unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path[0].key, 0.into());
        assert_eq!(issues[1].path[0].key, 2.into());
        assert_eq!(issues[0].path[0].container, ContainerKind::Array);
        assert_eq!(*issues[0].path[0].input, mixed());
        assert_eq!(*issues[1].path[0].value, Value::from("y"));
    }

    #[test]
    fn test_abort_early_stops_at_first_failure() {
        let ctx = ParseContext::default().with_abort_early(true);
        let issues = array(number().shared()).parse(&mixed(), &ctx).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path[0].key, 0.into());
    }

    #[test]
    fn test_rejects_non_array() {
        let issues = array(number().shared())
            .parse(&Value::from("[]"), &ParseContext::default())
            .unwrap_err();
        assert_eq!(issues.first().reason, IssueReason::Type);
        assert_eq!(issues.first().validation, "array");
    }

    #[test]
    fn test_nested_paths_read_outermost_first() {
        let schema = array(array(string().shared()).shared());
        let inner = Value::Array(vec!["a".into(), Value::from(1)]);
        let outer = Value::Array(vec![Value::Array(vec![]), inner.clone()]);
        let issues = schema.parse(&outer, &ParseContext::default()).unwrap_err();

        let path = &issues.first().path;
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].key, 1.into());
        assert_eq!(*path[0].input, outer);
        assert_eq!(path[1].key, 1.into());
        assert_eq!(*path[1].input, inner);
    }

    #[test]
    fn test_failing_elements_share_one_container_copy() {
        let input = Value::Array((0..10_000).map(|i| Value::from(i.to_string())).collect());
        let issues = array(number().shared())
            .parse(&input, &ParseContext::default())
            .unwrap_err();
        assert_eq!(issues.len(), 10_000);
        let container = &issues[0].path[0].input;
        assert!(issues.iter().all(|issue| Arc::ptr_eq(&issue.path[0].input, container)));
    }

    #[test]
    fn test_nested_failures_share_row_and_grid() {
        let row = Value::Array((0..100).map(|_| Value::Null).collect());
        let grid = Value::Array(vec![row; 100]);
        let issues = array(array(number().shared()).shared())
            .parse(&grid, &ParseContext::default())
            .unwrap_err();
        assert_eq!(issues.len(), 10_000);
        for row_issues in issues.into_vec().chunks(100) {
            let outer = &row_issues[0].path[0];
            let inner = &row_issues[0].path[1];
            assert!(row_issues.iter().all(|issue| {
                Arc::ptr_eq(&issue.path[0].value, &outer.value)
                    && Arc::ptr_eq(&issue.path[1].input, &inner.input)
            }));
        }
    }

    #[test]
    fn test_pipe_runs_only_without_item_issues() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let pipe = Pipe::new().step(Action::new(move |input| {
            *counter.lock().unwrap() += 1;
            Err(PipeIssue::new("reject", "rejected", input))
        }));
        let schema = array(number().shared()).with_pipe(pipe);

        assert!(schema.parse(&mixed(), &ParseContext::default()).is_err());
        assert_eq!(*calls.lock().unwrap(), 0);

        let issues = schema
            .parse(&Value::Array(vec![1.into()]), &ParseContext::default())
            .unwrap_err();
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(issues.first().reason, IssueReason::Array);
        assert!(issues.first().path.is_empty());
    }

    #[tokio::test]
    async fn test_async_array_matches_sync_order() {
        // Later elements finish faster; reported order must still follow the input.
        let slow_first = ActionAsync::new(|input: Value| async move {
            let delay = match &input {
                Value::Number(n) => 30 - (*n as u64) * 10,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Err(PipeIssue::new("delayed", "delayed failure", input))
        });
        let item = number_async().with_pipe(PipeAsync::new().step_async(slow_first));
        let schema = array_async(item.shared_async());
        let input = Value::Array(vec![0.into(), 1.into(), 2.into()]);

        let issues = schema
            .parse_async(&input, &ParseContext::default())
            .await
            .unwrap_err();
        let keys: Vec<_> = issues.iter().map(|i| i.path[0].key.clone()).collect();
        assert_eq!(keys, vec![0.into(), 1.into(), 2.into()]);
    }

    #[tokio::test]
    async fn test_async_array_embeds_sync_item() {
        let schema = array_async(number().shared_async());
        let sync_schema = array(number().shared());
        for ctx in [
            ParseContext::default(),
            ParseContext::default().with_abort_early(true),
        ] {
            assert_eq!(
                schema.parse_async(&mixed(), &ctx).await,
                sync_schema.parse(&mixed(), &ctx)
            );
        }
    }
}
