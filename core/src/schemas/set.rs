//! Set schemas: every member validated against one value schema.

use crate::issue::{ChildPaths, accumulate};
use crate::schema::type_issue;
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, ContainerKind, IssueReason, Issues, ParseContext, ParseResult, Pipe,
    PipeAsync, Schema, SchemaAsync, SchemaAsyncRef, SchemaKind, SchemaNode, SchemaRef, Value,
    ValueSet,
};

/// Validates a [`Value::Set`] member by member.
///
/// Members are visited in iteration order and keyed by their visit count
/// for path purposes. The output is a fresh set holding only the members
/// that parsed.
#[derive(Clone)]
pub struct SetSchema {
    value: SchemaRef,
    message: Option<String>,
    pipe: Pipe,
}

impl SetSchema {
    pub fn new(value: SchemaRef) -> Self {
        Self {
            value,
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

    pub fn value(&self) -> &SchemaRef {
        &self.value
    }
}

impl std::fmt::Debug for SetSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetSchema")
            .field("value", &self.value.kind())
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn set(value: SchemaRef) -> SetSchema {
    SetSchema::new(value)
}

impl SchemaNode for SetSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Set
    }
}

impl Schema for SetSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        let Value::Set(members) = input else {
            return Err(type_issue(
                ctx,
                "set",
                self.message.as_deref().unwrap_or(INVALID_TYPE),
                input,
            ));
        };

        let mut issues: Option<Issues> = None;
        let mut paths = ChildPaths::new(ContainerKind::Set, input);
        let mut output = ValueSet::new();

        for (key, member) in members.iter().enumerate() {
            match self.value.parse(member, ctx) {
                Ok(parsed) => {
                    output.insert(parsed);
                }
                Err(member_issues) => {
                    let path = paths.item(key, member);
                    accumulate(&mut issues, member_issues.with_path_item(path));
                    if ctx.abort_early {
                        break;
                    }
                }
            }
        }

        match issues {
            Some(issues) => Err(issues),
            None => self.pipe.execute(Value::Set(output), ctx, IssueReason::Set),
        }
    }
}

/// Set schema whose value schema or pipe may suspend.
#[derive(Clone)]
pub struct SetSchemaAsync {
    value: SchemaAsyncRef,
    message: Option<String>,
    pipe: PipeAsync,
}

impl SetSchemaAsync {
    pub fn new(value: SchemaAsyncRef) -> Self {
        Self {
            value,
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

    pub fn value(&self) -> &SchemaAsyncRef {
        &self.value
    }
}

impl std::fmt::Debug for SetSchemaAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetSchemaAsync")
            .field("value", &self.value.kind())
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn set_async(value: SchemaAsyncRef) -> SetSchemaAsync {
    SetSchemaAsync::new(value)
}

impl SchemaNode for SetSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Set
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for SetSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            let Value::Set(members) = input else {
                return Err(type_issue(
                    ctx,
                    "set",
                    self.message.as_deref().unwrap_or(INVALID_TYPE),
                    input,
                ));
            };

            let mut issues: Option<Issues> = None;
            let mut paths = ChildPaths::new(ContainerKind::Set, input);
            let mut output = ValueSet::new();

            for (key, member) in members.iter().enumerate() {
                match self.value.parse_async(member, ctx).await {
                    Ok(parsed) => {
                        output.insert(parsed);
                    }
                    Err(member_issues) => {
                        let path = paths.item(key, member);
                        accumulate(&mut issues, member_issues.with_path_item(path));
                        if ctx.abort_early {
                            break;
                        }
                    }
                }
            }

            match issues {
                Some(issues) => Err(issues),
                None => self.pipe.execute(Value::Set(output), ctx, IssueReason::Set).await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{Action, number, string};

    fn members(values: Vec<Value>) -> Value {
        Value::Set(values.into_iter().collect())
    }

    #[test]
    fn test_large_set_parses_in_linear_time() {
        let input = members((0..50_000).map(Value::from).collect());
        let started = Instant::now();
        let out = set(number().shared())
            .parse(&input, &ParseContext::default())
            .unwrap();
        assert_eq!(out, input);
        assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
    }

    #[test]
    fn test_set_keys_are_visit_counts() {
        let input = members(vec![1.into(), "a".into(), 2.into(), "b".into()]);
        let issues = set(number().shared())
            .parse(&input, &ParseContext::default())
            .unwrap_err();
        let keys: Vec<_> = issues.iter().map(|i| i.path[0].key.clone()).collect();
        assert_eq!(keys, vec![1.into(), 3.into()]);
        assert_eq!(issues.first().path[0].container, ContainerKind::Set);
        assert_eq!(*issues.first().path[0].value, Value::from("a"));
    }

    #[test]
    fn test_rejects_array_input() {
        let issues = set(number().shared())
            .parse(&Value::Array(vec![1.into()]), &ParseContext::default())
            .unwrap_err();
        assert_eq!(issues.first().validation, "set");
    }

    #[test]
    fn test_transformed_members_collapse_on_duplicates() {
        let lower = string().with_pipe(Pipe::new().step(Action::transform(|v| match v {
            Value::String(s) => Value::String(s.to_lowercase()),
            other => other,
        })));
        let input = members(vec!["A".into(), "a".into(), "b".into()]);
        let out = set(lower.shared()).parse(&input, &ParseContext::default()).unwrap();
        assert_eq!(out, members(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_abort_early_stops_scan() {
        let input = members(vec!["a".into(), "b".into()]);
        let ctx = ParseContext::default().with_abort_early(true);
        let issues = set(number().shared()).parse(&input, &ctx).unwrap_err();
        assert_eq!(issues.len(), 1);
    }

    #[tokio::test]
    async fn test_async_set_matches_sync() {
        let input = members(vec![1.into(), "a".into()]);
        let ctx = ParseContext::default();
        assert_eq!(
            set_async(number().shared_async()).parse_async(&input, &ctx).await,
            set(number().shared()).parse(&input, &ctx)
        );
    }
}
