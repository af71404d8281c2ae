//! Object schemas: an ordered key → schema mapping plus an optional rest
//! schema for undeclared keys.
//!
//! Entries are visited in declaration order. A missing key is parsed as
//! [`Value::Undefined`], so optional entries accept it and everything else
//! reports a type issue keyed by the entry name. An entry's output is
//! written back when it is not `undefined` or the key was present in the
//! input. Undeclared keys are parsed against `rest` when one is set and are
//! dropped from the output otherwise.

use indexmap::IndexMap;

use crate::issue::{ChildPaths, accumulate};
use crate::schema::{into_async, type_issue};
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, ContainerKind, IssueReason, Issues, Map, ParseContext, ParseResult, Pipe,
    PipeAsync, Schema, SchemaAsync, SchemaAsyncRef, SchemaKind, SchemaNode, SchemaRef, Value,
};

/// Ordered entries of a synchronous object schema.
pub type Entries = IndexMap<String, SchemaRef>;

/// Ordered entries of an async object schema.
pub type EntriesAsync = IndexMap<String, SchemaAsyncRef>;

/// Settings of an object schema other than its entries.
///
/// Derivation utilities take these explicitly; they are never inherited from
/// the source schemas.
#[derive(Clone, Default)]
pub struct ObjectOptions {
    pub rest: Option<SchemaRef>,
    pub message: Option<String>,
    pub pipe: Pipe,
}

impl ObjectOptions {
    pub fn new() -> Self {
        Self::default()
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
}

/// Settings of an async object schema other than its entries.
#[derive(Clone, Default)]
pub struct ObjectOptionsAsync {
    pub rest: Option<SchemaAsyncRef>,
    pub message: Option<String>,
    pub pipe: PipeAsync,
}

impl ObjectOptionsAsync {
    pub fn new() -> Self {
        Self::default()
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
}

impl From<ObjectOptions> for ObjectOptionsAsync {
    fn from(options: ObjectOptions) -> Self {
        Self {
            rest: options.rest.map(into_async),
            message: options.message,
            pipe: options.pipe.into(),
        }
    }
}

/// Validates a string-keyed record against declared entries.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use shapeguard_core::*;
///
/// let user = object([
///     ("name", string().shared()),
///     ("age", optional(number().shared()).shared()),
/// ]);
/// let ctx = ParseContext::default();
///
/// let out = user.parse(&json!({ "name": "Ada", "extra": 1 }).into(), &ctx).unwrap();
/// assert_eq!(out.to_json(), json!({ "name": "Ada" }));
///
/// let issues = user.parse(&json!({ "age": 3 }).into(), &ctx).unwrap_err();
/// assert_eq!(issues.first().dotted_path().as_deref(), Some("name"));
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    entries: Entries,
    rest: Option<SchemaRef>,
    message: Option<String>,
    pipe: Pipe,
}

impl ObjectSchema {
    pub fn new(entries: Entries) -> Self {
        Self::with_options(entries, ObjectOptions::default())
    }

    pub fn with_options(entries: Entries, options: ObjectOptions) -> Self {
        Self {
            entries,
            rest: options.rest,
            message: options.message,
            pipe: options.pipe,
        }
    }

    /// Schema for keys not listed in the entries.
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

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn rest(&self) -> Option<&SchemaRef> {
        self.rest.as_ref()
    }
}

impl std::fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: IndexMap<_, _> = self
            .entries
            .iter()
            .map(|(key, schema)| (key.as_str(), schema.kind()))
            .collect();
        f.debug_struct("ObjectSchema")
            .field("entries", &entries)
            .field("rest", &self.rest.as_ref().map(|rest| rest.kind()))
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn object<K, I>(entries: I) -> ObjectSchema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SchemaRef)>,
{
    ObjectSchema::new(
        entries
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect(),
    )
}

impl SchemaNode for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }
}

impl Schema for ObjectSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        let Value::Object(fields) = input else {
            return Err(type_issue(
                ctx,
                "object",
                self.message.as_deref().unwrap_or(INVALID_TYPE),
                input,
            ));
        };

        let missing = Value::Undefined;
        let mut issues: Option<Issues> = None;
        let mut paths = ChildPaths::new(ContainerKind::Object, input);
        let mut output = Map::with_capacity(self.entries.len());

        for (key, schema) in &self.entries {
            let field = fields.get(key);
            let value = field.unwrap_or(&missing);
            match schema.parse(value, ctx) {
                Ok(parsed) => {
                    if field.is_some() || !parsed.is_undefined() {
                        output.insert(key.clone(), parsed);
                    }
                }
                Err(entry_issues) => {
                    let path = paths.item(key.as_str(), value);
                    accumulate(&mut issues, entry_issues.with_path_item(path));
                    if ctx.abort_early {
                        break;
                    }
                }
            }
        }

        let rest = self.rest.as_ref().filter(|_| !(ctx.abort_early && issues.is_some()));
        if let Some(rest) = rest {
            for (key, value) in fields.iter().filter(|(key, _)| !self.entries.contains_key(*key)) {
                match rest.parse(value, ctx) {
                    Ok(parsed) => {
                        output.insert(key.clone(), parsed);
                    }
                    Err(rest_issues) => {
                        let path = paths.item(key.as_str(), value);
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
            None => self.pipe.execute(Value::Object(output), ctx, IssueReason::Object),
        }
    }
}

/// Object schema whose entries, rest or pipe may suspend.
#[derive(Clone)]
pub struct ObjectSchemaAsync {
    entries: EntriesAsync,
    rest: Option<SchemaAsyncRef>,
    message: Option<String>,
    pipe: PipeAsync,
}

impl ObjectSchemaAsync {
    pub fn new(entries: EntriesAsync) -> Self {
        Self::with_options(entries, ObjectOptionsAsync::default())
    }

    pub fn with_options(entries: EntriesAsync, options: ObjectOptionsAsync) -> Self {
        Self {
            entries,
            rest: options.rest,
            message: options.message,
            pipe: options.pipe,
        }
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

    pub fn entries(&self) -> &EntriesAsync {
        &self.entries
    }

    pub fn rest(&self) -> Option<&SchemaAsyncRef> {
        self.rest.as_ref()
    }
}

impl From<ObjectSchema> for ObjectSchemaAsync {
    fn from(schema: ObjectSchema) -> Self {
        let entries = schema
            .entries
            .into_iter()
            .map(|(key, entry)| (key, into_async(entry)))
            .collect();
        Self::with_options(
            entries,
            ObjectOptions {
                rest: schema.rest,
                message: schema.message,
                pipe: schema.pipe,
            }
            .into(),
        )
    }
}

impl std::fmt::Debug for ObjectSchemaAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: IndexMap<_, _> = self
            .entries
            .iter()
            .map(|(key, schema)| (key.as_str(), schema.kind()))
            .collect();
        f.debug_struct("ObjectSchemaAsync")
            .field("entries", &entries)
            .field("rest", &self.rest.as_ref().map(|rest| rest.kind()))
            .field("pipe", &self.pipe)
            .finish()
    }
}

pub fn object_async<K, I>(entries: I) -> ObjectSchemaAsync
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SchemaAsyncRef)>,
{
    ObjectSchemaAsync::new(
        entries
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect(),
    )
}

impl SchemaNode for ObjectSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for ObjectSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            let Value::Object(fields) = input else {
                return Err(type_issue(
                    ctx,
                    "object",
                    self.message.as_deref().unwrap_or(INVALID_TYPE),
                    input,
                ));
            };

            let missing = Value::Undefined;
            let mut issues: Option<Issues> = None;
            let mut paths = ChildPaths::new(ContainerKind::Object, input);
            let mut output = Map::with_capacity(self.entries.len());

            for (key, schema) in &self.entries {
                let field = fields.get(key);
                let value = field.unwrap_or(&missing);
                match schema.parse_async(value, ctx).await {
                    Ok(parsed) => {
                        if field.is_some() || !parsed.is_undefined() {
                            output.insert(key.clone(), parsed);
                        }
                    }
                    Err(entry_issues) => {
                        let path = paths.item(key.as_str(), value);
                        accumulate(&mut issues, entry_issues.with_path_item(path));
                        if ctx.abort_early {
                            break;
                        }
                    }
                }
            }

            let rest = self.rest.as_ref().filter(|_| !(ctx.abort_early && issues.is_some()));
            if let Some(rest) = rest {
                for (key, value) in fields.iter().filter(|(key, _)| !self.entries.contains_key(*key)) {
                    match rest.parse_async(value, ctx).await {
                        Ok(parsed) => {
                            output.insert(key.clone(), parsed);
                        }
                        Err(rest_issues) => {
                            let path = paths.item(key.as_str(), value);
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
                        .execute(Value::Object(output), ctx, IssueReason::Object)
                        .await
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        ActionAsync, PathKey, PipeIssue, any, number, optional, optional_async, string,
        string_async,
    };

    fn ctx() -> ParseContext {
        ParseContext::default()
    }

    fn point() -> ObjectSchema {
        object([("x", number().shared()), ("y", number().shared())])
    }

    #[test]
    fn test_rejects_non_object() {
        let issues = point().parse(&Value::Array(vec![]), &ctx()).unwrap_err();
        assert_eq!(issues.first().reason, IssueReason::Type);
        assert_eq!(issues.first().validation, "object");
    }

    #[test]
    fn test_missing_key_reports_undefined_input() {
        let input = Value::from(json!({ "x": 1 }));
        let issues = point().parse(&input, &ctx()).unwrap_err();
        assert_eq!(issues.len(), 1);
        let segment = &issues.first().path[0];
        assert_eq!(segment.container, ContainerKind::Object);
        assert_eq!(segment.key, PathKey::Key("y".into()));
        assert_eq!(*segment.value, Value::Undefined);
        assert_eq!(*segment.input, input);
    }

    #[test]
    fn test_unknown_keys_stripped_without_rest() {
        let input = Value::from(json!({ "y": 2, "z": 3, "x": 1 }));
        let out = point().parse(&input, &ctx()).unwrap();
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["x", "y"]);
    }

    #[test]
    fn test_rest_validates_unknown_keys() {
        let schema = point().with_rest(string().shared());
        let ok = Value::from(json!({ "x": 1, "y": 2, "label": "p" }));
        assert_eq!(schema.parse(&ok, &ctx()).unwrap().to_json(), ok.to_json());

        let bad = Value::from(json!({ "x": 1, "y": 2, "label": 5 }));
        let issues = schema.parse(&bad, &ctx()).unwrap_err();
        assert_eq!(issues.first().path[0].key, PathKey::Key("label".into()));
    }

    #[test]
    fn test_optional_absent_key_not_written() {
        let schema = object([("a", optional(number().shared()).shared())]);
        let out = schema.parse(&json!({}).into(), &ctx()).unwrap();
        assert!(out.as_object().unwrap().is_empty());

        let mut fields = Map::new();
        fields.insert("a".into(), Value::Undefined);
        let out = schema.parse(&Value::Object(fields), &ctx()).unwrap();
        assert_eq!(out.get("a"), Some(&Value::Undefined));
    }

    #[test]
    fn test_optional_default_fills_missing_key() {
        let schema = object([(
            "a",
            optional(number().shared()).with_default(7.into()).shared(),
        )]);
        let out = schema.parse(&json!({}).into(), &ctx()).unwrap();
        assert_eq!(out.get("a"), Some(&Value::from(7)));
    }

    #[test]
    fn test_abort_early_skips_rest() {
        let schema = point().with_rest(string().shared());
        let input = Value::from(json!({ "x": "bad", "y": "bad", "z": 0 }));
        assert_eq!(schema.parse(&input, &ctx()).unwrap_err().len(), 3);
        let issues = schema
            .parse(&input, &ctx().with_abort_early(true))
            .unwrap_err();
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_with_options_sets_everything() {
        let schema = ObjectSchema::with_options(
            point().entries().clone(),
            ObjectOptions::new()
                .with_rest(any().shared())
                .with_message("Expected a point"),
        );
        assert!(schema.rest().is_some());
        let issues = schema.parse(&Value::Null, &ctx()).unwrap_err();
        assert_eq!(issues.first().message, "Expected a point");
    }

    #[tokio::test]
    async fn test_async_object_awaits_entries_in_order() {
        let checked = ActionAsync::new(|input: Value| async move {
            tokio::task::yield_now().await;
            Err(PipeIssue::new("checked", "rejected", input))
        });
        let schema = object_async([
            ("a", string_async().with_pipe(PipeAsync::new().step_async(checked)).shared_async()),
            ("b", number().shared_async()),
            ("c", optional_async(string().shared_async()).shared_async()),
        ]);
        let input = Value::from(json!({ "a": "x", "b": "y" }));
        let issues = schema.parse_async(&input, &ctx()).await.unwrap_err();
        let keys: Vec<_> = issues.iter().map(|i| i.path[0].key.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(issues[0].reason, IssueReason::String);
    }

    #[tokio::test]
    async fn test_converted_sync_object_matches_sync_parse() {
        let sync_schema = point().with_rest(string().shared());
        let async_schema = ObjectSchemaAsync::from(sync_schema.clone());
        let input = Value::from(json!({ "x": "1", "y": 2, "z": 3 }));
        assert_eq!(
            async_schema.parse_async(&input, &ctx()).await,
            sync_schema.parse(&input, &ctx())
        );
    }
}
