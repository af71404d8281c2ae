//! Modifier schemas wrapping exactly one other schema.
//!
//! `optional`, `nullable` and `nullish` short-circuit on `undefined`,
//! `null` or both, yielding their default (or the input itself) without
//! consulting the wrapped schema. `non_optional`, `non_nullable` and
//! `non_nullish` reject those inputs with a `type` issue and otherwise
//! delegate.

use crate::schema::type_issue;
use crate::schemas::primitive::INVALID_TYPE;
use crate::{
    BoxFuture, ParseContext, ParseResult, Schema, SchemaAsync, SchemaAsyncRef, SchemaKind,
    SchemaNode, SchemaRef, Value,
};

/// Which inputs a modifier intercepts and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Optional,
    Nullable,
    Nullish,
    NonOptional,
    NonNullable,
    NonNullish,
}

impl Modifier {
    fn kind(self) -> SchemaKind {
        match self {
            Modifier::Optional => SchemaKind::Optional,
            Modifier::Nullable => SchemaKind::Nullable,
            Modifier::Nullish => SchemaKind::Nullish,
            Modifier::NonOptional => SchemaKind::NonOptional,
            Modifier::NonNullable => SchemaKind::NonNullable,
            Modifier::NonNullish => SchemaKind::NonNullish,
        }
    }

    fn intercepts(self, input: &Value) -> bool {
        match self {
            Modifier::Optional | Modifier::NonOptional => input.is_undefined(),
            Modifier::Nullable | Modifier::NonNullable => input.is_null(),
            Modifier::Nullish | Modifier::NonNullish => input.is_undefined() || input.is_null(),
        }
    }

    fn accepts_intercepted(self) -> bool {
        matches!(
            self,
            Modifier::Optional | Modifier::Nullable | Modifier::Nullish
        )
    }
}

/// Outcome of the modifier check, before the wrapped schema runs.
enum Gate {
    Done(ParseResult),
    Delegate,
}

#[derive(Debug, Clone)]
struct ModifierState {
    modifier: Modifier,
    default: Option<Value>,
    message: Option<String>,
}

impl ModifierState {
    fn gate(&self, input: &Value, ctx: &ParseContext) -> Gate {
        if !self.modifier.intercepts(input) {
            return Gate::Delegate;
        }
        if self.modifier.accepts_intercepted() {
            let output = self.default.clone().unwrap_or_else(|| input.clone());
            return Gate::Done(Ok(output));
        }
        Gate::Done(Err(type_issue(
            ctx,
            &self.modifier.kind().to_string(),
            self.message.as_deref().unwrap_or(INVALID_TYPE),
            input,
        )))
    }
}

/// A synchronous modifier schema.
///
/// # Examples
///
/// ```
/// use shapeguard_core::*;
///
/// let ctx = ParseContext::default();
/// let schema = optional(number().shared()).with_default(Value::from(0));
///
/// assert_eq!(schema.parse(&Value::Undefined, &ctx), Ok(Value::from(0)));
/// assert_eq!(schema.parse(&Value::from(7), &ctx), Ok(Value::from(7)));
/// assert!(schema.parse(&Value::Null, &ctx).is_err());
/// ```
#[derive(Clone)]
pub struct WrappedSchema {
    state: ModifierState,
    wrapped: SchemaRef,
}

impl WrappedSchema {
    pub fn new(modifier: Modifier, wrapped: SchemaRef) -> Self {
        Self {
            state: ModifierState {
                modifier,
                default: None,
                message: None,
            },
            wrapped,
        }
    }

    /// Value substituted for intercepted input (`optional`, `nullable`,
    /// `nullish` only).
    pub fn with_default(mut self, default: Value) -> Self {
        self.state.default = Some(default);
        self
    }

    /// Message for rejected input (`non_*` modifiers only).
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.state.message = Some(message.into());
        self
    }

    pub fn modifier(&self) -> Modifier {
        self.state.modifier
    }

    pub fn wrapped(&self) -> &SchemaRef {
        &self.wrapped
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.state.default.as_ref()
    }
}

impl std::fmt::Debug for WrappedSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedSchema")
            .field("modifier", &self.state.modifier)
            .field("wrapped", &self.wrapped.kind())
            .finish()
    }
}

impl SchemaNode for WrappedSchema {
    fn kind(&self) -> SchemaKind {
        self.state.modifier.kind()
    }
}

impl Schema for WrappedSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        match self.state.gate(input, ctx) {
            Gate::Done(result) => result,
            Gate::Delegate => self.wrapped.parse(input, ctx),
        }
    }
}

/// A modifier around a schema that may suspend.
#[derive(Clone)]
pub struct WrappedSchemaAsync {
    state: ModifierState,
    wrapped: SchemaAsyncRef,
}

impl WrappedSchemaAsync {
    pub fn new(modifier: Modifier, wrapped: SchemaAsyncRef) -> Self {
        Self {
            state: ModifierState {
                modifier,
                default: None,
                message: None,
            },
            wrapped,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.state.default = Some(default);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.state.message = Some(message.into());
        self
    }

    pub fn modifier(&self) -> Modifier {
        self.state.modifier
    }

    pub fn wrapped(&self) -> &SchemaAsyncRef {
        &self.wrapped
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.state.default.as_ref()
    }
}

impl std::fmt::Debug for WrappedSchemaAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedSchemaAsync")
            .field("modifier", &self.state.modifier)
            .field("wrapped", &self.wrapped.kind())
            .finish()
    }
}

impl SchemaNode for WrappedSchemaAsync {
    fn kind(&self) -> SchemaKind {
        self.state.modifier.kind()
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for WrappedSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move {
            match self.state.gate(input, ctx) {
                Gate::Done(result) => result,
                Gate::Delegate => self.wrapped.parse_async(input, ctx).await,
            }
        })
    }
}

pub fn optional(wrapped: SchemaRef) -> WrappedSchema {
    WrappedSchema::new(Modifier::Optional, wrapped)
}

pub fn nullable(wrapped: SchemaRef) -> WrappedSchema {
    WrappedSchema::new(Modifier::Nullable, wrapped)
}

pub fn nullish(wrapped: SchemaRef) -> WrappedSchema {
    WrappedSchema::new(Modifier::Nullish, wrapped)
}

pub fn non_optional(wrapped: SchemaRef) -> WrappedSchema {
    WrappedSchema::new(Modifier::NonOptional, wrapped)
}

pub fn non_nullable(wrapped: SchemaRef) -> WrappedSchema {
    WrappedSchema::new(Modifier::NonNullable, wrapped)
}

pub fn non_nullish(wrapped: SchemaRef) -> WrappedSchema {
    WrappedSchema::new(Modifier::NonNullish, wrapped)
}

pub fn optional_async(wrapped: SchemaAsyncRef) -> WrappedSchemaAsync {
    WrappedSchemaAsync::new(Modifier::Optional, wrapped)
}

pub fn nullable_async(wrapped: SchemaAsyncRef) -> WrappedSchemaAsync {
    WrappedSchemaAsync::new(Modifier::Nullable, wrapped)
}

pub fn nullish_async(wrapped: SchemaAsyncRef) -> WrappedSchemaAsync {
    WrappedSchemaAsync::new(Modifier::Nullish, wrapped)
}

pub fn non_optional_async(wrapped: SchemaAsyncRef) -> WrappedSchemaAsync {
    WrappedSchemaAsync::new(Modifier::NonOptional, wrapped)
}

pub fn non_nullable_async(wrapped: SchemaAsyncRef) -> WrappedSchemaAsync {
    WrappedSchemaAsync::new(Modifier::NonNullable, wrapped)
}

pub fn non_nullish_async(wrapped: SchemaAsyncRef) -> WrappedSchemaAsync {
    WrappedSchemaAsync::new(Modifier::NonNullish, wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IssueReason, number, string};

    fn ctx() -> ParseContext {
        ParseContext::default()
    }

    #[test]
    fn test_optional_passes_undefined_without_default() {
        let schema = optional(string().shared());
        assert_eq!(schema.parse(&Value::Undefined, &ctx()), Ok(Value::Undefined));
        assert!(schema.parse(&Value::from(1), &ctx()).is_err());
    }

    #[test]
    fn test_nullable_and_nullish() {
        let nullable_schema = nullable(number().shared());
        assert_eq!(nullable_schema.parse(&Value::Null, &ctx()), Ok(Value::Null));
        assert!(nullable_schema.parse(&Value::Undefined, &ctx()).is_err());

        let nullish_schema = nullish(number().shared()).with_default(Value::from(1));
        assert_eq!(nullish_schema.parse(&Value::Null, &ctx()), Ok(Value::from(1)));
        assert_eq!(nullish_schema.parse(&Value::Undefined, &ctx()), Ok(Value::from(1)));
        assert_eq!(nullish_schema.default_value(), Some(&Value::from(1)));
    }

    #[test]
    fn test_non_optional_rejects_undefined_even_if_wrapped_is_optional() {
        let schema = non_optional(optional(number().shared()).shared());
        let issues = schema.parse(&Value::Undefined, &ctx()).unwrap_err();
        assert_eq!(issues.first().reason, IssueReason::Type);
        assert_eq!(issues.first().validation, "non_optional");
        assert_eq!(schema.parse(&Value::from(2), &ctx()), Ok(Value::from(2)));
    }

    #[test]
    fn test_non_nullable_and_non_nullish() {
        let schema = non_nullable(nullable(number().shared()).shared()).with_message("required");
        let issues = schema.parse(&Value::Null, &ctx()).unwrap_err();
        assert_eq!(issues.first().message, "required");

        let schema = non_nullish(nullish(number().shared()).shared());
        assert!(schema.parse(&Value::Null, &ctx()).is_err());
        assert!(schema.parse(&Value::Undefined, &ctx()).is_err());
        assert!(schema.parse(&Value::from(0), &ctx()).is_ok());
    }

    #[tokio::test]
    async fn test_async_modifier_delegates() {
        let schema = optional_async(number().shared_async());
        assert_eq!(
            schema.parse_async(&Value::Undefined, &ctx()).await,
            Ok(Value::Undefined)
        );
        assert!(schema.parse_async(&Value::from("x"), &ctx()).await.is_err());
        assert_eq!(schema.kind(), SchemaKind::Optional);
    }
}
