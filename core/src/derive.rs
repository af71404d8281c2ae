//! Object-schema derivation.
//!
//! Each utility reads the entries of existing object schemas and builds a
//! new object schema up front. Nothing here runs during parsing: the
//! derived schema parses exactly like one written out by hand. Rest schema,
//! message and pipe of the result come from the [`ObjectOptions`] argument,
//! never from the sources.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shapeguard_core::*;
//!
//! let user = object([
//!     ("id", number().shared()),
//!     ("name", string().shared()),
//!     ("email", string().shared()),
//! ]);
//!
//! let patch = partial(&omit(&user, &["id"], ObjectOptions::new())?, ObjectOptions::new());
//! let ctx = ParseContext::default();
//! assert!(patch.parse(&json!({ "name": "Ada" }).into(), &ctx).is_ok());
//! assert!(patch.parse(&json!({ "name": 1 }).into(), &ctx).is_err());
//! # Ok::<(), SchemaError>(())
//! ```

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::{
    BoxFuture, Map, ObjectOptions, ObjectOptionsAsync, ObjectSchema, ObjectSchemaAsync,
    ParseContext, ParseResult, Schema, SchemaAsync, SchemaKind, SchemaNode, Value, non_optional,
    non_optional_async, optional, optional_async,
};

const MIN_SCHEMAS: usize = 2;

/// Folds entry maps left to right; later entries replace earlier ones but
/// keep the position of the first occurrence.
fn merge_entries<'a, S: Clone + 'a>(
    sources: impl ExactSizeIterator<Item = &'a IndexMap<String, S>>,
) -> Result<IndexMap<String, S>> {
    let found = sources.len();
    if found < MIN_SCHEMAS {
        return Err(SchemaError::TooFewSchemas {
            expected: MIN_SCHEMAS,
            found,
        });
    }
    let mut merged = IndexMap::new();
    for entries in sources {
        for (key, schema) in entries {
            merged.insert(key.clone(), schema.clone());
        }
    }
    debug!(schemas = found, keys = merged.len(), "merged object entries");
    Ok(merged)
}

/// Keeps (or drops, with `keep == false`) the listed keys, in source order.
fn select_entries<S: Clone>(
    entries: &IndexMap<String, S>,
    keys: &[&str],
    keep: bool,
) -> Result<IndexMap<String, S>> {
    if let Some(unknown) = keys.iter().find(|key| !entries.contains_key(**key)) {
        return Err(SchemaError::UnknownKey((*unknown).to_string()));
    }
    Ok(entries
        .iter()
        .filter(|(key, _)| keys.contains(&key.as_str()) == keep)
        .map(|(key, schema)| (key.clone(), schema.clone()))
        .collect())
}

/// Combines the entries of two or more object schemas.
///
/// ```
/// use serde_json::json;
/// use shapeguard_core::*;
///
/// let a = object([("x", number().shared())]);
/// let b = object([("x", string().shared())]);
/// let merged = merge(&[a, b], ObjectOptions::new())?;
///
/// let ctx = ParseContext::default();
/// assert!(merged.parse(&json!({ "x": "5" }).into(), &ctx).is_ok());
/// assert!(merged.parse(&json!({ "x": 5 }).into(), &ctx).is_err());
/// # Ok::<(), SchemaError>(())
/// ```
pub fn merge(schemas: &[ObjectSchema], options: ObjectOptions) -> Result<ObjectSchema> {
    let entries = merge_entries(schemas.iter().map(ObjectSchema::entries))?;
    Ok(ObjectSchema::with_options(entries, options))
}

pub fn merge_async(
    schemas: &[ObjectSchemaAsync],
    options: ObjectOptionsAsync,
) -> Result<ObjectSchemaAsync> {
    let entries = merge_entries(schemas.iter().map(ObjectSchemaAsync::entries))?;
    Ok(ObjectSchemaAsync::with_options(entries, options))
}

/// Restricts an object schema to `keys`.
///
/// Fails with [`SchemaError::UnknownKey`] if a key is not an entry of
/// `schema`.
pub fn pick(schema: &ObjectSchema, keys: &[&str], options: ObjectOptions) -> Result<ObjectSchema> {
    let entries = select_entries(schema.entries(), keys, true)?;
    Ok(ObjectSchema::with_options(entries, options))
}

pub fn pick_async(
    schema: &ObjectSchemaAsync,
    keys: &[&str],
    options: ObjectOptionsAsync,
) -> Result<ObjectSchemaAsync> {
    let entries = select_entries(schema.entries(), keys, true)?;
    Ok(ObjectSchemaAsync::with_options(entries, options))
}

/// Removes `keys` from an object schema.
///
/// Fails with [`SchemaError::UnknownKey`] if a key is not an entry of
/// `schema`.
pub fn omit(schema: &ObjectSchema, keys: &[&str], options: ObjectOptions) -> Result<ObjectSchema> {
    let entries = select_entries(schema.entries(), keys, false)?;
    Ok(ObjectSchema::with_options(entries, options))
}

pub fn omit_async(
    schema: &ObjectSchemaAsync,
    keys: &[&str],
    options: ObjectOptionsAsync,
) -> Result<ObjectSchemaAsync> {
    let entries = select_entries(schema.entries(), keys, false)?;
    Ok(ObjectSchemaAsync::with_options(entries, options))
}

/// Wraps every entry in [`optional`], so absent keys are accepted.
pub fn partial(schema: &ObjectSchema, options: ObjectOptions) -> ObjectSchema {
    let entries = schema
        .entries()
        .iter()
        .map(|(key, entry)| (key.clone(), optional(entry.clone()).shared()))
        .collect();
    ObjectSchema::with_options(entries, options)
}

pub fn partial_async(schema: &ObjectSchemaAsync, options: ObjectOptionsAsync) -> ObjectSchemaAsync {
    let entries = schema
        .entries()
        .iter()
        .map(|(key, entry)| (key.clone(), optional_async(entry.clone()).shared_async()))
        .collect();
    ObjectSchemaAsync::with_options(entries, options)
}

/// Wraps every entry in [`non_optional`], so absent keys are rejected even
/// when the entry itself was optional.
///
/// ```
/// use serde_json::json;
/// use shapeguard_core::*;
///
/// let s = object([("a", number().shared())]);
/// let loose = partial(&s, ObjectOptions::new());
/// let strict = required(&loose, ObjectOptions::new());
///
/// let ctx = ParseContext::default();
/// assert!(loose.parse(&json!({}).into(), &ctx).is_ok());
/// let issues = strict.parse(&json!({}).into(), &ctx).unwrap_err();
/// assert_eq!(issues.first().path[0].key, PathKey::Key("a".into()));
/// ```
pub fn required(schema: &ObjectSchema, options: ObjectOptions) -> ObjectSchema {
    let entries = schema
        .entries()
        .iter()
        .map(|(key, entry)| (key.clone(), non_optional(entry.clone()).shared()))
        .collect();
    ObjectSchema::with_options(entries, options)
}

pub fn required_async(schema: &ObjectSchemaAsync, options: ObjectOptionsAsync) -> ObjectSchemaAsync {
    let entries = schema
        .entries()
        .iter()
        .map(|(key, entry)| (key.clone(), non_optional_async(entry.clone()).shared_async()))
        .collect();
    ObjectSchemaAsync::with_options(entries, options)
}

/// Copies the raw input's keys under a successful output.
fn pass_through(input: &Value, result: ParseResult) -> ParseResult {
    match (input, result?) {
        (Value::Object(fields), Value::Object(parsed)) => {
            let mut output: Map = fields.clone();
            for (key, value) in parsed {
                output.insert(key, value);
            }
            Ok(Value::Object(output))
        }
        (_, parsed) => Ok(parsed),
    }
}

/// Object schema that keeps undeclared input keys in its output.
///
/// Created by [`passthrough`]. Extra keys are copied unvalidated.
#[derive(Debug, Clone)]
pub struct PassthroughSchema {
    inner: ObjectSchema,
}

impl PassthroughSchema {
    pub fn inner(&self) -> &ObjectSchema {
        &self.inner
    }
}

/// Keeps keys the schema does not declare instead of stripping them.
///
/// ```
/// # #![allow(deprecated)]
/// use serde_json::json;
/// use shapeguard_core::*;
///
/// let schema = passthrough(object([("a", number().shared())]));
/// let out = schema
///     .parse(&json!({ "a": 1, "b": "kept" }).into(), &ParseContext::default())
///     .unwrap();
/// assert_eq!(out.to_json(), json!({ "a": 1, "b": "kept" }));
/// ```
#[deprecated(note = "declare a rest schema with `any()` instead")]
pub fn passthrough(schema: ObjectSchema) -> PassthroughSchema {
    PassthroughSchema { inner: schema }
}

impl SchemaNode for PassthroughSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }
}

impl Schema for PassthroughSchema {
    fn parse(&self, input: &Value, ctx: &ParseContext) -> ParseResult {
        pass_through(input, self.inner.parse(input, ctx))
    }
}

/// Async twin of [`PassthroughSchema`].
#[derive(Debug, Clone)]
pub struct PassthroughSchemaAsync {
    inner: ObjectSchemaAsync,
}

impl PassthroughSchemaAsync {
    pub fn inner(&self) -> &ObjectSchemaAsync {
        &self.inner
    }
}

#[deprecated(note = "declare a rest schema with `any_async()` instead")]
pub fn passthrough_async(schema: ObjectSchemaAsync) -> PassthroughSchemaAsync {
    PassthroughSchemaAsync { inner: schema }
}

impl SchemaNode for PassthroughSchemaAsync {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn is_async(&self) -> bool {
        true
    }
}

impl SchemaAsync for PassthroughSchemaAsync {
    fn parse_async<'a>(
        &'a self,
        input: &'a Value,
        ctx: &'a ParseContext,
    ) -> BoxFuture<'a, ParseResult> {
        Box::pin(async move { pass_through(input, self.inner.parse_async(input, ctx).await) })
    }
}
