//! Composable schema engine for validating unknown input.
//!
//! A schema describes one data shape. Parsing a [`Value`] against it yields
//! either the typed output or a non-empty list of [`Issues`], each carrying
//! the path from the outermost container down to the failing value.
//!
//! - [`Schema`] / [`SchemaAsync`]: the node contract every kind implements.
//!   Every synchronous schema is also usable as an async one.
//! - [`Pipe`] / [`PipeAsync`]: ordered validation and transform steps run
//!   after a schema's own type check.
//! - Leaves ([`string`], [`number`], [`special`], ...) and modifiers
//!   ([`optional`], [`non_nullable`], ...).
//! - Composites: [`array`], [`tuple`], [`set`], [`intersect`], [`object`].
//! - Object derivation: [`merge`], [`pick`], [`omit`], [`partial`],
//!   [`required`].
//! - Entry points: [`parse`], [`safe_parse`], [`is_valid`] and their
//!   `_async` counterparts.
//!
//! [`ParseContext`] carries the per-call policy (`abort_early`,
//! `abort_pipe_early`, `skip_pipe`).
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use shapeguard_core::*;
//!
//! let non_empty = Validation::new("non_empty", "Must not be empty", |v| {
//!     v.as_str().is_some_and(|s| !s.is_empty())
//! });
//!
//! let order = object([
//!     ("id", string().with_pipe(Pipe::new().step(non_empty)).shared()),
//!     ("items", array(object([("qty", number().shared())]).shared()).shared()),
//!     ("note", optional(string().shared()).shared()),
//! ]);
//!
//! let input = json!({ "id": "", "items": [{ "qty": 1 }, { "qty": "2" }] }).into();
//! let issues = safe_parse(&order, &input, None).unwrap_err();
//!
//! let paths: Vec<_> = issues.iter().filter_map(|i| i.dotted_path()).collect();
//! assert_eq!(paths, vec!["id", "items.1.qty"]);
//! ```

mod context;
mod derive;
mod error;
mod issue;
mod parse;
mod pipe;
mod schema;
pub mod schemas;
mod value;

pub use context::ParseContext;
#[allow(deprecated)]
pub use derive::{
    PassthroughSchema, PassthroughSchemaAsync, merge, merge_async, omit, omit_async, partial,
    partial_async, passthrough, passthrough_async, pick, pick_async, required, required_async,
};
pub use error::{SchemaError, ValidationError};
pub use issue::{
    ContainerKind, FlatErrors, Issue, IssueCategory, IssueOrigin, IssueReason, Issues, PathItem,
    PathKey,
};
pub use parse::{is_valid, is_valid_async, parse, parse_async, safe_parse, safe_parse_async};
pub use pipe::{Action, ActionAsync, Pipe, PipeAsync, PipeIssue, PipeResult, Validation};
pub use schema::{
    BoxFuture, ParseResult, Schema, SchemaAsync, SchemaAsyncRef, SchemaKind, SchemaNode,
    SchemaRef, into_async,
};
pub use schemas::*;
pub use value::{Map, Value, ValueSet};
