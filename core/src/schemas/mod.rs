//! Concrete schema kinds.
//!
//! Leaves ([`primitive`], [`special`]) check a native representation and run
//! their pipe. Modifiers ([`wrapped`]) intercept `undefined`/`null` around
//! one schema. Composites ([`array`], [`tuple`], [`set`], [`intersect`],
//! [`object`]) recurse into children and annotate child issues with a path
//! segment.

pub mod array;
pub mod intersect;
pub mod object;
pub mod primitive;
pub mod set;
pub mod special;
pub mod tuple;
pub mod wrapped;

pub use array::{ArraySchema, ArraySchemaAsync, array, array_async};
pub use intersect::{
    IntersectSchema, IntersectSchemaAsync, intersect, intersect_async, merge_outputs,
};
pub use object::{
    Entries, EntriesAsync, ObjectOptions, ObjectOptionsAsync, ObjectSchema, ObjectSchemaAsync,
    object, object_async,
};
pub use primitive::{
    INVALID_TYPE, Primitive, PrimitiveSchema, PrimitiveSchemaAsync, any, any_async, bigint,
    bigint_async, boolean, boolean_async, date, date_async, nan, nan_async, never, never_async,
    null, null_async, number, number_async, string, string_async, undefined, undefined_async,
    unknown, unknown_async,
};
pub use set::{SetSchema, SetSchemaAsync, set, set_async};
pub use special::{SpecialSchema, SpecialSchemaAsync, special, special_async};
pub use tuple::{TupleSchema, TupleSchemaAsync, tuple, tuple_async};
pub use wrapped::{
    Modifier, WrappedSchema, WrappedSchemaAsync, non_nullable, non_nullable_async, non_nullish,
    non_nullish_async, non_optional, non_optional_async, nullable, nullable_async, nullish,
    nullish_async, optional, optional_async,
};
