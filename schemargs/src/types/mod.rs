//! Conversions between Rust types and the schema/value model.
//!
//! Every field type that can appear in a record implements [`ArgType`]. The
//! derive macros implement it for records and enums; this module covers
//! primitives, standard containers, tuples and the transparent wrappers.

use crate::schema::{RecordSchema, TypeShape};
use crate::value::{ArgValue, ValueError};

mod containers;
mod primitives;
mod wrappers;

pub use wrappers::Final;

/// A type that can be described to, and rebuilt by, the argument engine.
pub trait ArgType: Sized {
    /// Structural description used by the type resolver.
    fn shape() -> TypeShape;

    /// Captures `self` as an untyped value, used for defaults.
    fn to_arg_value(&self) -> ArgValue;

    /// Rebuilds a typed value from an untyped one.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] when `value` does not describe a `Self`.
    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError>;
}

/// A struct whose named fields become command-line arguments.
///
/// Implemented by `#[derive(Record)]`.
pub trait Record: ArgType {
    /// Ordered description of the constructor fields.
    fn schema() -> RecordSchema;
}
