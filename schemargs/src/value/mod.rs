//! Untyped values exchanged between instantiators and record constructors.
//!
//! Instantiators turn raw command-line tokens into [`ArgValue`] trees and the
//! [`crate::ArgType`] implementations turn those trees back into typed Rust
//! values. Keeping the intermediate representation explicit lets the engine
//! gather nested record values by destination key before any typed value is
//! materialised.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

/// A value produced by an instantiator or captured from a default.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// No value was supplied; reconstructs as `None`.
    Absent,
    /// A boolean.
    Bool(bool),
    /// Any signed integer, widened.
    Int(i128),
    /// Any unsigned integer, widened.
    UInt(u128),
    /// A single-precision float.
    F32(f32),
    /// A double-precision float.
    F64(f64),
    /// A single character.
    Char(char),
    /// A UTF-8 string.
    Str(String),
    /// A filesystem path.
    Path(PathBuf),
    /// The name of an enumerated type's member.
    Member(String),
    /// The elements of a tuple or homogeneous container, in order.
    Seq(Vec<ArgValue>),
    /// The constructor arguments of a record, keyed by field name.
    Record(BTreeMap<String, ArgValue>),
}

impl ArgValue {
    /// Short description of the variant for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::UInt(_) => "unsigned integer",
            Self::F32(_) | Self::F64(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Path(_) => "path",
            Self::Member(_) => "enum member",
            Self::Seq(_) => "sequence",
            Self::Record(_) => "record",
        }
    }

    /// Unwraps a [`ArgValue::Record`] into its fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Mismatch`] when the value is not a record.
    pub fn into_record(self, record: &'static str) -> Result<RecordFields, ValueError> {
        match self {
            Self::Record(fields) => Ok(RecordFields { record, fields }),
            other => Err(ValueError::mismatch(record, &other)),
        }
    }

    /// Unwraps a [`ArgValue::Seq`] into its elements.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Mismatch`] when the value is not a sequence.
    pub fn into_seq(self, expected: &'static str) -> Result<Vec<Self>, ValueError> {
        match self {
            Self::Seq(items) => Ok(items),
            other => Err(ValueError::mismatch(expected, &other)),
        }
    }
}

/// Field values of a record awaiting construction.
///
/// Generated `from_arg_value` implementations take each constructor field out
/// of this map by name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    record: &'static str,
    fields: BTreeMap<String, ArgValue>,
}

impl RecordFields {
    /// Removes `field` and converts it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MissingField`] when the field was never gathered,
    /// or any conversion error reported by `T`.
    pub fn take<T: crate::ArgType>(&mut self, field: &'static str) -> Result<T, ValueError> {
        let value = self
            .fields
            .remove(field)
            .ok_or(ValueError::MissingField {
                record: self.record,
                field,
            })?;
        T::from_arg_value(value)
    }
}

/// Failure converting an [`ArgValue`] into a typed value.
///
/// These indicate a mismatch between a schema description and the type it
/// describes, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The value has the wrong shape for the target type.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        /// Target type or shape.
        expected: &'static str,
        /// Variant actually received.
        found: &'static str,
    },
    /// An integer does not fit the target type.
    #[error("integer {value} is out of range for {target}")]
    OutOfRange {
        /// Rendered integer.
        value: String,
        /// Target integer type.
        target: &'static str,
    },
    /// An enum member name is not part of the target enum.
    #[error("'{member}' is not a member of {target}")]
    UnknownMember {
        /// Member name received.
        member: String,
        /// Target enum.
        target: &'static str,
    },
    /// A tuple received the wrong number of elements.
    #[error("expected {expected} elements, found {found}")]
    Length {
        /// Declared tuple length.
        expected: usize,
        /// Elements received.
        found: usize,
    },
    /// A record field was not gathered before construction.
    #[error("record {record} is missing field '{field}'")]
    MissingField {
        /// Record under construction.
        record: &'static str,
        /// Constructor field that had no value.
        field: &'static str,
    },
}

impl ValueError {
    /// Builds a [`ValueError::Mismatch`] for `found`.
    #[must_use]
    pub const fn mismatch(expected: &'static str, found: &ArgValue) -> Self {
        Self::Mismatch {
            expected,
            found: found.kind(),
        }
    }
}

#[cfg(test)]
mod tests;
