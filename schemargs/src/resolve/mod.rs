//! Type resolution: from a [`TypeShape`] to an instantiator plus metadata.
//!
//! Resolution applies the following rules in priority order:
//!
//! 1. transparent wrappers are unwrapped;
//! 2. generic parameters are substituted from the owning record;
//! 3. excluded fields never become arguments;
//! 4. `Option<T>` marks the argument optional and resolves `T`;
//! 5. literal sets and 6. enums become closed choice sets;
//! 7. tuples take a fixed number of tokens;
//! 8. homogeneous containers take a variable number of tokens;
//! 9. nested records are flattened by the schema arena;
//! 10. primitives convert with [`str::parse`];
//! 11. anything else is unsupported.

use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::definition::defaults::render_scalar;
use crate::schema::{PrimitiveKind, RecordRef, TypeShape};
use crate::ArgValue;

mod instantiators;

pub use instantiators::{InstantiateError, Instantiator};
use instantiators::Convert;

/// How many raw tokens an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one token.
    Scalar,
    /// Exactly `n` tokens, one per tuple element.
    Fixed(usize),
    /// One or more tokens.
    Variadic,
}

/// Parser-facing facts derived from a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Closed set of accepted tokens.
    pub choices: Option<Vec<String>>,
    /// Token count.
    pub arity: Arity,
    /// Whether an omitted argument reconstructs as `None`.
    pub is_optional: bool,
    /// Value names for usage strings, one per token position.
    pub value_hint: Option<Vec<String>>,
}

/// A resolved leaf argument.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Converts raw tokens into a value.
    pub instantiator: Instantiator,
    /// Parser-facing metadata.
    pub metadata: Metadata,
    /// The shape left after transparent layers were removed.
    pub display_type: TypeShape,
}

/// Structural role of a field in its record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldClass {
    /// Not part of the command line.
    Excluded,
    /// A nested record, flattened into its own arguments.
    Record(RecordRef),
    /// A leaf argument.
    Leaf,
}

/// A type shape with no command-line representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{shape}: {reason}")]
pub struct UnsupportedShape {
    /// Rendered shape.
    pub shape: String,
    /// Why resolution failed.
    pub reason: &'static str,
}

impl UnsupportedShape {
    fn new(shape: &TypeShape, reason: &'static str) -> Self {
        Self {
            shape: shape.to_string(),
            reason,
        }
    }
}

/// Generic parameter bindings of the record that owns a field.
pub type Substitutions<'a> = &'a [(&'static str, TypeShape)];

/// Strips transparent wrappers and substitutes generic parameters.
///
/// # Errors
///
/// Returns [`UnsupportedShape`] for a parameter the record does not bind.
pub fn unwrap_transparent<'a>(
    shape: &'a TypeShape,
    substitutions: Substitutions<'a>,
) -> Result<&'a TypeShape, UnsupportedShape> {
    match shape {
        TypeShape::Wrapped { inner, .. } => unwrap_transparent(inner, substitutions),
        TypeShape::Generic(param) => {
            let bound = substitutions
                .iter()
                .find(|(name, _)| name == param)
                .map(|(_, bound)| bound)
                .ok_or_else(|| UnsupportedShape::new(shape, "unbound type parameter"))?;
            unwrap_transparent(bound, substitutions)
        }
        other => Ok(other),
    }
}

/// Decides whether a field is excluded, a nested record, or a leaf.
///
/// # Errors
///
/// Propagates failures from [`unwrap_transparent`].
pub fn classify(
    shape: &TypeShape,
    substitutions: Substitutions<'_>,
) -> Result<FieldClass, UnsupportedShape> {
    Ok(match unwrap_transparent(shape, substitutions)? {
        TypeShape::Excluded => FieldClass::Excluded,
        TypeShape::Record(record) => FieldClass::Record(*record),
        _ => FieldClass::Leaf,
    })
}

/// Resolves a leaf shape into an instantiator and its metadata.
///
/// # Errors
///
/// Returns [`UnsupportedShape`] when no rule applies.
pub fn resolve(
    shape: &TypeShape,
    substitutions: Substitutions<'_>,
) -> Result<Resolved, UnsupportedShape> {
    let inner = unwrap_transparent(shape, substitutions)?;
    match inner {
        TypeShape::Optional(wrapped) => resolve_optional(wrapped, substitutions),
        TypeShape::Tuple(elements) => resolve_tuple(inner, elements, substitutions),
        TypeShape::Sequence { element, .. } => {
            let leaf = resolve_scalar(element, substitutions)?;
            let convert = Arc::clone(&leaf.convert);
            Ok(Resolved {
                instantiator: Instantiator::new(move |tokens| {
                    tokens
                        .iter()
                        .map(|token| convert(token.as_str()))
                        .collect::<Result<Vec<_>, _>>()
                        .map(ArgValue::Seq)
                }),
                metadata: leaf.metadata(Arity::Variadic),
                display_type: inner.clone(),
            })
        }
        TypeShape::Primitive(_) | TypeShape::Literal { .. } | TypeShape::Enum { .. } => {
            let leaf = resolve_scalar(inner, substitutions)?;
            let convert = Arc::clone(&leaf.convert);
            Ok(Resolved {
                instantiator: Instantiator::new(move |tokens| match tokens {
                    [token] => convert(token.as_str()),
                    _ => Err(InstantiateError::Arity {
                        expected: 1,
                        found: tokens.len(),
                    }),
                }),
                metadata: leaf.metadata(Arity::Scalar),
                display_type: leaf.shape,
            })
        }
        TypeShape::Record(_) => Err(UnsupportedShape::new(
            inner,
            "records are flattened into their own arguments",
        )),
        TypeShape::Excluded => Err(UnsupportedShape::new(
            inner,
            "excluded fields have no argument",
        )),
        TypeShape::Unsupported(_) => Err(UnsupportedShape::new(
            inner,
            "type has no command-line representation",
        )),
        TypeShape::Wrapped { .. } | TypeShape::Generic(_) => Err(UnsupportedShape::new(
            inner,
            "transparent layer survived unwrapping",
        )),
    }
}

fn resolve_optional(
    wrapped: &TypeShape,
    substitutions: Substitutions<'_>,
) -> Result<Resolved, UnsupportedShape> {
    if let FieldClass::Record(_) = classify(wrapped, substitutions)? {
        return Err(UnsupportedShape::new(
            wrapped,
            "optional nested records are not supported",
        ));
    }
    let mut resolved = resolve(wrapped, substitutions)?;
    resolved.metadata.is_optional = true;
    Ok(resolved)
}

fn resolve_tuple(
    shape: &TypeShape,
    elements: &[TypeShape],
    substitutions: Substitutions<'_>,
) -> Result<Resolved, UnsupportedShape> {
    if elements.is_empty() {
        return Err(UnsupportedShape::new(shape, "empty tuples take no tokens"));
    }
    let leaves = elements
        .iter()
        .map(|element| resolve_scalar(element, substitutions))
        .collect::<Result<Vec<_>, _>>()?;

    let shared_choices = leaves
        .first()
        .and_then(|first| first.choices.clone())
        .filter(|first| leaves.iter().all(|leaf| leaf.choices.as_ref() == Some(first)));
    let value_hint = shared_choices.is_none().then(|| {
        leaves
            .iter()
            .map(ScalarLeaf::hint_or_choices)
            .collect::<Vec<_>>()
    });

    let converters: Vec<Convert> = leaves.iter().map(|leaf| Arc::clone(&leaf.convert)).collect();
    let expected = converters.len();
    Ok(Resolved {
        instantiator: Instantiator::new(move |tokens| {
            if tokens.len() != expected {
                return Err(InstantiateError::Arity {
                    expected,
                    found: tokens.len(),
                });
            }
            converters
                .iter()
                .zip(tokens)
                .map(|(convert, token)| convert(token.as_str()))
                .collect::<Result<Vec<_>, _>>()
                .map(ArgValue::Seq)
        }),
        metadata: Metadata {
            choices: shared_choices,
            arity: Arity::Fixed(expected),
            is_optional: false,
            value_hint,
        },
        display_type: shape.clone(),
    })
}

/// A single-token conversion shared by scalars, tuple and container elements.
struct ScalarLeaf {
    convert: Convert,
    choices: Option<Vec<String>>,
    hint: &'static str,
    shape: TypeShape,
}

impl ScalarLeaf {
    fn metadata(&self, arity: Arity) -> Metadata {
        Metadata {
            choices: self.choices.clone(),
            arity,
            is_optional: false,
            value_hint: self
                .choices
                .is_none()
                .then(|| vec![self.hint.to_owned()]),
        }
    }

    fn hint_or_choices(&self) -> String {
        self.choices.as_ref().map_or_else(
            || self.hint.to_owned(),
            |choices| format!("{{{}}}", choices.join(",")),
        )
    }
}

fn resolve_scalar(
    shape: &TypeShape,
    substitutions: Substitutions<'_>,
) -> Result<ScalarLeaf, UnsupportedShape> {
    let inner = unwrap_transparent(shape, substitutions)?;
    match inner {
        TypeShape::Primitive(primitive) => {
            let kind = *primitive;
            Ok(ScalarLeaf {
                convert: Arc::new(move |token: &str| convert_primitive(kind, token)),
                choices: None,
                hint: kind.value_hint(),
                shape: inner.clone(),
            })
        }
        TypeShape::Literal { values, .. } => {
            let choices = values
                .iter()
                .map(render_scalar)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| UnsupportedShape::new(inner, "literal values must be scalars"))?;
            let table: Vec<(String, ArgValue)> =
                choices.iter().cloned().zip(values.iter().cloned()).collect();
            Ok(ScalarLeaf {
                convert: Arc::new(move |token: &str| lookup(&table, token)),
                choices: Some(choices),
                hint: "LITERAL",
                shape: inner.clone(),
            })
        }
        TypeShape::Enum { members, .. } => {
            let choices: Vec<String> = members.iter().map(|member| (*member).to_owned()).collect();
            let table: Vec<(String, ArgValue)> = choices
                .iter()
                .map(|member| (member.clone(), ArgValue::Member(member.clone())))
                .collect();
            Ok(ScalarLeaf {
                convert: Arc::new(move |token: &str| lookup(&table, token)),
                choices: Some(choices),
                hint: "MEMBER",
                shape: inner.clone(),
            })
        }
        other => Err(UnsupportedShape::new(
            other,
            "containers may only hold primitives, literals or enums",
        )),
    }
}

fn lookup(table: &[(String, ArgValue)], token: &str) -> Result<ArgValue, InstantiateError> {
    table
        .iter()
        .find(|(choice, _)| choice == token)
        .map(|(_, value)| value.clone())
        .ok_or_else(|| InstantiateError::InvalidChoice {
            value: token.to_owned(),
            choices: table.iter().map(|(choice, _)| choice.clone()).collect(),
        })
}

fn parse_with<T>(kind: PrimitiveKind, token: &str) -> Result<T, InstantiateError>
where
    T: FromStr,
    T::Err: Display,
{
    token
        .parse::<T>()
        .map_err(|err| conversion_error(kind, token, &err))
}

fn conversion_error(kind: PrimitiveKind, token: &str, reason: &dyn fmt::Display) -> InstantiateError {
    InstantiateError::Conversion {
        value: token.to_owned(),
        expected: kind.type_name(),
        reason: reason.to_string(),
    }
}

fn signed<T>(kind: PrimitiveKind, token: &str) -> Result<ArgValue, InstantiateError>
where
    T: FromStr + TryInto<i128>,
    T::Err: Display,
{
    let parsed: T = parse_with(kind, token)?;
    parsed
        .try_into()
        .map(ArgValue::Int)
        .map_err(|_| conversion_error(kind, token, &"out of range"))
}

fn unsigned<T>(kind: PrimitiveKind, token: &str) -> Result<ArgValue, InstantiateError>
where
    T: FromStr + TryInto<u128>,
    T::Err: Display,
{
    let parsed: T = parse_with(kind, token)?;
    parsed
        .try_into()
        .map(ArgValue::UInt)
        .map_err(|_| conversion_error(kind, token, &"out of range"))
}

/// Converts one token into a primitive value.
///
/// # Errors
///
/// Returns [`InstantiateError::Conversion`] when the token does not parse.
pub fn convert_primitive(kind: PrimitiveKind, token: &str) -> Result<ArgValue, InstantiateError> {
    match kind {
        PrimitiveKind::Bool => parse_with::<bool>(kind, token).map(ArgValue::Bool),
        PrimitiveKind::Char => parse_with::<char>(kind, token).map(ArgValue::Char),
        PrimitiveKind::Str => Ok(ArgValue::Str(token.to_owned())),
        PrimitiveKind::Path => Ok(ArgValue::Path(PathBuf::from(token))),
        PrimitiveKind::I8 => signed::<i8>(kind, token),
        PrimitiveKind::I16 => signed::<i16>(kind, token),
        PrimitiveKind::I32 => signed::<i32>(kind, token),
        PrimitiveKind::I64 => signed::<i64>(kind, token),
        PrimitiveKind::I128 => signed::<i128>(kind, token),
        PrimitiveKind::Isize => signed::<isize>(kind, token),
        PrimitiveKind::U8 => unsigned::<u8>(kind, token),
        PrimitiveKind::U16 => unsigned::<u16>(kind, token),
        PrimitiveKind::U32 => unsigned::<u32>(kind, token),
        PrimitiveKind::U64 => unsigned::<u64>(kind, token),
        PrimitiveKind::U128 => unsigned::<u128>(kind, token),
        PrimitiveKind::Usize => unsigned::<usize>(kind, token),
        PrimitiveKind::F32 => parse_with::<f32>(kind, token).map(ArgValue::F32),
        PrimitiveKind::F64 => parse_with::<f64>(kind, token).map(ArgValue::F64),
    }
}

#[cfg(test)]
mod tests;
