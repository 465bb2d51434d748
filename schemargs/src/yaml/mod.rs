//! YAML serialization of record instances.
//!
//! An instance is written as a mapping of its command-line fields, nested
//! records as nested mappings and enums by member name. Reading walks the
//! record's schema, so every node is checked against the declared
//! [`TypeShape`] before the typed value is rebuilt through
//! [`ArgType::from_arg_value`]. Contained record and enum names must be
//! unique in both directions: they are the only type information the
//! document carries.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::ser::{Serialize, Serializer};
use serde_json::Value;
use serde_saphyr::Options;
use thiserror::Error;
use tracing::debug;

use crate::resolve::{Substitutions, convert_primitive, unwrap_transparent};
use crate::schema::{DefaultSource, PrimitiveKind, RecordRef, RecordSchema, TypeShape};
use crate::{ArgValue, Record, ValueError};

const HEADER: &str = "# YAML generated via schemargs.\n";

/// Errors raised while writing or reading YAML.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YamlError {
    /// The document is not valid YAML.
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_saphyr::Error),
    /// The emitter rejected the value tree.
    #[error("failed to emit YAML: {0}")]
    Emit(String),
    /// A node does not match the declared type of its field.
    #[error("at '{path}': expected {expected}, found {found}")]
    Shape {
        /// Dotted path of the offending node.
        path: String,
        /// Declared type.
        expected: String,
        /// What the document holds instead.
        found: String,
    },
    /// A mapping names a field the record does not have.
    #[error("record {record} has no field '{field}'")]
    UnknownField {
        /// Record being read.
        record: &'static str,
        /// Unexpected key.
        field: String,
    },
    /// A required field is neither present nor defaulted.
    #[error("record {record} is missing field '{field}'")]
    MissingField {
        /// Record being read.
        record: &'static str,
        /// Field with no value.
        field: &'static str,
    },
    /// Two distinct contained types share a name.
    #[error("contained type names must be unique, but '{name}' names more than one type")]
    DuplicateTypeName {
        /// The ambiguous name.
        name: &'static str,
    },
    /// The value tree does not rebuild the target type.
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            // Wide integers go out as strings; YAML readers lose precision past 64 bits.
            Self::Int(number) => match i64::try_from(*number) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.collect_str(number),
            },
            Self::UInt(number) => match u64::try_from(*number) {
                Ok(small) => serializer.serialize_u64(small),
                Err(_) => serializer.collect_str(number),
            },
            Self::F32(number) => serializer.serialize_f32(*number),
            Self::F64(number) => serializer.serialize_f64(*number),
            Self::Char(ch) => serializer.serialize_char(*ch),
            Self::Str(text) | Self::Member(text) => serializer.serialize_str(text),
            Self::Path(path) => serializer.collect_str(&path.display()),
            Self::Seq(items) => serializer.collect_seq(items),
            Self::Record(fields) => serializer.collect_map(fields),
        }
    }
}

/// Serializes `instance` to a YAML document.
///
/// # Errors
///
/// Returns [`YamlError::DuplicateTypeName`] when two contained record or
/// enum types share a name, and [`YamlError::Emit`] when the emitter fails.
pub fn to_yaml<T: Record>(instance: &T) -> Result<String, YamlError> {
    ensure_unique_names(RecordRef::of::<T>())?;
    let body = serde_saphyr::to_string(&instance.to_arg_value())
        .map_err(|err| YamlError::Emit(err.to_string()))?;
    Ok(format!("{HEADER}{body}"))
}

/// Rebuilds a `T` from a YAML document produced by [`to_yaml`].
///
/// Missing fields fall back to their declared default; missing optional
/// fields without one read as `None`.
///
/// # Errors
///
/// Returns [`YamlError::Parse`] for malformed YAML, a shape or field error
/// when the document does not describe a `T`, and
/// [`YamlError::DuplicateTypeName`] as for [`to_yaml`].
pub fn from_yaml<T: Record>(text: &str) -> Result<T, YamlError> {
    let root = RecordRef::of::<T>();
    ensure_unique_names(root)?;
    let node: Value = serde_saphyr::from_str_with_options(
        text,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )?;
    let schema = (root.schema)();
    debug!(record = schema.name, "reading record from YAML");
    let value = record_value(&schema, node, "")?;
    Ok(T::from_arg_value(value)?)
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_owned()
    } else {
        format!("{path}.{segment}")
    }
}

fn describe(node: &Value) -> String {
    match node {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("'{text}'"),
        Value::Array(_) => "a sequence".to_owned(),
        Value::Object(_) => "a mapping".to_owned(),
    }
}

fn mismatch(path: &str, expected: &TypeShape, node: &Value) -> YamlError {
    YamlError::Shape {
        path: path.to_owned(),
        expected: expected.to_string(),
        found: describe(node),
    }
}

fn record_value(schema: &RecordSchema, node: Value, path: &str) -> Result<ArgValue, YamlError> {
    let mut entries = match node {
        Value::Object(entries) => entries,
        other => {
            return Err(YamlError::Shape {
                path: path.to_owned(),
                expected: schema.name.to_owned(),
                found: describe(&other),
            });
        }
    };
    let mut fields = BTreeMap::new();
    for field in &schema.fields {
        if matches!(field.shape, TypeShape::Excluded) {
            continue;
        }
        let value = match entries.remove(field.name) {
            Some(node) => convert(
                &field.shape,
                node,
                &schema.substitutions,
                &join(path, field.name),
            )?,
            None => absent_field(schema, field.name, &field.shape, field.default.as_ref())?,
        };
        fields.insert(field.name.to_owned(), value);
    }
    if let Some(field) = entries.keys().next() {
        return Err(YamlError::UnknownField {
            record: schema.name,
            field: field.clone(),
        });
    }
    Ok(ArgValue::Record(fields))
}

fn absent_field(
    schema: &RecordSchema,
    field: &'static str,
    shape: &TypeShape,
    default: Option<&DefaultSource>,
) -> Result<ArgValue, YamlError> {
    if let Some(default) = default {
        return Ok(default.produce());
    }
    match unwrap_transparent(shape, &schema.substitutions) {
        Ok(TypeShape::Optional(_)) => Ok(ArgValue::Absent),
        _ => Err(YamlError::MissingField {
            record: schema.name,
            field,
        }),
    }
}

fn convert(
    shape: &TypeShape,
    node: Value,
    substitutions: Substitutions<'_>,
    path: &str,
) -> Result<ArgValue, YamlError> {
    let inner = unwrap_transparent(shape, substitutions).map_err(|err| YamlError::Shape {
        path: path.to_owned(),
        expected: shape.to_string(),
        found: err.to_string(),
    })?;
    match (inner, node) {
        (TypeShape::Optional(_), Value::Null) => Ok(ArgValue::Absent),
        (TypeShape::Optional(wrapped), node) => convert(wrapped, node, substitutions, path),
        (TypeShape::Primitive(kind), node) => primitive(*kind, node, path),
        (TypeShape::Literal { values, of }, node) => {
            let value = convert(of, node, substitutions, path)?;
            if values.contains(&value) {
                Ok(value)
            } else {
                Err(YamlError::Shape {
                    path: path.to_owned(),
                    expected: inner.to_string(),
                    found: format!("{value:?}"),
                })
            }
        }
        (TypeShape::Enum { members, .. }, Value::String(member))
            if members.iter().any(|candidate| *candidate == member) =>
        {
            Ok(ArgValue::Member(member))
        }
        (TypeShape::Tuple(elements), Value::Array(items)) if items.len() == elements.len() => {
            elements
                .iter()
                .zip(items)
                .enumerate()
                .map(|(idx, (element, item))| {
                    convert(element, item, substitutions, &join(path, &idx.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ArgValue::Seq)
        }
        (TypeShape::Sequence { element, .. }, Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| convert(element, item, substitutions, &join(path, &idx.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(ArgValue::Seq),
        (TypeShape::Record(record), node) => record_value(&(record.schema)(), node, path),
        (other, node) => Err(mismatch(path, other, &node)),
    }
}

fn primitive(kind: PrimitiveKind, node: Value, path: &str) -> Result<ArgValue, YamlError> {
    let text = match (kind, node) {
        (PrimitiveKind::Bool, Value::Bool(flag)) => return Ok(ArgValue::Bool(flag)),
        (PrimitiveKind::Bool, other) => {
            return Err(mismatch(path, &TypeShape::Primitive(kind), &other));
        }
        (_, Value::String(text)) => text,
        (_, Value::Number(number)) => number.to_string(),
        (_, other) => return Err(mismatch(path, &TypeShape::Primitive(kind), &other)),
    };
    convert_primitive(kind, &text).map_err(|err| YamlError::Shape {
        path: path.to_owned(),
        expected: kind.type_name().to_owned(),
        found: err.to_string(),
    })
}

fn ensure_unique_names(root: RecordRef) -> Result<(), YamlError> {
    let mut claimed = HashMap::new();
    let mut visited = HashSet::new();
    collect_names(&TypeShape::Record(root), &mut claimed, &mut visited)
}

fn claim(
    claimed: &mut HashMap<&'static str, String>,
    name: &'static str,
    identity: &str,
) -> Result<(), YamlError> {
    let owner = claimed.entry(name).or_insert_with(|| identity.to_owned());
    if owner.as_str() == identity {
        Ok(())
    } else {
        Err(YamlError::DuplicateTypeName { name })
    }
}

fn collect_names(
    shape: &TypeShape,
    claimed: &mut HashMap<&'static str, String>,
    visited: &mut HashSet<&'static str>,
) -> Result<(), YamlError> {
    match shape {
        TypeShape::Record(record) => {
            let schema = (record.schema)();
            claim(claimed, schema.name, record.id)?;
            if !visited.insert(record.id) {
                return Ok(());
            }
            for field in &schema.fields {
                collect_names(&field.shape, claimed, visited)?;
            }
            for (_, bound) in &schema.substitutions {
                collect_names(bound, claimed, visited)?;
            }
            Ok(())
        }
        // Enums carry no identity beyond their name and members.
        TypeShape::Enum { name, members } => claim(claimed, *name, &members.join("|")),
        TypeShape::Optional(inner)
        | TypeShape::Literal { of: inner, .. }
        | TypeShape::Sequence { element: inner, .. }
        | TypeShape::Wrapped { inner, .. } => collect_names(inner, claimed, visited),
        TypeShape::Tuple(elements) => elements
            .iter()
            .try_for_each(|element| collect_names(element, claimed, visited)),
        TypeShape::Primitive(_)
        | TypeShape::Generic(_)
        | TypeShape::Excluded
        | TypeShape::Unsupported(_) => Ok(()),
    }
}
