//! Explicit schema descriptions of record types.
//!
//! `#[derive(Record)]` emits a [`RecordSchema`] for each record: the ordered
//! constructor fields, their [`TypeShape`], default sources and doc comments.
//! The resolver, the definition pipeline and the engine only ever consult
//! these descriptions; no reflection happens at parse time.

use std::fmt;

use crate::ArgValue;

mod arena;

pub use arena::{LeafField, LeafId, NodeId, SchemaArena};

/// Primitive leaf types with a direct string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `bool`; only `true` and `false` are accepted.
    Bool,
    /// `char`.
    Char,
    /// `String`.
    Str,
    /// `PathBuf`.
    Path,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `i128`.
    I128,
    /// `isize`.
    Isize,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `u128`.
    U128,
    /// `usize`.
    Usize,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
}

impl PrimitiveKind {
    /// Rust spelling of the type.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Str => "String",
            Self::Path => "PathBuf",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Value name shown in usage strings.
    #[must_use]
    pub const fn value_hint(self) -> &'static str {
        match self {
            Self::Bool => "{true,false}",
            Self::Char => "CHAR",
            Self::Str => "STR",
            Self::Path => "PATH",
            Self::F32 | Self::F64 => "FLOAT",
            Self::I8
            | Self::I16
            | Self::I32
            | Self::I64
            | Self::I128
            | Self::Isize
            | Self::U8
            | Self::U16
            | Self::U32
            | Self::U64
            | Self::U128
            | Self::Usize => "INT",
        }
    }
}

/// Transparent annotation layers that never affect resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    /// A `#[schemargs(label = "...")]` annotation.
    Labeled(&'static str),
    /// The [`crate::Final`] immutability marker.
    Final,
    /// `Box<T>`.
    Boxed,
}

/// Homogeneous variable-length container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// `Vec<T>`: ordered, duplicates kept.
    Vec,
    /// `VecDeque<T>`: ordered, duplicates kept.
    VecDeque,
    /// `BTreeSet<T>`: sorted, duplicates dropped.
    BTreeSet,
    /// `HashSet<T>`: unordered, duplicates dropped.
    HashSet,
}

impl ContainerKind {
    const fn type_name(self) -> &'static str {
        match self {
            Self::Vec => "Vec",
            Self::VecDeque => "VecDeque",
            Self::BTreeSet => "BTreeSet",
            Self::HashSet => "HashSet",
        }
    }
}

/// Reference to a nested record type.
///
/// The schema is produced lazily so self-referential records can be
/// described, and then rejected, without unbounded recursion.
#[derive(Clone, Copy)]
pub struct RecordRef {
    /// Fully-qualified type name; the record's identity for cycle detection.
    pub id: &'static str,
    /// Produces the record's schema.
    pub schema: fn() -> RecordSchema,
}

impl RecordRef {
    /// Reference to the record type `R`.
    #[must_use]
    pub fn of<R: crate::Record>() -> Self {
        Self {
            id: std::any::type_name::<R>(),
            schema: R::schema,
        }
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.id).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Description of a field's type annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// A primitive with a direct string conversion.
    Primitive(PrimitiveKind),
    /// `Option<T>`.
    Optional(Box<TypeShape>),
    /// A closed set of constant values of the underlying type `of`.
    Literal {
        /// Allowed values, in declaration order.
        values: Vec<ArgValue>,
        /// Shape of the constants.
        of: Box<TypeShape>,
    },
    /// An enumerated type; values are addressed by member name.
    Enum {
        /// Type name.
        name: &'static str,
        /// Member names, in declaration order.
        members: Vec<&'static str>,
    },
    /// A fixed-size heterogeneous tuple.
    Tuple(Vec<TypeShape>),
    /// A homogeneous variable-length container.
    Sequence {
        /// Container flavour.
        kind: ContainerKind,
        /// Element shape.
        element: Box<TypeShape>,
    },
    /// A nested record.
    Record(RecordRef),
    /// A transparent wrapper around `inner`.
    Wrapped {
        /// Wrapper flavour.
        wrapper: WrapperKind,
        /// Wrapped shape.
        inner: Box<TypeShape>,
    },
    /// A type parameter of the owning record, bound through
    /// [`RecordSchema::substitutions`].
    Generic(&'static str),
    /// A field excluded from the command line.
    Excluded,
    /// A type with no command-line representation.
    Unsupported(&'static str),
}

impl TypeShape {
    /// Restricts the innermost value type of `base` to `values`.
    ///
    /// Optional and transparent layers are preserved, so a literal set
    /// declared on an `Option<u8>` field stays optional.
    #[must_use]
    pub fn with_literal(base: Self, values: Vec<ArgValue>) -> Self {
        match base {
            Self::Optional(inner) => Self::Optional(Box::new(Self::with_literal(*inner, values))),
            Self::Wrapped { wrapper, inner } => Self::Wrapped {
                wrapper,
                inner: Box::new(Self::with_literal(*inner, values)),
            },
            other => Self::Literal {
                values,
                of: Box::new(other),
            },
        }
    }

    /// Wraps `self` in a label annotation.
    #[must_use]
    pub fn labeled(self, label: &'static str) -> Self {
        Self::Wrapped {
            wrapper: WrapperKind::Labeled(label),
            inner: Box::new(self),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.type_name()),
            Self::Optional(inner) => write!(f, "Option<{inner}>"),
            Self::Literal { values, of } => write!(f, "{of} in {values:?}"),
            Self::Enum { name, .. } => f.write_str(name),
            Self::Tuple(elements) => {
                f.write_str("(")?;
                for (idx, element) in elements.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(")")
            }
            Self::Sequence { kind, element } => write!(f, "{}<{element}>", kind.type_name()),
            Self::Record(record) => f.write_str(record.id),
            Self::Wrapped { wrapper, inner } => match wrapper {
                WrapperKind::Labeled(label) => write!(f, "{inner} [{label}]"),
                WrapperKind::Final => write!(f, "Final<{inner}>"),
                WrapperKind::Boxed => write!(f, "Box<{inner}>"),
            },
            Self::Generic(name) => f.write_str(name),
            Self::Excluded => f.write_str("<excluded>"),
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// Where a field's default value comes from.
#[derive(Clone, Copy)]
pub enum DefaultSource {
    /// `#[schemargs(default = expr)]` or `#[schemargs(default)]`.
    Value(fn() -> ArgValue),
    /// `#[schemargs(default_factory = path)]`; called on every parse.
    Factory(fn() -> ArgValue),
}

impl DefaultSource {
    /// Evaluates the default.
    #[must_use]
    pub fn produce(&self) -> ArgValue {
        match self {
            Self::Value(value) => value(),
            Self::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for DefaultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("DefaultSource::Value"),
            Self::Factory(_) => f.write_str("DefaultSource::Factory"),
        }
    }
}

/// One constructor field of a record.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field identifier.
    pub name: &'static str,
    /// Declared type.
    pub shape: TypeShape,
    /// Default, if any.
    pub default: Option<DefaultSource>,
    /// Doc comment text.
    pub doc: Option<&'static str>,
}

impl FieldDescriptor {
    /// Field without a default or docs.
    #[must_use]
    pub const fn new(name: &'static str, shape: TypeShape) -> Self {
        Self {
            name,
            shape,
            default: None,
            doc: None,
        }
    }

    /// Attaches a default.
    #[must_use]
    pub fn with_default(mut self, default: DefaultSource) -> Self {
        self.default = Some(default);
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }
}

/// Ordered description of a record type's constructor fields.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Type name used in diagnostics.
    pub name: &'static str,
    /// Fully-qualified type name used as the record's identity.
    pub id: &'static str,
    /// Doc comment on the record, used as the command description.
    pub doc: Option<&'static str>,
    /// Constructor fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Type parameter bindings for [`TypeShape::Generic`] fields.
    pub substitutions: Vec<(&'static str, TypeShape)>,
}

impl RecordSchema {
    /// Empty schema for a record named `name` with identity `id`.
    #[must_use]
    pub const fn new(name: &'static str, id: &'static str) -> Self {
        Self {
            name,
            id,
            doc: None,
            fields: Vec::new(),
            substitutions: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Documentation lookup for `field`.
    #[must_use]
    pub fn field_doc(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|candidate| candidate.name == field)
            .and_then(|candidate| candidate.doc)
    }

    /// Shape bound to the type parameter `param`.
    #[must_use]
    pub fn substitution(&self, param: &str) -> Option<&TypeShape> {
        self.substitutions
            .iter()
            .find(|(name, _)| *name == param)
            .map(|(_, shape)| shape)
    }
}

#[cfg(test)]
mod tests;
