//! Primitive [`ArgType`] implementations.

use std::path::PathBuf;

use super::ArgType;
use crate::schema::{PrimitiveKind, TypeShape};
use crate::value::{ArgValue, ValueError};

impl ArgType for bool {
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::Bool)
    }

    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Bool(*self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::Bool(flag) => Ok(flag),
            other => Err(ValueError::mismatch("bool", &other)),
        }
    }
}

impl ArgType for char {
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::Char)
    }

    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Char(*self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::Char(ch) => Ok(ch),
            other => Err(ValueError::mismatch("char", &other)),
        }
    }
}

impl ArgType for String {
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::Str)
    }

    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Str(self.clone())
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::Str(text) => Ok(text),
            other => Err(ValueError::mismatch("String", &other)),
        }
    }
}

impl ArgType for PathBuf {
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::Path)
    }

    fn to_arg_value(&self) -> ArgValue {
        ArgValue::Path(self.clone())
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::Path(path) => Ok(path),
            ArgValue::Str(text) => Ok(Self::from(text)),
            other => Err(ValueError::mismatch("PathBuf", &other)),
        }
    }
}

/// Narrows a widened integer into the target type.
fn narrow<T, W>(wide: W, target: &'static str) -> Result<T, ValueError>
where
    T: TryFrom<W>,
    W: Copy + ToString,
{
    T::try_from(wide).map_err(|_| ValueError::OutOfRange {
        value: wide.to_string(),
        target,
    })
}

macro_rules! integer_impls {
    ($($ty:ty => $kind:ident, $variant:ident($wide:ty);)+) => {$(
        impl ArgType for $ty {
            fn shape() -> TypeShape {
                TypeShape::Primitive(PrimitiveKind::$kind)
            }

            fn to_arg_value(&self) -> ArgValue {
                widen!($variant, $wide, *self)
            }

            fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
                match value {
                    ArgValue::Int(wide) => narrow(wide, stringify!($ty)),
                    ArgValue::UInt(wide) => narrow(wide, stringify!($ty)),
                    other => Err(ValueError::mismatch(stringify!($ty), &other)),
                }
            }
        }
    )+};
}

// `isize` and `usize` have no `From` conversion into the 128-bit types.
macro_rules! widen {
    (Int, $wide:ty, $value:expr) => {
        ArgValue::Int(<$wide>::try_from($value).unwrap_or(<$wide>::MAX))
    };
    (UInt, $wide:ty, $value:expr) => {
        ArgValue::UInt(<$wide>::try_from($value).unwrap_or(<$wide>::MAX))
    };
}

integer_impls! {
    i8 => I8, Int(i128);
    i16 => I16, Int(i128);
    i32 => I32, Int(i128);
    i64 => I64, Int(i128);
    i128 => I128, Int(i128);
    isize => Isize, Int(i128);
    u8 => U8, UInt(u128);
    u16 => U16, UInt(u128);
    u32 => U32, UInt(u128);
    u64 => U64, UInt(u128);
    u128 => U128, UInt(u128);
    usize => Usize, UInt(u128);
}

impl ArgType for f32 {
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::F32)
    }

    fn to_arg_value(&self) -> ArgValue {
        ArgValue::F32(*self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::F32(number) => Ok(number),
            other => Err(ValueError::mismatch("f32", &other)),
        }
    }
}

impl ArgType for f64 {
    fn shape() -> TypeShape {
        TypeShape::Primitive(PrimitiveKind::F64)
    }

    fn to_arg_value(&self) -> ArgValue {
        ArgValue::F64(*self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::F64(number) => Ok(number),
            ArgValue::F32(number) => Ok(Self::from(number)),
            other => Err(ValueError::mismatch("f64", &other)),
        }
    }
}
