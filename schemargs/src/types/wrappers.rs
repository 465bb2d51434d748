//! Transparent wrappers: `Box<T>` and the [`Final`] marker.

use std::ops::Deref;

use super::ArgType;
use crate::schema::{TypeShape, WrapperKind};
use crate::value::{ArgValue, ValueError};

impl<T: ArgType> ArgType for Box<T> {
    fn shape() -> TypeShape {
        TypeShape::Wrapped {
            wrapper: WrapperKind::Boxed,
            inner: Box::new(T::shape()),
        }
    }

    fn to_arg_value(&self) -> ArgValue {
        (**self).to_arg_value()
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        T::from_arg_value(value).map(Self::new)
    }
}

/// A field that is set once from the command line and never reassigned.
///
/// `Final<T>` parses exactly like `T`; it only exposes shared access to the
/// wrapped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Final<T>(T);

impl<T> Final<T> {
    /// Wraps `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Final<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Final<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: ArgType> ArgType for Final<T> {
    fn shape() -> TypeShape {
        TypeShape::Wrapped {
            wrapper: WrapperKind::Final,
            inner: Box::new(T::shape()),
        }
    }

    fn to_arg_value(&self) -> ArgValue {
        self.0.to_arg_value()
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        T::from_arg_value(value).map(Self)
    }
}
