//! [`ArgType`] implementations for `Option`, homogeneous containers and tuples.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

use super::ArgType;
use crate::schema::{ContainerKind, TypeShape};
use crate::value::{ArgValue, ValueError};

impl<T: ArgType> ArgType for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Optional(Box::new(T::shape()))
    }

    fn to_arg_value(&self) -> ArgValue {
        self.as_ref().map_or(ArgValue::Absent, ArgType::to_arg_value)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        match value {
            ArgValue::Absent => Ok(None),
            present => T::from_arg_value(present).map(Some),
        }
    }
}

fn sequence<T: ArgType>(kind: ContainerKind) -> TypeShape {
    TypeShape::Sequence {
        kind,
        element: Box::new(T::shape()),
    }
}

fn elements<'a, T, I>(items: I) -> ArgValue
where
    T: ArgType + 'a,
    I: IntoIterator<Item = &'a T>,
{
    ArgValue::Seq(items.into_iter().map(ArgType::to_arg_value).collect())
}

fn collect<T, C>(value: ArgValue, expected: &'static str) -> Result<C, ValueError>
where
    T: ArgType,
    C: FromIterator<T>,
{
    value
        .into_seq(expected)?
        .into_iter()
        .map(T::from_arg_value)
        .collect()
}

impl<T: ArgType> ArgType for Vec<T> {
    fn shape() -> TypeShape {
        sequence::<T>(ContainerKind::Vec)
    }

    fn to_arg_value(&self) -> ArgValue {
        elements(self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        collect(value, "Vec")
    }
}

impl<T: ArgType> ArgType for VecDeque<T> {
    fn shape() -> TypeShape {
        sequence::<T>(ContainerKind::VecDeque)
    }

    fn to_arg_value(&self) -> ArgValue {
        elements(self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        collect(value, "VecDeque")
    }
}

impl<T: ArgType + Ord> ArgType for BTreeSet<T> {
    fn shape() -> TypeShape {
        sequence::<T>(ContainerKind::BTreeSet)
    }

    fn to_arg_value(&self) -> ArgValue {
        elements(self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        collect(value, "BTreeSet")
    }
}

impl<T, S> ArgType for HashSet<T, S>
where
    T: ArgType + Eq + Hash,
    S: BuildHasher + Default,
{
    fn shape() -> TypeShape {
        sequence::<T>(ContainerKind::HashSet)
    }

    fn to_arg_value(&self) -> ArgValue {
        elements(self)
    }

    fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
        collect(value, "HashSet")
    }
}

fn next_element(
    items: &mut std::vec::IntoIter<ArgValue>,
    expected: usize,
) -> Result<ArgValue, ValueError> {
    items.next().ok_or(ValueError::Length {
        expected,
        found: expected.saturating_sub(1),
    })
}

macro_rules! tuple_impls {
    ($($len:literal => ($($name:ident . $idx:tt),+);)+) => {$(
        impl<$($name: ArgType),+> ArgType for ($($name,)+) {
            fn shape() -> TypeShape {
                TypeShape::Tuple(vec![$($name::shape()),+])
            }

            fn to_arg_value(&self) -> ArgValue {
                ArgValue::Seq(vec![$(self.$idx.to_arg_value()),+])
            }

            fn from_arg_value(value: ArgValue) -> Result<Self, ValueError> {
                let items = value.into_seq("tuple")?;
                if items.len() != $len {
                    return Err(ValueError::Length {
                        expected: $len,
                        found: items.len(),
                    });
                }
                let mut remaining = items.into_iter();
                Ok(($($name::from_arg_value(next_element(&mut remaining, $len)?)?,)+))
            }
        }
    )+};
}

tuple_impls! {
    1 => (A.0);
    2 => (A.0, B.1);
    3 => (A.0, B.1, C.2);
    4 => (A.0, B.1, C.2, D.3);
    5 => (A.0, B.1, C.2, D.3, E.4);
    6 => (A.0, B.1, C.2, D.3, E.4, F.5);
}
