//! Code generation for the derive macros.

mod arg_enum;
mod record;

pub(crate) use arg_enum::arg_enum_impl;
pub(crate) use record::record_impls;
