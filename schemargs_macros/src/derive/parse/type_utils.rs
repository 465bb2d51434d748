//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise wrappers such as `Option<T>`, `Final<T>` and `Box<T>`, and bare
//! uses of a struct's type parameters.

use syn::{GenericArgument, Generics, Ident, PathArguments, Type};

/// Extract the first type argument from a `PathArguments` container.
fn extract_first_type_argument(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    let first = angle_args.args.first()?;
    let GenericArgument::Type(inner) = first else {
        return None;
    };
    Some(inner)
}

/// Returns the generic parameter if `ty` is the provided wrapper.
///
/// The check is shallow: it inspects only the final path segment, so
/// `std::option::Option<T>` and `Option<T>` both match.
fn type_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(p) = ty else {
        return None;
    };
    let last = p.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    extract_first_type_argument(&last.arguments)
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Option")
}

/// Peels `Option`, `Final` and `Box` layers off `ty`.
///
/// `literal(...)` values are written in terms of this innermost type, so a
/// literal set on an `Option<u8>` field lists plain `u8` constants.
pub(crate) fn literal_base(ty: &Type) -> &Type {
    option_inner(ty)
        .or_else(|| type_inner(ty, "Final"))
        .or_else(|| type_inner(ty, "Box"))
        .map_or(ty, literal_base)
}

/// Returns the type parameter `ty` names, if it is a bare parameter.
pub(crate) fn generic_param<'a>(ty: &Type, generics: &'a Generics) -> Option<&'a Ident> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let ident = p.path.get_ident()?;
    generics
        .type_params()
        .map(|param| &param.ident)
        .find(|param| *param == ident)
}
