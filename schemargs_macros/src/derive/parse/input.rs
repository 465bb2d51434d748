//! Input parsing for the derive macros.
//!
//! Each derive gathers the type identifier, its members and all attribute
//! metadata in one pass so expansion can fail fast with useful errors.

use syn::{Data, DeriveInput, Fields, Generics, Ident, Type};

use super::{FieldAttrs, TypeAttrs, doc_text, parse_field_attrs, parse_type_attrs};

/// A struct deriving `Record`.
pub(crate) struct RecordInput {
    pub ident: Ident,
    pub generics: Generics,
    pub attrs: TypeAttrs,
    pub doc: Option<String>,
    pub fields: Vec<FieldInput>,
}

/// One named field of a record.
pub(crate) struct FieldInput {
    pub ident: Ident,
    pub ty: Type,
    pub attrs: FieldAttrs,
    pub doc: Option<String>,
}

/// An enum deriving `ArgEnum`.
pub(crate) struct ArgEnumInput {
    pub ident: Ident,
    pub attrs: TypeAttrs,
    pub variants: Vec<Ident>,
}

/// Gathers information from a struct with named fields.
pub(crate) fn parse_record(input: &DeriveInput) -> syn::Result<RecordInput> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            data.struct_token,
            "Record requires named fields",
        ));
    };
    let fields = named
        .named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new_spanned(field, "Record requires named fields"))?;
            Ok(FieldInput {
                ident,
                ty: field.ty.clone(),
                attrs: parse_field_attrs(&field.attrs)?,
                doc: doc_text(&field.attrs),
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(RecordInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        attrs: parse_type_attrs(&input.attrs)?,
        doc: doc_text(&input.attrs),
        fields,
    })
}

/// Gathers the unit variants of an enum.
pub(crate) fn parse_enum(input: &DeriveInput) -> syn::Result<ArgEnumInput> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ArgEnum can only be derived for enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "ArgEnum does not support generic enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ArgEnum requires at least one variant",
        ));
    }
    let variants = data
        .variants
        .iter()
        .map(|variant| match variant.fields {
            Fields::Unit => Ok(variant.ident.clone()),
            _ => Err(syn::Error::new_spanned(
                variant,
                "ArgEnum variants cannot carry data",
            )),
        })
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(ArgEnumInput {
        ident: input.ident.clone(),
        attrs: parse_type_attrs(&input.attrs)?,
        variants,
    })
}
