//! Attribute and input parsing for the derive macros.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, LitStr, Token, parenthesized};

mod docs;
mod input;
mod literals;
#[cfg(test)]
mod tests;
mod type_utils;

pub(crate) use docs::doc_text;
pub(crate) use input::{ArgEnumInput, FieldInput, RecordInput, parse_enum, parse_record};
use literals::lit_str;
pub(crate) use type_utils::{generic_param, literal_base};

/// Type-level attributes shared by both derives.
#[derive(Default, Clone)]
pub(crate) struct TypeAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[schemargs(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `schemargs::`.
    pub crate_path: Option<syn::Path>,
}

impl TypeAttrs {
    /// Path generated code uses to reach the runtime crate.
    pub(crate) fn runtime_path(&self) -> TokenStream {
        self.crate_path
            .as_ref()
            .map_or_else(|| quote! { schemargs }, ToTokens::to_token_stream)
    }
}

/// Where a field's default value comes from.
#[derive(Clone)]
pub(crate) enum DefaultAttr {
    /// `default = expr`.
    Expr(Expr),
    /// Bare `default`: `Default::default()`.
    Trait,
    /// `default_factory = path`.
    Factory(syn::Path),
}

/// Field-level attributes recognised by `#[derive(Record)]`.
///
/// - `default`/`default_factory` supply the value used when the flag is
///   omitted; a field without either is required unless it is optional.
/// - `skip` removes the field from the command line; it is constructed from
///   its default.
/// - `literal(...)` restricts the field to the listed constants.
/// - `label` wraps the field's type in a transparent annotation.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub default: Option<DefaultAttr>,
    pub skip: bool,
    pub literal: Option<Vec<Expr>>,
    pub label: Option<LitStr>,
}

/// Iterate all `#[schemargs(...)]` attributes once and apply a callback.
fn parse_schemargs<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("schemargs")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta, allowed: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string);
    meta.error(format!("unknown schemargs attribute `{key}`; expected {allowed}"))
}

pub(crate) fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    parse_schemargs(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let path = lit_str(meta, "crate")?.parse::<syn::Path>()?;
            out.crate_path = Some(path);
            Ok(())
        } else {
            Err(unknown_key(meta, "`crate`"))
        }
    })?;
    Ok(out)
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_schemargs(attrs, |meta| apply_field_attr(meta, &mut out))?;
    Ok(out)
}

fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<()> {
    let Some(ident) = meta.path.get_ident() else {
        return Err(unknown_key(meta, FIELD_KEYS));
    };
    match ident.to_string().as_str() {
        "default" => {
            let value = if meta.input.peek(Token![=]) {
                DefaultAttr::Expr(meta.value()?.parse()?)
            } else {
                DefaultAttr::Trait
            };
            set_default(meta, out, value)
        }
        "default_factory" => {
            let path = meta.value()?.parse::<syn::Path>()?;
            set_default(meta, out, DefaultAttr::Factory(path))
        }
        "skip" => {
            out.skip = true;
            Ok(())
        }
        "literal" => {
            let content;
            parenthesized!(content in meta.input);
            let values = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
            if values.is_empty() {
                return Err(meta.error("literal(...) requires at least one value"));
            }
            out.literal = Some(values.into_iter().collect());
            Ok(())
        }
        "label" => {
            out.label = Some(lit_str(meta, "label")?);
            Ok(())
        }
        _ => Err(unknown_key(meta, FIELD_KEYS)),
    }
}

const FIELD_KEYS: &str = "`default`, `default_factory`, `skip`, `literal` or `label`";

fn set_default(
    meta: &ParseNestedMeta,
    out: &mut FieldAttrs,
    value: DefaultAttr,
) -> syn::Result<()> {
    if out.default.is_some() {
        return Err(meta.error("a field takes at most one of `default` and `default_factory`"));
    }
    out.default = Some(value);
    Ok(())
}
