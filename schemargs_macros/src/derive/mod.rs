//! Derive implementations, split into attribute parsing and code generation.

use proc_macro2::TokenStream;
use syn::DeriveInput;

mod generate;
mod parse;

/// Expands `#[derive(Record)]`.
pub(crate) fn derive_record(input: &DeriveInput) -> syn::Result<TokenStream> {
    let record = parse::parse_record(input)?;
    let krate = record.attrs.runtime_path();
    Ok(generate::record_impls(&record, &krate))
}

/// Expands `#[derive(ArgEnum)]`.
pub(crate) fn derive_arg_enum(input: &DeriveInput) -> syn::Result<TokenStream> {
    let arg_enum = parse::parse_enum(input)?;
    let krate = arg_enum.attrs.runtime_path();
    Ok(generate::arg_enum_impl(&arg_enum, &krate))
}
