//! Procedural macros for `schemargs`.
//!
//! `#[derive(Record)]` describes a struct with named fields as a
//! `schemargs::RecordSchema` and implements `schemargs::ArgType` so parsed
//! values can be turned back into the struct. `#[derive(ArgEnum)]` does the
//! same for enums whose variants carry no data; members are addressed by
//! variant name on the command line.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `schemargs::Record`.
///
/// Field attributes, all under `#[schemargs(...)]`:
///
/// - `default = expr` or bare `default` (uses `Default::default()`);
/// - `default_factory = path` to a function called on every parse;
/// - `skip` to keep the field off the command line;
/// - `literal(a, b, ...)` to restrict the field to a closed set of values;
/// - `label = "..."` to annotate the type without changing how it parses.
///
/// The struct attribute `crate = "path"` renames the runtime crate.
#[proc_macro_derive(Record, attributes(schemargs))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::derive_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for enums used as `schemargs` choice sets.
#[proc_macro_derive(ArgEnum, attributes(schemargs))]
pub fn derive_arg_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::derive_arg_enum(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
