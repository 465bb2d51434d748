//! Tests for derive input gathering.

use super::super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

#[rstest]
fn gathers_fields_docs_and_attrs() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        /// Train a model.
        ///
        /// Runs on one GPU.
        struct Train {
            /// Learning
            /// rate.
            #[schemargs(default = 0.1)]
            lr: f64,
            #[schemargs(skip)]
            cache: Vec<u8>,
        }
    };
    let record = parse_record(&input)?;
    ensure!(record.ident == "Train");
    ensure!(record.doc.as_deref() == Some("Train a model.\n\nRuns on one GPU."));
    let [lr, cache] = record.fields.as_slice() else {
        return Err(anyhow!("expected two fields"));
    };
    ensure!(lr.ident == "lr" && lr.doc.as_deref() == Some("Learning\nrate."));
    ensure!(lr.attrs.default.is_some());
    ensure!(cache.attrs.skip && cache.doc.is_none());
    Ok(())
}

#[rstest]
#[case::tuple_struct(parse_quote!(struct Pair(u8, u8);), "named fields")]
#[case::enum_input(parse_quote!(enum E { A }), "only be derived for structs")]
fn rejects_non_record_inputs(#[case] input: DeriveInput, #[case] message: &str) -> Result<()> {
    let Err(err) = parse_record(&input) else {
        return Err(anyhow!("expected an error"));
    };
    ensure!(err.to_string().contains(message), "got {err}");
    Ok(())
}

#[rstest]
fn gathers_enum_variants() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        enum Color { Red, Green, Blue }
    };
    let parsed = parse_enum(&input)?;
    let names: Vec<String> = parsed.variants.iter().map(ToString::to_string).collect();
    ensure!(names == ["Red", "Green", "Blue"]);
    Ok(())
}

#[rstest]
#[case::data(parse_quote!(enum E { A(u8) }), "cannot carry data")]
#[case::empty(parse_quote!(enum E {}), "at least one variant")]
#[case::structure(parse_quote!(struct S { a: u8 }), "only be derived for enums")]
fn rejects_invalid_enums(#[case] input: DeriveInput, #[case] message: &str) -> Result<()> {
    let Err(err) = parse_enum(&input) else {
        return Err(anyhow!("expected an error"));
    };
    ensure!(err.to_string().contains(message), "got {err}");
    Ok(())
}
