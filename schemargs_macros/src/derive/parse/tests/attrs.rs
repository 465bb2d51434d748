//! Tests for `#[schemargs(...)]` attribute parsing.

use super::super::*;
use anyhow::{Result, anyhow, ensure};
use quote::ToTokens;
use rstest::rstest;
use syn::{Attribute, parse_quote};

#[rstest]
fn parses_default_expression() -> Result<()> {
    let attrs: Vec<Attribute> = vec![parse_quote!(#[schemargs(default = 3)])];
    let parsed = parse_field_attrs(&attrs)?;
    let Some(DefaultAttr::Expr(expr)) = parsed.default else {
        return Err(anyhow!("expected an expression default"));
    };
    ensure!(expr.to_token_stream().to_string() == "3");
    Ok(())
}

#[rstest]
fn parses_bare_default_and_skip() -> Result<()> {
    let attrs: Vec<Attribute> = vec![parse_quote!(#[schemargs(default, skip)])];
    let parsed = parse_field_attrs(&attrs)?;
    ensure!(matches!(parsed.default, Some(DefaultAttr::Trait)));
    ensure!(parsed.skip);
    Ok(())
}

#[rstest]
fn parses_default_factory() -> Result<()> {
    let attrs: Vec<Attribute> = vec![parse_quote!(#[schemargs(default_factory = make_list)])];
    let parsed = parse_field_attrs(&attrs)?;
    let Some(DefaultAttr::Factory(path)) = parsed.default else {
        return Err(anyhow!("expected a factory default"));
    };
    ensure!(path.is_ident("make_list"));
    Ok(())
}

#[rstest]
fn parses_literal_values_and_label() -> Result<()> {
    let attrs: Vec<Attribute> = vec![
        parse_quote!(#[schemargs(literal(0, 1, 2))]),
        parse_quote!(#[schemargs(label = "seed")]),
    ];
    let parsed = parse_field_attrs(&attrs)?;
    let values = parsed.literal.ok_or_else(|| anyhow!("expected literal values"))?;
    ensure!(values.len() == 3);
    ensure!(parsed.label.map(|label| label.value()).as_deref() == Some("seed"));
    Ok(())
}

#[rstest]
#[case::unknown(parse_quote!(#[schemargs(rename = "x")]), "unknown schemargs attribute")]
#[case::two_defaults(
    parse_quote!(#[schemargs(default = 1, default_factory = one)]),
    "at most one"
)]
#[case::empty_literal(parse_quote!(#[schemargs(literal())]), "at least one value")]
#[case::label_not_string(parse_quote!(#[schemargs(label = 3)]), "label must be a string")]
fn rejects_invalid_field_attrs(#[case] attr: Attribute, #[case] message: &str) -> Result<()> {
    let Err(err) = parse_field_attrs(&[attr]) else {
        return Err(anyhow!("expected an error"));
    };
    ensure!(err.to_string().contains(message), "got {err}");
    Ok(())
}

#[rstest]
fn parses_crate_path() -> Result<()> {
    let attrs: Vec<Attribute> = vec![parse_quote!(#[schemargs(crate = "renamed::schemargs")])];
    let parsed = parse_type_attrs(&attrs)?;
    let path = parsed.crate_path.ok_or_else(|| anyhow!("expected a crate path"))?;
    ensure!(path.to_token_stream().to_string() == "renamed :: schemargs");
    Ok(())
}

#[rstest]
fn ignores_foreign_attributes() -> Result<()> {
    let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(default)]), parse_quote!(#[doc = "x"])];
    let parsed = parse_field_attrs(&attrs)?;
    ensure!(parsed.default.is_none() && !parsed.skip);
    Ok(())
}

#[rstest]
#[case::default(None, "schemargs")]
#[case::alias(Some(r#"#[schemargs(crate = "args")]"#), "args")]
#[case::nested(Some(r#"#[schemargs(crate = "vendored::schemargs")]"#), "vendored :: schemargs")]
fn runtime_path_follows_crate_attribute(
    #[case] attr: Option<&str>,
    #[case] expected: &str,
) -> Result<()> {
    let attrs = attr
        .map(|text| syn::parse_str::<syn::DeriveInput>(&format!("{text} struct Demo;")))
        .transpose()?
        .map(|input| input.attrs)
        .unwrap_or_default();
    let path = parse_type_attrs(&attrs)?.runtime_path().to_string();
    ensure!(path == expected, "got {path}");
    Ok(())
}
