//! Unit tests for the untyped value model.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::{ArgValue, ValueError};

fn record(fields: &[(&str, ArgValue)]) -> ArgValue {
    ArgValue::Record(
        fields
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[rstest]
fn takes_fields_by_name() -> Result<()> {
    let mut fields = record(&[("a", ArgValue::Int(3)), ("b", ArgValue::Str("x".into()))])
        .into_record("Demo")?;
    let a: i32 = fields.take("a")?;
    let b: String = fields.take("b")?;
    ensure!(a == 3 && b == "x");
    Ok(())
}

#[rstest]
fn missing_fields_name_the_record() -> Result<()> {
    let mut fields = record(&[]).into_record("Demo")?;
    let err = fields
        .take::<u8>("a")
        .err()
        .ok_or_else(|| anyhow!("expected a missing field"))?;
    ensure!(err == ValueError::MissingField { record: "Demo", field: "a" });
    ensure!(err.to_string() == "record Demo is missing field 'a'");
    Ok(())
}

#[rstest]
#[case(ArgValue::Bool(true), "bool")]
#[case(ArgValue::Seq(Vec::new()), "sequence")]
#[case(ArgValue::Absent, "absent")]
fn non_records_are_mismatches(#[case] value: ArgValue, #[case] found: &'static str) {
    assert_eq!(
        value.into_record("Demo").err(),
        Some(ValueError::Mismatch {
            expected: "Demo",
            found,
        })
    );
}

#[rstest]
fn sequences_unwrap() -> Result<()> {
    let items = ArgValue::Seq(vec![ArgValue::Char('a')]).into_seq("Vec")?;
    ensure!(items == [ArgValue::Char('a')]);
    ensure!(ArgValue::Int(1).into_seq("Vec").is_err());
    Ok(())
}
