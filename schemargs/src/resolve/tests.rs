//! Unit tests for type resolution and instantiators.

use std::path::PathBuf;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::{Arity, FieldClass, InstantiateError, classify, resolve};
use crate::schema::{ContainerKind, PrimitiveKind, RecordRef, TypeShape, WrapperKind};
use crate::{ArgEnum, ArgType, ArgValue, Final, Record};

#[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[schemargs(crate = "crate")]
enum Color {
    Red,
    Green,
}

#[derive(Record)]
#[schemargs(crate = "crate")]
struct Point {
    x: i32,
}

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|token| (*token).to_owned()).collect()
}

fn prim(kind: PrimitiveKind) -> TypeShape {
    TypeShape::Primitive(kind)
}

#[rstest]
#[case(PrimitiveKind::I32, "-12", ArgValue::Int(-12))]
#[case(PrimitiveKind::U64, "18446744073709551615", ArgValue::UInt(u128::from(u64::MAX)))]
#[case(PrimitiveKind::F64, "0.5", ArgValue::F64(0.5))]
#[case(PrimitiveKind::Bool, "false", ArgValue::Bool(false))]
#[case(PrimitiveKind::Char, "z", ArgValue::Char('z'))]
#[case(PrimitiveKind::Str, "two words", ArgValue::Str("two words".into()))]
#[case(PrimitiveKind::Path, "a/b", ArgValue::Path(PathBuf::from("a/b")))]
fn primitives_convert_single_tokens(
    #[case] kind: PrimitiveKind,
    #[case] token: &str,
    #[case] expected: ArgValue,
) -> Result<()> {
    let resolved = resolve(&prim(kind), &[])?;
    ensure!(resolved.metadata.arity == Arity::Scalar);
    ensure!(resolved.metadata.choices.is_none());
    ensure!(resolved.instantiator.instantiate(&tokens(&[token]))? == expected);
    Ok(())
}

#[rstest]
#[case(PrimitiveKind::Bool, "True")]
#[case(PrimitiveKind::Bool, "1")]
#[case(PrimitiveKind::U8, "256")]
#[case(PrimitiveKind::I8, "-129")]
#[case(PrimitiveKind::F32, "fast")]
#[case(PrimitiveKind::Char, "ab")]
fn bad_tokens_are_conversion_errors(#[case] kind: PrimitiveKind, #[case] token: &str) -> Result<()> {
    let resolved = resolve(&prim(kind), &[])?;
    let err = resolved
        .instantiator
        .instantiate(&tokens(&[token]))
        .err()
        .ok_or_else(|| anyhow!("{token} should not convert"))?;
    ensure!(
        matches!(&err, InstantiateError::Conversion { value, expected, .. }
            if value == token && *expected == kind.type_name()),
        "unexpected error {err:?}"
    );
    Ok(())
}

#[rstest]
fn literal_sets_map_tokens_back_to_values() -> Result<()> {
    let shape = TypeShape::with_literal(
        prim(PrimitiveKind::I32),
        vec![ArgValue::Int(0), ArgValue::Int(1), ArgValue::Int(2)],
    );
    let resolved = resolve(&shape, &[])?;
    ensure!(resolved.metadata.choices == Some(tokens(&["0", "1", "2"])));
    ensure!(resolved.metadata.value_hint.is_none());
    ensure!(resolved.instantiator.instantiate(&tokens(&["2"]))? == ArgValue::Int(2));
    let err = resolved.instantiator.instantiate(&tokens(&["3"]));
    ensure!(matches!(err, Err(InstantiateError::InvalidChoice { .. })));
    Ok(())
}

#[rstest]
fn enums_choose_by_member_name() -> Result<()> {
    let resolved = resolve(&Color::shape(), &[])?;
    ensure!(resolved.metadata.choices == Some(tokens(&["Red", "Green"])));
    let value = resolved.instantiator.instantiate(&tokens(&["Green"]))?;
    ensure!(Color::from_arg_value(value)? == Color::Green);
    ensure!(resolved.instantiator.instantiate(&tokens(&["green"])).is_err());
    Ok(())
}

#[rstest]
fn optional_marks_the_argument() -> Result<()> {
    let resolved = resolve(&<Option<u8>>::shape(), &[])?;
    ensure!(resolved.metadata.is_optional);
    ensure!(resolved.display_type == prim(PrimitiveKind::U8));
    Ok(())
}

#[rstest]
fn tuples_take_a_fixed_number_of_tokens() -> Result<()> {
    let resolved = resolve(&<(i32, String, bool)>::shape(), &[])?;
    ensure!(resolved.metadata.arity == Arity::Fixed(3));
    ensure!(resolved.metadata.value_hint == Some(tokens(&["INT", "STR", "{true,false}"])));
    let value = resolved
        .instantiator
        .instantiate(&tokens(&["4", "four", "true"]))?;
    ensure!(<(i32, String, bool)>::from_arg_value(value)? == (4, "four".to_owned(), true));
    let err = resolved.instantiator.instantiate(&tokens(&["4"]));
    ensure!(err == Err(InstantiateError::Arity { expected: 3, found: 1 }));
    Ok(())
}

#[rstest]
fn tuples_of_one_enum_share_its_choices() -> Result<()> {
    let resolved = resolve(&<(Color, Color)>::shape(), &[])?;
    ensure!(resolved.metadata.choices == Some(tokens(&["Red", "Green"])));
    ensure!(resolved.metadata.value_hint.is_none());
    Ok(())
}

#[rstest]
fn containers_take_any_number_of_tokens() -> Result<()> {
    let resolved = resolve(&<Vec<u16>>::shape(), &[])?;
    ensure!(resolved.metadata.arity == Arity::Variadic);
    let value = resolved.instantiator.instantiate(&tokens(&["1", "2", "1"]))?;
    ensure!(<Vec<u16>>::from_arg_value(value)? == [1, 2, 1]);
    ensure!(resolved.instantiator.instantiate(&[])? == ArgValue::Seq(Vec::new()));
    Ok(())
}

#[rstest]
fn wrappers_are_transparent() -> Result<()> {
    let plain = resolve(&prim(PrimitiveKind::F32), &[])?;
    let wrapped = resolve(&<Final<Box<f32>>>::shape().labeled("lr"), &[])?;
    ensure!(plain.metadata == wrapped.metadata);
    ensure!(wrapped.display_type == prim(PrimitiveKind::F32));
    Ok(())
}

#[rstest]
fn generic_parameters_are_substituted() -> Result<()> {
    let bindings = [("T", prim(PrimitiveKind::U8))];
    let resolved = resolve(&TypeShape::Generic("T"), &bindings)?;
    ensure!(resolved.instantiator.instantiate(&tokens(&["7"]))? == ArgValue::UInt(7));
    ensure!(resolve(&TypeShape::Generic("U"), &bindings).is_err());
    Ok(())
}

#[rstest]
#[case::nested_containers(<Vec<Vec<u8>>>::shape())]
#[case::optional_record(<Option<Point>>::shape())]
#[case::records_in_containers(<Vec<Point>>::shape())]
#[case::empty_tuple(TypeShape::Tuple(Vec::new()))]
#[case::opaque(TypeShape::Unsupported("HashMap<String, u8>"))]
fn unsupported_shapes_are_rejected(#[case] shape: TypeShape) {
    assert!(resolve(&shape, &[]).is_err(), "{shape} should be unsupported");
}

#[rstest]
fn classification_sees_through_wrappers() -> Result<()> {
    let boxed = TypeShape::Wrapped {
        wrapper: WrapperKind::Boxed,
        inner: Box::new(Point::shape()),
    };
    ensure!(classify(&boxed, &[])? == FieldClass::Record(RecordRef::of::<Point>()));
    ensure!(classify(&TypeShape::Excluded, &[])? == FieldClass::Excluded);
    let seq = TypeShape::Sequence {
        kind: ContainerKind::Vec,
        element: Box::new(prim(PrimitiveKind::U8)),
    };
    ensure!(classify(&seq, &[])? == FieldClass::Leaf);
    Ok(())
}
