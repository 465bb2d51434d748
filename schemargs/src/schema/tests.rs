//! Unit tests for schema descriptions and the flattening arena.

use std::collections::HashMap;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;

use super::{PrimitiveKind, RecordRef, SchemaArena, TypeShape, WrapperKind};
use crate::definition::DestinationKey;
use crate::{ArgValue, ArgsError, Record};

#[derive(Record, Debug, PartialEq)]
#[schemargs(crate = "crate")]
struct Inner {
    /// Inner value.
    #[schemargs(default = 1)]
    y: i32,
}

/// Outer record.
#[derive(Record, Debug, PartialEq)]
#[schemargs(crate = "crate")]
struct Outer {
    x: u8,
    b: Inner,
    #[schemargs(skip)]
    hidden: Vec<u8>,
}

#[derive(Record)]
#[schemargs(crate = "crate")]
struct Node {
    value: u8,
    next: Box<Node>,
}

#[derive(Record)]
#[schemargs(crate = "crate")]
struct Ping {
    pong: Box<Pong>,
}

#[derive(Record)]
#[schemargs(crate = "crate")]
struct Pong {
    ping: Box<Ping>,
}

#[rstest]
fn with_literal_keeps_optional_and_wrapper_layers() {
    let base = TypeShape::Optional(Box::new(TypeShape::Primitive(PrimitiveKind::U8)))
        .labeled("level");
    let shape = TypeShape::with_literal(base, vec![ArgValue::UInt(1)]);
    let TypeShape::Wrapped { wrapper, inner } = shape else {
        panic!("label layer lost");
    };
    assert_eq!(wrapper, WrapperKind::Labeled("level"));
    assert!(matches!(
        *inner,
        TypeShape::Optional(ref literal) if matches!(**literal, TypeShape::Literal { .. })
    ));
}

#[rstest]
#[case(TypeShape::Primitive(PrimitiveKind::F64), "f64")]
#[case(TypeShape::Optional(Box::new(TypeShape::Primitive(PrimitiveKind::Str))), "Option<String>")]
#[case(
    TypeShape::Tuple(vec![TypeShape::Primitive(PrimitiveKind::I8), TypeShape::Generic("T")]),
    "(i8, T)"
)]
fn shapes_render_as_rust_types(#[case] shape: TypeShape, #[case] expected: &str) {
    assert_eq!(shape.to_string(), expected);
}

#[rstest]
fn derived_schema_carries_docs_and_order() -> Result<()> {
    let schema = Outer::schema();
    ensure!(schema.name == "Outer");
    ensure!(schema.doc == Some("Outer record."));
    let names: Vec<_> = schema.fields.iter().map(|field| field.name).collect();
    ensure!(names == ["x", "b", "hidden"]);
    ensure!(Inner::schema().field_doc("y") == Some("Inner value."));
    ensure!(schema.field_doc("x").is_none());
    Ok(())
}

#[rstest]
fn arena_flattens_nested_records() -> Result<()> {
    let arena = SchemaArena::build(RecordRef::of::<Outer>())?;
    let leaves: Vec<String> = arena
        .leaves()
        .map(|(_, leaf)| leaf.destination().to_string())
        .collect();
    ensure!(leaves == ["x", "b.y"], "unexpected leaves {leaves:?}");
    let (_, nested) = arena
        .leaves()
        .nth(1)
        .ok_or_else(|| anyhow!("missing nested leaf"))?;
    ensure!(nested.prefix == "b.");
    ensure!(arena.parent(nested.node) == Some(arena.root()));
    ensure!(arena.prefix(nested.node) == Some("b."));
    Ok(())
}

#[rstest]
fn arena_assembles_values_bottom_up() -> Result<()> {
    let arena = SchemaArena::build(RecordRef::of::<Outer>())?;
    let values = HashMap::from([
        (DestinationKey::new("", "x"), ArgValue::UInt(4)),
        (DestinationKey::new("b.", "y"), ArgValue::Int(-2)),
    ]);
    let assembled = arena.assemble(values)?;
    let outer = <Outer as crate::ArgType>::from_arg_value(assembled)?;
    ensure!(
        outer
            == Outer {
                x: 4,
                b: Inner { y: -2 },
                hidden: Vec::new(),
            }
    );
    Ok(())
}

#[rstest]
fn assembling_without_a_leaf_fails() -> Result<()> {
    let arena = SchemaArena::build(RecordRef::of::<Outer>())?;
    let values = HashMap::from([(DestinationKey::new("", "x"), ArgValue::UInt(4))]);
    ensure!(arena.assemble(values).is_err());
    Ok(())
}

#[rstest]
#[case::self_reference(RecordRef::of::<Node>(), "Node -> Node")]
#[case::mutual(RecordRef::of::<Ping>(), "Ping -> Pong -> Ping")]
fn cycles_are_rejected(#[case] root: RecordRef, #[case] expected: &str) -> Result<()> {
    match SchemaArena::build(root) {
        Err(ArgsError::CyclicSchema { cycle }) => {
            ensure!(cycle == expected, "unexpected cycle {cycle}");
            Ok(())
        }
        other => Err(anyhow!("expected a cycle, got {other:?}")),
    }
}
