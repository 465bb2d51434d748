//! Two-mode flag protocol for boolean fields.
//!
//! A `bool` without a default takes an explicit `true`/`false` token. With a
//! default of `false` the flag becomes a switch that sets `true`; with a
//! default of `true` the flag is renamed `no_<name>` and sets `false`.

use super::{Action, ArgumentDefinition};
use crate::ArgValue;
use crate::error::ArgsResult;
use crate::resolve::unwrap_transparent;
use crate::schema::{PrimitiveKind, TypeShape};

fn is_plain_bool(def: &ArgumentDefinition) -> bool {
    matches!(
        unwrap_transparent(&def.shape, &def.substitutions),
        Ok(TypeShape::Primitive(PrimitiveKind::Bool))
    )
}

/// Second stage: assigns flip actions to defaulted booleans.
pub(super) fn specialise_boolean_flags(
    mut def: ArgumentDefinition,
) -> ArgsResult<ArgumentDefinition> {
    if !is_plain_bool(&def) {
        return Ok(def);
    }
    match def.default {
        Some(ArgValue::Bool(false)) => {
            def.action = Action::FlipToTrue;
        }
        Some(ArgValue::Bool(true)) => {
            def.action = Action::FlipToFalse;
            def.name = format!("no_{}", def.name);
        }
        _ => return Ok(def),
    }
    def.required = false;
    Ok(def)
}
