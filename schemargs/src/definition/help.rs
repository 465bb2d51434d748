//! Help text: field docs followed by a default annotation.

use super::{Action, ArgumentDefinition, DefaultKind};
use crate::error::ArgsResult;

/// Collapses runs of whitespace, including newlines, into single spaces.
fn normalise(doc: &str) -> String {
    doc.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Builds the `(default: ...)` note, if the argument gets one.
///
/// Flip flags and required arguments get none. An optional argument without
/// a default shows `None`.
fn annotation(def: &ArgumentDefinition) -> Option<String> {
    if def.action != Action::None || def.required {
        return None;
    }
    let Some(default) = &def.default else {
        return Some("(default: None)".to_owned());
    };
    let rendered = def
        .arity
        .and_then(|arity| DefaultKind::classify(default, arity))?;
    Some(format!("(default: {})", rendered.annotation()))
}

/// Fourth stage: composes the help string.
///
/// clap prints help text verbatim and never treats it as a format string, so
/// docs need no escaping; only their whitespace is normalised.
pub(super) fn compose_help_text(mut def: ArgumentDefinition) -> ArgsResult<ArgumentDefinition> {
    let parts: Vec<String> = def
        .doc
        .map(normalise)
        .filter(|doc| !doc.is_empty())
        .into_iter()
        .chain(annotation(&def))
        .collect();
    def.help = parts.join(" ");
    Ok(def)
}
