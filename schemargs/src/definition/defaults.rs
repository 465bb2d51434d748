//! Rendering native defaults into the tokens an instantiator accepts.

use tracing::warn;

use super::{Action, ArgumentDefinition};
use crate::ArgValue;
use crate::error::ArgsResult;
use crate::resolve::Arity;

/// A default value rendered for the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultKind {
    /// An enum member, rendered by name.
    Member(String),
    /// One token per tuple or container element.
    Elements(Vec<String>),
    /// A single token produced by `Display`.
    Scalar(String),
}

impl DefaultKind {
    /// Renders `value` for an argument of the given arity.
    ///
    /// Returns `None` when the value has no token form, such as a path that
    /// is not valid UTF-8 or a sequence given to a scalar argument.
    #[must_use]
    pub fn classify(value: &ArgValue, arity: Arity) -> Option<Self> {
        match (value, arity) {
            (ArgValue::Seq(items), Arity::Fixed(_) | Arity::Variadic) => items
                .iter()
                .map(render_scalar)
                .collect::<Option<Vec<_>>>()
                .map(Self::Elements),
            (ArgValue::Member(member), Arity::Scalar) => Some(Self::Member(member.clone())),
            (_, Arity::Scalar) => render_scalar(value).map(Self::Scalar),
            _ => None,
        }
    }

    /// Tokens to hand to the parser.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Member(token) | Self::Scalar(token) => vec![token.clone()],
            Self::Elements(tokens) => tokens.clone(),
        }
    }

    /// Text shown inside `(default: ...)`.
    #[must_use]
    pub fn annotation(&self) -> String {
        match self {
            Self::Member(member) => member.clone(),
            Self::Scalar(token) => shell_words::quote(token).into_owned(),
            Self::Elements(tokens) => shell_words::join(tokens),
        }
    }
}

/// Renders a single value as the token that converts back into it.
#[must_use]
pub fn render_scalar(value: &ArgValue) -> Option<String> {
    match value {
        ArgValue::Bool(flag) => Some(flag.to_string()),
        ArgValue::Int(number) => Some(number.to_string()),
        ArgValue::UInt(number) => Some(number.to_string()),
        ArgValue::F32(number) => Some(number.to_string()),
        ArgValue::F64(number) => Some(number.to_string()),
        ArgValue::Char(ch) => Some(ch.to_string()),
        ArgValue::Str(text) => Some(text.clone()),
        ArgValue::Path(path) => path.to_str().map(ToOwned::to_owned),
        ArgValue::Member(member) => Some(member.clone()),
        ArgValue::Absent | ArgValue::Seq(_) | ArgValue::Record(_) => None,
    }
}

/// Final stage: renders the default and checks it converts back exactly.
///
/// A default that cannot be rendered, or that does not survive the round
/// trip, is kept only in native form and the parser receives no tokens.
pub(super) fn render_default_tokens(
    mut def: ArgumentDefinition,
) -> ArgsResult<ArgumentDefinition> {
    if def.action != Action::None {
        return Ok(def);
    }
    let (Some(default), Some(arity)) = (&def.default, def.arity) else {
        return Ok(def);
    };
    let rendered = DefaultKind::classify(default, arity).filter(|kind| {
        def.instantiator
            .as_ref()
            .is_none_or(|inst| inst.instantiate(&kind.tokens()).as_ref() == Ok(default))
    });
    if rendered.is_none() {
        warn!(
            destination = %def.destination,
            default = ?default,
            "default value has no exact token form"
        );
    }
    def.default_tokens = rendered;
    Ok(def)
}
