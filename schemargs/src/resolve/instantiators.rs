//! Token-to-value conversion functions attached to leaf definitions.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::ArgValue;

pub(super) type Convert = Arc<dyn Fn(&str) -> Result<ArgValue, InstantiateError> + Send + Sync>;

type Instantiate = dyn Fn(&[String]) -> Result<ArgValue, InstantiateError> + Send + Sync;

/// Converts the raw tokens routed to one destination into an [`ArgValue`].
#[derive(Clone)]
pub struct Instantiator(Arc<Instantiate>);

impl Instantiator {
    /// Wraps a conversion function.
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&[String]) -> Result<ArgValue, InstantiateError> + Send + Sync + 'static,
    {
        Self(Arc::new(convert))
    }

    /// Runs the conversion.
    ///
    /// # Errors
    ///
    /// Returns an [`InstantiateError`] when the tokens do not describe a value
    /// of the resolved type.
    pub fn instantiate(&self, tokens: &[String]) -> Result<ArgValue, InstantiateError> {
        (self.0)(tokens)
    }
}

impl fmt::Debug for Instantiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Instantiator")
    }
}

/// Why raw tokens could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InstantiateError {
    /// The token is not one of the closed set of choices.
    #[error("invalid choice '{value}' (choose from {})", .choices.join(", "))]
    InvalidChoice {
        /// Token received.
        value: String,
        /// Accepted tokens.
        choices: Vec<String>,
    },
    /// The token does not parse as the target type.
    #[error("cannot convert '{value}' to {expected}: {reason}")]
    Conversion {
        /// Token received.
        value: String,
        /// Target type name.
        expected: &'static str,
        /// Parser message.
        reason: String,
    },
    /// The wrong number of tokens was routed to the argument.
    #[error("expected {expected} value(s), found {found}")]
    Arity {
        /// Tokens the type consumes.
        expected: usize,
        /// Tokens received.
        found: usize,
    },
}

impl InstantiateError {
    /// The offending token, when a single one is to blame.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::InvalidChoice { value, .. } | Self::Conversion { value, .. } => Some(value),
            Self::Arity { .. } => None,
        }
    }
}
