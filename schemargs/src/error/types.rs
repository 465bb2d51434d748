//! Primary error enum for schema building and argument parsing.

use thiserror::Error;

use crate::value::ValueError;

/// Errors raised while deriving a command line or parsing tokens with it.
///
/// Schema errors ([`ArgsError::is_schema_error`]) describe a record type
/// that cannot be turned into arguments; they are programming errors. Every
/// other variant is caused by user input and carries the [`clap::Error`]
/// rendered against the live command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArgsError {
    /// A field's type has no command-line representation.
    #[error("unsupported type for field '{field}': {shape}")]
    UnsupportedType {
        /// Dotted path of the offending field.
        field: String,
        /// Rendered type shape and the reason it was rejected.
        shape: String,
    },

    /// Two arguments resolve to the same destination or flag.
    #[error("destination collision on '{key}'")]
    DestinationCollision {
        /// Colliding destination key or flag spelling.
        key: String,
    },

    /// Record types nest themselves.
    #[error("cyclic schema detected: {cycle}")]
    CyclicSchema {
        /// Record types participating in the cycle, joined by `->`.
        cycle: String,
    },

    /// A token is not one of an argument's choices.
    #[error("invalid choice '{value}' for {flag}")]
    InvalidChoice {
        /// Flag that received the token.
        flag: String,
        /// Rejected token.
        value: String,
        /// Parser error rendered against the command.
        #[source]
        source: Box<clap::Error>,
    },

    /// A token could not be converted to the argument's type.
    #[error("invalid value '{value}' for {flag}: {reason}")]
    Conversion {
        /// Flag that received the token.
        flag: String,
        /// Rejected token.
        value: String,
        /// Conversion failure message.
        reason: String,
        /// Parser error rendered against the command.
        #[source]
        source: Box<clap::Error>,
    },

    /// A required argument was not supplied.
    #[error("missing required argument {flag}")]
    MissingRequired {
        /// Flag (or flags) that were missing.
        flag: String,
        /// Parser error rendered against the command.
        #[source]
        source: Box<clap::Error>,
    },

    /// Any other parser outcome, including `--help`.
    #[error("failed to parse command-line arguments: {0}")]
    Usage(#[from] Box<clap::Error>),

    /// Parsed values did not match the record's constructor.
    #[error("failed to construct record: {0}")]
    Value(#[from] ValueError),
}

/// Result alias used throughout the crate.
pub type ArgsResult<T> = Result<T, ArgsError>;
