//! Derive a typed command-line interface from a record type.
//!
//! A record is a struct deriving [`Record`]. Each of its fields becomes a
//! `--flag` whose arity, choices and default follow from the field's type;
//! nested records contribute dotted flags such as `--optimizer.lr`. Parsing
//! rebuilds a fully typed instance of the record.
//!
//! ```rust,no_run
//! use schemargs::{ArgEnum, Record};
//!
//! #[derive(ArgEnum, Debug, Clone, Copy, PartialEq, Eq)]
//! enum Mode {
//!     Fast,
//!     Careful,
//! }
//!
//! /// Train a model.
//! #[derive(Record, Debug)]
//! struct Train {
//!     /// Dataset location.
//!     data: std::path::PathBuf,
//!     #[schemargs(default = Mode::Fast)]
//!     mode: Mode,
//!     #[schemargs(default = false)]
//!     verbose: bool,
//! }
//!
//! let train: Train = schemargs::parse();
//! ```
//!
//! The actual derive implementations live in the companion
//! `schemargs_macros` crate.

extern crate self as schemargs;

use std::ffi::OsString;
use std::path::Path;

pub use schemargs_macros::{ArgEnum, Record};

pub mod definition;
pub mod engine;
mod error;
pub mod resolve;
pub mod schema;
mod types;
mod value;
#[cfg(feature = "yaml")]
mod yaml;

pub use definition::{Action, ArgumentDefinition, DefaultKind, DefinitionSet, DestinationKey};
pub use engine::Engine;
pub use error::{ArgsError, ArgsResult, is_display_request};
pub use resolve::{Arity, InstantiateError, Instantiator, Metadata};
pub use schema::{
    ContainerKind, DefaultSource, FieldDescriptor, PrimitiveKind, RecordRef, RecordSchema,
    TypeShape, WrapperKind,
};
pub use types::{ArgType, Final, Record};
pub use value::{ArgValue, RecordFields, ValueError};
#[cfg(feature = "yaml")]
pub use yaml::{YamlError, from_yaml, to_yaml};

/// Builds the argument definitions for `T` without parsing anything.
///
/// # Errors
///
/// Returns a schema error when `T` cannot be expressed as a command line.
pub fn build_definitions<T: Record>() -> ArgsResult<DefinitionSet> {
    DefinitionSet::build(RecordRef::of::<T>())
}

/// Parses `tokens` into a `T`.
///
/// `tokens` exclude the binary name. `description` overrides the record's
/// doc comment in the help output.
///
/// # Errors
///
/// Returns a schema error when `T` cannot be expressed as a command line and
/// a parse-time error when `tokens` do not describe a `T`. `--help` surfaces
/// as [`ArgsError::Usage`]; check it with [`is_display_request`].
pub fn try_parse_from<T, I, S>(tokens: I, description: Option<&str>) -> ArgsResult<T>
where
    T: Record,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let definitions = build_definitions::<T>()?;
    let name = definitions
        .arena()
        .schema(definitions.arena().root())
        .map_or("", |schema| schema.name)
        .to_owned();
    run(definitions, &name, tokens, description)
}

fn run<T, I, S>(
    definitions: DefinitionSet,
    name: &str,
    tokens: I,
    description: Option<&str>,
) -> ArgsResult<T>
where
    T: Record,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut engine = Engine::new(definitions, name, description);
    let value = engine.parse(tokens)?;
    Ok(T::from_arg_value(value)?)
}

/// Parses `tokens` into a `T`, exiting the process on failure.
///
/// Usage errors are printed by clap and exit with status 2; `--help` prints
/// to stdout and exits with status 0.
///
/// # Panics
///
/// Panics when `T` cannot be expressed as a command line.
pub fn parse_from<T, I, S>(tokens: I, description: Option<&str>) -> T
where
    T: Record,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    try_parse_from(tokens, description).unwrap_or_else(|err| err.exit())
}

/// Parses the process arguments into a `T`, exiting the process on failure.
///
/// # Panics
///
/// Panics when `T` cannot be expressed as a command line.
#[must_use]
pub fn parse<T: Record>() -> T {
    let mut args = std::env::args_os();
    let name = args
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    build_definitions::<T>()
        .and_then(|definitions| run(definitions, &name, args, None))
        .unwrap_or_else(|err| err.exit())
}
