//! Adapter between argument definitions and the `clap` parser.
//!
//! The engine turns a [`DefinitionSet`] into a [`clap::Command`], lets clap
//! scan the tokens, and then routes each destination's raw tokens through
//! its instantiator. Instantiator failures are reported as clap errors built
//! against the same command so they render with the usual usage tail.

use std::collections::HashMap;
use std::ffi::OsString;

use clap::builder::{PossibleValuesParser, ValueParser};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use crate::definition::{Action, ArgumentDefinition, DefinitionSet, DestinationKey};
use crate::error::{ArgsError, ArgsResult};
use crate::resolve::{Arity, InstantiateError};
use crate::ArgValue;

/// A parser for one record type.
#[derive(Debug)]
pub struct Engine {
    definitions: DefinitionSet,
    command: Command,
}

impl Engine {
    /// Builds the command for `definitions`.
    ///
    /// `description` falls back to the root record's doc comment, and then
    /// to an empty string.
    #[must_use]
    pub fn new(definitions: DefinitionSet, name: &str, description: Option<&str>) -> Self {
        let about = description
            .or_else(|| definitions.description())
            .unwrap_or_default()
            .to_owned();
        let command = definitions.definitions().iter().fold(
            Command::new(name.to_owned()).no_binary_name(true).about(about),
            |cmd, def| cmd.arg(argument(def)),
        );
        Self {
            definitions,
            command,
        }
    }

    /// The clap command, for rendering help or usage.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Mutable access to the clap command.
    pub const fn command_mut(&mut self) -> &mut Command {
        &mut self.command
    }

    /// The definitions the command was built from.
    #[must_use]
    pub const fn definitions(&self) -> &DefinitionSet {
        &self.definitions
    }

    /// Parses `tokens` (without a binary name) into the root record's value.
    ///
    /// # Errors
    ///
    /// Returns the parse-time [`ArgsError`] variants for bad input and
    /// [`ArgsError::Value`] when the gathered values do not fit the record.
    pub fn parse<I, T>(&mut self, tokens: I) -> ArgsResult<ArgValue>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(tokens)
            .map_err(ArgsError::from_clap)?;
        let mut values = HashMap::new();
        for def in self.definitions.definitions() {
            let value = gather(&mut self.command, def, &matches)?;
            values.insert(def.destination().clone(), value);
        }
        debug!(values = values.len(), "gathered argument values");
        Ok(self.definitions.arena().assemble(values)?)
    }
}

fn argument(def: &ArgumentDefinition) -> Arg {
    let arg = Arg::new(def.destination().as_str().to_owned())
        .long(def.long())
        .help(def.help().to_owned());
    match def.action() {
        Action::FlipToTrue => return arg.action(ArgAction::SetTrue),
        Action::FlipToFalse => return arg.action(ArgAction::SetFalse),
        Action::None => {}
    }

    let sized = match def.arity() {
        Some(Arity::Fixed(count)) => arg.num_args(count),
        Some(Arity::Variadic) => arg.num_args(1..),
        Some(Arity::Scalar) | None => arg.num_args(1),
    }
    .action(ArgAction::Set)
    .required(def.required())
    .allow_negative_numbers(true)
    .hide_default_value(true);

    let typed = match (def.choices(), def.value_hint()) {
        (Some(choices), _) => sized.value_parser(PossibleValuesParser::new(choices.to_vec())),
        (None, Some(hints)) => sized
            .value_parser(ValueParser::string())
            .value_names(hints.to_vec()),
        (None, None) => sized.value_parser(ValueParser::string()),
    };
    match def.default_tokens().map(crate::definition::DefaultKind::tokens) {
        Some(tokens) if !tokens.is_empty() => typed.default_values(tokens),
        _ => typed,
    }
}

fn gather(
    cmd: &mut Command,
    def: &ArgumentDefinition,
    matches: &ArgMatches,
) -> ArgsResult<ArgValue> {
    let id = def.destination().as_str();
    if def.action() != Action::None {
        let flag = matches
            .try_get_one::<bool>(id)
            .map_err(|err| lookup_failure(cmd, def.destination(), &err))?;
        return Ok(ArgValue::Bool(flag.copied().unwrap_or(def.action() == Action::FlipToFalse)));
    }

    let tokens = matches
        .try_get_many::<String>(id)
        .map_err(|err| lookup_failure(cmd, def.destination(), &err))?
        .map(|values| values.cloned().collect::<Vec<_>>());
    match (tokens, def.instantiator()) {
        (Some(raw), Some(instantiator)) => instantiator
            .instantiate(&raw)
            .map_err(|err| rejected(cmd, def, err)),
        (None, _) => fallback(cmd, def),
        (Some(_), None) => Err(ArgsError::Usage(Box::new(cmd.error(
            ErrorKind::ArgumentConflict,
            format!("{} has no value conversion", def.flag()),
        )))),
    }
}

/// Value of an argument the user did not supply and clap had no tokens for.
fn fallback(cmd: &mut Command, def: &ArgumentDefinition) -> ArgsResult<ArgValue> {
    if let Some(default) = def.default() {
        return Ok(default.clone());
    }
    if def.is_optional() {
        return Ok(ArgValue::Absent);
    }
    let flag = def.flag();
    let err = cmd.error(
        ErrorKind::MissingRequiredArgument,
        format!("the following required argument was not provided: {flag}"),
    );
    Err(ArgsError::MissingRequired {
        flag,
        source: Box::new(err),
    })
}

fn rejected(cmd: &mut Command, def: &ArgumentDefinition, err: InstantiateError) -> ArgsError {
    let flag = def.flag();
    let message = format!("invalid value for '{flag}': {err}");
    match err {
        InstantiateError::InvalidChoice { value, .. } => ArgsError::InvalidChoice {
            source: Box::new(cmd.error(ErrorKind::InvalidValue, message)),
            flag,
            value,
        },
        InstantiateError::Conversion { value, reason, .. } => ArgsError::Conversion {
            source: Box::new(cmd.error(ErrorKind::ValueValidation, message)),
            flag,
            value,
            reason,
        },
        InstantiateError::Arity { .. } => {
            ArgsError::Usage(Box::new(cmd.error(ErrorKind::WrongNumberOfValues, message)))
        }
    }
}

fn lookup_failure(
    cmd: &mut Command,
    destination: &DestinationKey,
    err: &clap::parser::MatchesError,
) -> ArgsError {
    ArgsError::Usage(Box::new(cmd.error(
        ErrorKind::ArgumentConflict,
        format!("cannot read parsed value for '{destination}': {err}"),
    )))
}

#[cfg(test)]
mod tests;
