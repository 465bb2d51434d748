//! Constructors and classification helpers for [`ArgsError`] and the
//! parser errors it wraps.

use clap::error::{ContextKind, ContextValue, ErrorKind};

use super::ArgsError;

impl ArgsError {
    /// Classifies an error reported by the parser itself.
    ///
    /// Missing required arguments and rejected choices get their own
    /// variants; everything else is [`ArgsError::Usage`].
    #[must_use]
    pub fn from_clap(err: clap::Error) -> Self {
        let flag = context_text(&err, ContextKind::InvalidArg);
        let value = context_text(&err, ContextKind::InvalidValue);
        let has_choices = err.get(ContextKind::ValidValue).is_some();
        match (err.kind(), flag, value) {
            (ErrorKind::MissingRequiredArgument, Some(missing), _) => Self::MissingRequired {
                flag: missing,
                source: Box::new(err),
            },
            (ErrorKind::InvalidValue, Some(invalid), Some(rejected)) if has_choices => {
                Self::InvalidChoice {
                    flag: invalid,
                    value: rejected,
                    source: Box::new(err),
                }
            }
            _ => Self::Usage(Box::new(err)),
        }
    }

    /// Returns `true` for failures caused by the record type rather than by
    /// command-line input.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. }
                | Self::DestinationCollision { .. }
                | Self::CyclicSchema { .. }
                | Self::Value(_)
        )
    }

    /// The parser error behind a parse-time failure.
    #[must_use]
    pub fn clap_error(&self) -> Option<&clap::Error> {
        match self {
            Self::InvalidChoice { source, .. }
            | Self::Conversion { source, .. }
            | Self::MissingRequired { source, .. }
            | Self::Usage(source) => Some(source),
            Self::UnsupportedType { .. }
            | Self::DestinationCollision { .. }
            | Self::CyclicSchema { .. }
            | Self::Value(_) => None,
        }
    }

    /// Reports the error and terminates the process.
    ///
    /// Parse-time errors are printed by clap with its usage tail and exit
    /// status (2 for errors, 0 for `--help`).
    ///
    /// # Panics
    ///
    /// Panics for schema errors, which indicate a record type that can never
    /// be parsed.
    pub fn exit(self) -> ! {
        match self.clap_error() {
            Some(err) => err.exit(),
            None => panic!("invalid argument schema: {self}"),
        }
    }
}

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// Callers using [`crate::try_parse_from`] should hand these to
/// [`clap::Error::exit`] to keep the zero exit status.
#[must_use]
pub fn is_display_request(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

fn context_text(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(text) => Some(text.clone()),
        ContextValue::Strings(texts) => Some(texts.join(", ")),
        ContextValue::StyledStr(styled) => Some(styled.to_string()),
        _ => None,
    }
}
