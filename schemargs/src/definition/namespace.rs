//! Flag spellings, destination keys and collision detection.

use std::collections::HashSet;
use std::fmt;

use crate::error::{ArgsError, ArgsResult};

/// Internal identifier routing parsed tokens back to a field.
///
/// A key is the dotted namespace of the declaring record followed by the
/// field identifier, e.g. `b.y`. Boolean renaming never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationKey(String);

impl DestinationKey {
    /// Key for `field` declared under `prefix`.
    #[must_use]
    pub fn new(prefix: &str, field: &str) -> Self {
        Self(format!("{prefix}{field}"))
    }

    /// The key as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Long flag (without the leading `--`) for a visible `name` under `prefix`.
#[must_use]
pub fn long_flag(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}").replace('_', "-")
}

/// Flags the parser defines on its own.
const RESERVED_LONGS: &[&str] = &["help"];

/// Tracks destinations and flags already claimed by a definition set.
#[derive(Debug, Default)]
pub(crate) struct Namespace {
    destinations: HashSet<DestinationKey>,
    longs: HashSet<String>,
}

impl Namespace {
    /// Claims a destination and its flag.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::DestinationCollision`] when either is taken.
    pub(crate) fn claim(&mut self, destination: &DestinationKey, long: &str) -> ArgsResult<()> {
        if !self.destinations.insert(destination.clone()) {
            return Err(ArgsError::DestinationCollision {
                key: destination.to_string(),
            });
        }
        if RESERVED_LONGS.contains(&long) || !self.longs.insert(long.to_owned()) {
            return Err(ArgsError::DestinationCollision {
                key: format!("--{long}"),
            });
        }
        Ok(())
    }
}
