//! Error types produced while building and parsing argument schemas.

mod constructors;
mod types;

pub use constructors::is_display_request;
pub use types::{ArgsError, ArgsResult};
