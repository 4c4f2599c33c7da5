//! Command implementations

pub mod config;
pub mod locate;
pub mod menu;
pub mod prefs;
pub mod quote;
pub mod search;
pub mod set_location;

use std::fmt;

/// Bad command-line input that clap cannot catch on its own
#[derive(Debug)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

/// Shorthand for `Err(UsageError(..).into())`
pub fn usage<T>(message: impl Into<String>) -> anyhow::Result<T> {
    Err(UsageError(message.into()).into())
}
