//! Errors raised while parsing inbound commands.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors for command parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandParseError {
    /// Input was empty.
    #[error("command input cannot be empty")]
    EmptyInput,

    /// Input does not start with `/`.
    #[error("commands must start with '/'")]
    MissingLeadingSlash,

    /// The command name is not recognised.
    #[error("unknown command '/{0}'")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("/{command} needs a {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Missing argument name.
        argument: &'static str,
    },

    /// An argument could not be parsed.
    #[error("invalid {argument} '{value}' for /{command}: {reason}")]
    InvalidArgument {
        /// Command name.
        command: &'static str,
        /// Argument name.
        argument: &'static str,
        /// Raw value supplied.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// More arguments were supplied than the command accepts.
    #[error("unexpected argument '{token}' for /{command}")]
    UnexpectedArgument {
        /// Command name.
        command: &'static str,
        /// First surplus token.
        token: String,
    },

    /// A `key=value` site detail used an unknown key.
    #[error("unknown site detail '{0}'")]
    UnknownDetail(String),

    /// A quoted value was not terminated.
    #[error("unterminated quoted value")]
    UnterminatedQuotedValue,
}

impl CommandParseError {
    /// Parse failures are always validation errors.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
