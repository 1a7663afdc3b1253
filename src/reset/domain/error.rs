//! Error types for reset configuration values.

use thiserror::Error;

/// Errors returned while constructing reset values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResetDomainError {
    /// The boundary time is not a valid `HH:MM` value.
    #[error("invalid reset time '{0}', expected HH:MM")]
    InvalidBoundary(String),
}
