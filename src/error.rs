//! Error classification shared by every bounded context.
//!
//! Each context keeps its own `thiserror` enums; [`ErrorKind`] is the coarse
//! taxonomy the request boundary uses to decide how a failure is reported.

use std::fmt;

/// Coarse category of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input failed validation.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// The request lost a race or collides with an existing assignment.
    Conflict,
    /// A bounded collection is full.
    Capacity,
    /// The requested status change is not permitted by the state machine.
    InvalidTransition,
    /// The operation is not allowed in the record's current state.
    InvalidState,
    /// The actor lacks the capability for the operation.
    PermissionDenied,
    /// Persistence failed; the request may be retried later.
    Storage,
}

impl ErrorKind {
    /// Returns a stable snake-case label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Capacity => "capacity",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidState => "invalid_state",
            Self::PermissionDenied => "permission_denied",
            Self::Storage => "storage",
        }
    }

    /// Returns whether the failure is transient and worth retrying.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Storage)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
