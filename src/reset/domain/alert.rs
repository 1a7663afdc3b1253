//! Alerts raised when background work keeps failing.

use chrono::{DateTime, Utc};
use std::fmt;

/// Category of operational alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// The daily reset failed repeatedly.
    ResetFailing,
}

impl AlertKind {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResetFailing => "reset_failing",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert for operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalAlert {
    /// Alert category.
    pub kind: AlertKind,
    /// Human-readable summary including the last error.
    pub message: String,
    /// Failures in a row when the alert was raised.
    pub consecutive_failures: u32,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
}
