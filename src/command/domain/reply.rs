//! Outbound reply text.

use crate::error::ErrorKind;

/// Text sent back to the user, tagged with the failure kind when the
/// command did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    text: String,
    error: Option<ErrorKind>,
}

impl Reply {
    /// Creates a reply for a successful command.
    #[must_use]
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    /// Creates a reply for a failed command.
    #[must_use]
    pub fn failed(kind: ErrorKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: Some(kind),
        }
    }

    /// Returns the reply text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the failure kind, if the command failed.
    #[must_use]
    pub const fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Returns whether the command failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Consumes the reply and returns its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}
