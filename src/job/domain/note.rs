//! Append-only job notes.

use super::JobDomainError;
use crate::staff::domain::{EmployeeId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a job's note log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobNote {
    author: EmployeeId,
    author_name: String,
    author_role: Role,
    text: String,
    created_at: DateTime<Utc>,
}

impl JobNote {
    /// Creates a note.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::EmptyNote`] when the trimmed text is empty.
    pub fn new(
        author: EmployeeId,
        author_name: impl Into<String>,
        author_role: Role,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, JobDomainError> {
        let raw = text.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(JobDomainError::EmptyNote);
        }
        Ok(Self {
            author,
            author_name: author_name.into(),
            author_role,
            text: trimmed.to_owned(),
            created_at,
        })
    }

    /// Returns the author's identifier.
    #[must_use]
    pub const fn author(&self) -> EmployeeId {
        self.author
    }

    /// Returns the author's display name at the time of writing.
    #[must_use]
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    /// Returns the author's role at the time of writing.
    #[must_use]
    pub const fn author_role(&self) -> Role {
        self.author_role
    }

    /// Returns the note text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the note was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
