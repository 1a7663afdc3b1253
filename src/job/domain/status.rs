//! Job lifecycle status and its state machine.

use super::ParseJobStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created and waiting for an assignee.
    Pending,
    /// Bound to an employee for a day.
    Assigned,
    /// Work has started on site.
    InProgress,
    /// Work is finished.
    Completed,
    /// Swept out of the active set by the daily reset.
    Archived,
}

impl JobStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Assigned,
        Self::InProgress,
        Self::Completed,
        Self::Archived,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Returns the single forward successor, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Assigned),
            Self::Assigned => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => Some(Self::Archived),
            Self::Archived => None,
        }
    }

    /// Returns whether `target` is the next forward step.
    ///
    /// `completed → archived` is a forward step, but only the daily reset may
    /// take it; see [`Self::is_reset_only`].
    #[must_use]
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Returns whether the status can only be reached by the daily reset.
    #[must_use]
    pub const fn is_reset_only(self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Returns whether work on the job has begun.
    #[must_use]
    pub const fn is_started(self) -> bool {
        matches!(self, Self::InProgress | Self::Completed | Self::Archived)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}
