//! Assignment status.

use super::ParseAssignmentStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an assignment still binds its employee for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// The employee is booked on the job for the day.
    Active,
    /// The job was finished or archived.
    Completed,
    /// The job was unassigned or moved to someone else.
    Released,
}

impl AssignmentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Released => "released",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = ParseAssignmentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "released" => Ok(Self::Released),
            _ => Err(ParseAssignmentStatusError(value.to_owned())),
        }
    }
}
