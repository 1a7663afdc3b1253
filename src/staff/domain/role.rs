//! Roles and the capability sets they grant.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Crew role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Field worker who carries out assigned jobs.
    Employee,
    /// Creates, assigns and oversees jobs.
    Director,
    /// Tester account; privileged only in developer mode.
    Developer,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Director => "director",
            Self::Developer => "developer",
        }
    }

    /// Returns the capabilities granted by this role.
    ///
    /// Developers receive every capability when `developer_mode` is enabled
    /// and act as plain employees otherwise.
    #[must_use]
    pub const fn capabilities(self, developer_mode: bool) -> CapabilitySet {
        match self {
            Self::Employee => CapabilitySet::EMPLOYEE,
            Self::Director => CapabilitySet::DIRECTOR,
            Self::Developer if developer_mode => CapabilitySet::ALL,
            Self::Developer => CapabilitySet::EMPLOYEE,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "employee" => Ok(Self::Employee),
            "director" => Ok(Self::Director),
            "developer" | "dev" => Ok(Self::Developer),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// A single permission checked by services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create new jobs.
    CreateJob,
    /// Assign and unassign jobs.
    AssignJob,
    /// Move an assigned job to in progress.
    StartJob,
    /// Mark an in-progress job completed.
    CompleteJob,
    /// Attach photos to a job.
    UploadPhoto,
    /// Append to a job's note log.
    AddNote,
    /// Edit the director notes field.
    EditDirectorNotes,
    /// Move a job to any non-archived status.
    OverrideTransition,
    /// Act on jobs assigned to someone else.
    ViewAllJobs,
    /// View the daily dashboard.
    ViewDashboard,
}

impl Capability {
    const fn bit(self) -> u16 {
        match self {
            Self::CreateJob => 1,
            Self::AssignJob => 1 << 1,
            Self::StartJob => 1 << 2,
            Self::CompleteJob => 1 << 3,
            Self::UploadPhoto => 1 << 4,
            Self::AddNote => 1 << 5,
            Self::EditDirectorNotes => 1 << 6,
            Self::OverrideTransition => 1 << 7,
            Self::ViewAllJobs => 1 << 8,
            Self::ViewDashboard => 1 << 9,
        }
    }

    /// Returns a human-readable verb phrase.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::CreateJob => "create jobs",
            Self::AssignJob => "assign jobs",
            Self::StartJob => "start jobs",
            Self::CompleteJob => "complete jobs",
            Self::UploadPhoto => "upload photos",
            Self::AddNote => "add notes",
            Self::EditDirectorNotes => "edit director notes",
            Self::OverrideTransition => "override job status",
            Self::ViewAllJobs => "act on other employees' jobs",
            Self::ViewDashboard => "view the dashboard",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Set of capabilities held by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    /// No capabilities.
    pub const EMPTY: Self = Self(0);

    /// Capabilities of a field employee.
    pub const EMPLOYEE: Self = Self::EMPTY
        .with(Capability::StartJob)
        .with(Capability::CompleteJob)
        .with(Capability::UploadPhoto)
        .with(Capability::AddNote);

    /// Capabilities of a director.
    pub const DIRECTOR: Self = Self::EMPTY
        .with(Capability::CreateJob)
        .with(Capability::AssignJob)
        .with(Capability::StartJob)
        .with(Capability::CompleteJob)
        .with(Capability::UploadPhoto)
        .with(Capability::AddNote)
        .with(Capability::EditDirectorNotes)
        .with(Capability::OverrideTransition)
        .with(Capability::ViewAllJobs)
        .with(Capability::ViewDashboard);

    /// Every capability.
    pub const ALL: Self = Self::DIRECTOR;

    /// Returns a copy with `capability` added.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    /// Returns a copy with `capability` removed.
    #[must_use]
    pub const fn without(self, capability: Capability) -> Self {
        Self(self.0 & !capability.bit())
    }

    /// Returns whether `capability` is in the set.
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
