//! Employee aggregate.

use super::{DisplayName, EmployeeId, Role};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A crew member known to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    display_name: DisplayName,
    role: Role,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedEmployeeData {
    /// Persisted identifier.
    pub id: EmployeeId,
    /// Persisted display name.
    pub display_name: DisplayName,
    /// Persisted role.
    pub role: Role,
    /// Whether the employee is on the current roster.
    pub active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Creates a new active employee.
    #[must_use]
    pub fn new(id: EmployeeId, display_name: DisplayName, role: Role, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            display_name,
            role,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an employee from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedEmployeeData) -> Self {
        Self {
            id: data.id,
            display_name: data.display_name,
            role: data.role,
            active: data.active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the employee identifier.
    #[must_use]
    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the employee is on the current roster.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies roster data, reactivating the employee if needed.
    ///
    /// Returns `true` when anything changed.
    pub fn apply_roster(&mut self, display_name: DisplayName, role: Role, clock: &impl Clock) -> bool {
        let changed = self.display_name != display_name || self.role != role || !self.active;
        if changed {
            self.display_name = display_name;
            self.role = role;
            self.active = true;
            self.updated_at = clock.utc();
        }
        changed
    }

    /// Marks the employee as no longer on the roster.
    ///
    /// Returns `true` when the employee was active.
    pub fn deactivate(&mut self, clock: &impl Clock) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.updated_at = clock.utc();
        true
    }
}
