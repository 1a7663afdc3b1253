//! Configured roster entries.

use super::{DisplayName, EmployeeId, Role};

/// One configured crew member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Messaging user identifier.
    pub id: EmployeeId,
    /// Name shown in replies.
    pub display_name: DisplayName,
    /// Configured role.
    pub role: Role,
}

impl RosterEntry {
    /// Creates a roster entry.
    #[must_use]
    pub const fn new(id: EmployeeId, display_name: DisplayName, role: Role) -> Self {
        Self {
            id,
            display_name,
            role,
        }
    }
}
