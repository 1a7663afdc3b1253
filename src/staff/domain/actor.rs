//! The identity and capabilities behind an inbound request.

use super::{Capability, CapabilitySet, DisplayName, Employee, EmployeeId, PermissionDenied, Role};

/// Authenticated caller of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    employee_id: EmployeeId,
    display_name: DisplayName,
    role: Role,
    capabilities: CapabilitySet,
}

impl Actor {
    /// Creates an actor with an explicit capability set.
    #[must_use]
    pub const fn new(
        employee_id: EmployeeId,
        display_name: DisplayName,
        role: Role,
        capabilities: CapabilitySet,
    ) -> Self {
        Self {
            employee_id,
            display_name,
            role,
            capabilities,
        }
    }

    /// Creates an actor for an employee using the role's capabilities.
    #[must_use]
    pub fn for_employee(employee: &Employee, developer_mode: bool) -> Self {
        Self::new(
            employee.id(),
            employee.display_name().clone(),
            employee.role(),
            employee.role().capabilities(developer_mode),
        )
    }

    /// Returns the acting employee's identifier.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns the acting employee's display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the acting employee's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the capability set.
    #[must_use]
    pub const fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Returns whether the actor holds `capability`.
    #[must_use]
    pub const fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Requires `capability`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionDenied::MissingCapability`] when the capability is
    /// not held.
    pub const fn require(&self, capability: Capability) -> Result<(), PermissionDenied> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(PermissionDenied::MissingCapability {
                employee_id: self.employee_id,
                capability,
            })
        }
    }

    /// Requires that the actor may act on a job held by `assignee`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionDenied::NotAssignee`] when the job belongs to
    /// someone else (or nobody) and the actor cannot act on other jobs.
    pub fn require_assignee(&self, assignee: Option<EmployeeId>) -> Result<(), PermissionDenied> {
        if self.can(Capability::ViewAllJobs) || assignee == Some(self.employee_id) {
            return Ok(());
        }
        Err(PermissionDenied::NotAssignee {
            employee_id: self.employee_id,
        })
    }
}
