//! Error types for staff validation and access control.

use super::{Capability, EmployeeId};
use thiserror::Error;

/// Errors returned while constructing staff values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StaffDomainError {
    /// The employee identifier is not positive.
    #[error("invalid employee id {0}, expected a positive integer")]
    InvalidEmployeeId(i64),

    /// The employee identifier is not a number.
    #[error("invalid employee id '{0}', expected a positive integer")]
    UnparseableEmployeeId(String),

    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Error returned while parsing roles from persistence or configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// The actor lacks a capability required by the operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PermissionDenied {
    /// The actor's role does not grant the capability.
    #[error("employee {employee_id} is not allowed to {capability}")]
    MissingCapability {
        /// Acting employee.
        employee_id: EmployeeId,
        /// Capability that was required.
        capability: Capability,
    },

    /// The actor may only touch jobs assigned to them.
    #[error("employee {employee_id} is not assigned to this job")]
    NotAssignee {
        /// Acting employee.
        employee_id: EmployeeId,
    },
}
