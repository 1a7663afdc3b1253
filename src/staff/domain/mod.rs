//! Domain model for crew members, roles and access control.

mod actor;
mod employee;
mod error;
mod ids;
mod role;
mod roster;

pub use actor::Actor;
pub use employee::{Employee, PersistedEmployeeData};
pub use error::{ParseRoleError, PermissionDenied, StaffDomainError};
pub use ids::{DisplayName, EmployeeId};
pub use role::{Capability, CapabilitySet, Role};
pub use roster::RosterEntry;
