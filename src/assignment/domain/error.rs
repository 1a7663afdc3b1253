//! Error types for assignment records.

use super::{AssignmentId, AssignmentStatus};
use thiserror::Error;

/// Errors returned by assignment domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignmentDomainError {
    /// Only active assignments can change.
    #[error("assignment {assignment_id} is {status}")]
    NotActive {
        /// Assignment identifier.
        assignment_id: AssignmentId,
        /// Current status.
        status: AssignmentStatus,
    },
}

/// Error returned while parsing assignment statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignment status: {0}")]
pub struct ParseAssignmentStatusError(pub String);
