//! Error types for job domain validation and lifecycle rules.

use super::{JobId, JobStatus};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by job domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The site name is empty after trimming.
    #[error("site name must not be empty")]
    EmptySiteName,

    /// The photo reference is empty after trimming.
    #[error("photo reference must not be empty")]
    EmptyPhotoRef,

    /// The note text is empty after trimming.
    #[error("note must not be empty")]
    EmptyNote,

    /// The job identifier could not be parsed.
    #[error("invalid job id '{0}'")]
    InvalidJobId(String),

    /// The job already holds the maximum number of photos.
    #[error("job {job_id} already has the maximum of {limit} photos")]
    PhotoLimitReached {
        /// Job identifier.
        job_id: JobId,
        /// Configured photo limit.
        limit: usize,
    },

    /// The requested status change violates the state machine.
    #[error("job {job_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Job identifier.
        job_id: JobId,
        /// Current status.
        from: JobStatus,
        /// Requested status.
        to: JobStatus,
    },

    /// The job must have an assignee for the requested status.
    #[error("job {0} has no assignee")]
    MissingAssignee(JobId),

    /// Only jobs that have not started can be released.
    #[error("job {job_id} is {status} and can no longer be unassigned")]
    NotReleasable {
        /// Job identifier.
        job_id: JobId,
        /// Current status.
        status: JobStatus,
    },

    /// Only pending or assigned jobs can be carried to another day.
    #[error("job {job_id} is {status} and cannot be carried forward")]
    NotCarriable {
        /// Job identifier.
        job_id: JobId,
        /// Current status.
        status: JobStatus,
    },

    /// Archived jobs are read-only.
    #[error("job {0} is archived")]
    JobArchived(JobId),
}

impl JobDomainError {
    /// Classifies the error for the request boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySiteName | Self::EmptyPhotoRef | Self::EmptyNote | Self::InvalidJobId(_) => {
                ErrorKind::Validation
            }
            Self::PhotoLimitReached { .. } => ErrorKind::Capacity,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidTransition,
            Self::MissingAssignee(_)
            | Self::NotReleasable { .. }
            | Self::NotCarriable { .. }
            | Self::JobArchived(_) => ErrorKind::InvalidState,
        }
    }
}

/// Error returned while parsing job statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);
