//! Repository port for assignment persistence.

use crate::assignment::domain::{Assignment, AssignmentId};
use crate::job::domain::JobId;
use crate::retry::Transient;
use crate::staff::domain::EmployeeId;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for assignment repository operations.
pub type AssignmentRepositoryResult<T> = Result<T, AssignmentRepositoryError>;

/// Assignment persistence contract.
///
/// Implementations enforce at most one active assignment per
/// (employee, day) and per job.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Inserts a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::ActiveAssignmentExists`] or
    /// [`AssignmentRepositoryError::JobAlreadyBound`] when an active
    /// assignment would collide.
    async fn insert(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()>;

    /// Replaces the stored assignment with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::NotFound`] for unknown
    /// assignments, or a collision error when re-dating onto a booked day.
    async fn update(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()>;

    /// Finds the active assignment for a job.
    async fn find_active_for_job(&self, job_id: JobId) -> AssignmentRepositoryResult<Option<Assignment>>;

    /// Finds the active assignment booking `employee_id` on `day`.
    async fn find_active_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentRepositoryResult<Option<Assignment>>;

    /// Lists every assignment of `employee_id` on `day`, any status.
    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentRepositoryResult<Vec<Assignment>>;
}

/// Errors returned by assignment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentRepositoryError {
    /// The employee already has an active assignment that day.
    #[error("employee {employee_id} already has an active assignment on {day}")]
    ActiveAssignmentExists {
        /// Booked employee.
        employee_id: EmployeeId,
        /// Booked day.
        day: NaiveDate,
    },

    /// The job already has an active assignment.
    #[error("job {0} already has an active assignment")]
    JobAlreadyBound(JobId),

    /// The assignment to update does not exist.
    #[error("assignment not found: {0}")]
    NotFound(AssignmentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssignmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Transient for AssignmentRepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
