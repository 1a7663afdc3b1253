//! Assignment record binding an employee to a job for a day.

use super::{AssignmentDomainError, AssignmentStatus};
use crate::job::domain::JobId;
use crate::staff::domain::EmployeeId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Creates a new random assignment identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binds an employee to a job for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    id: AssignmentId,
    employee_id: EmployeeId,
    job_id: JobId,
    day: NaiveDate,
    status: AssignmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignmentData {
    /// Persisted identifier.
    pub id: AssignmentId,
    /// Bound employee.
    pub employee_id: EmployeeId,
    /// Bound job.
    pub job_id: JobId,
    /// Day of work.
    pub day: NaiveDate,
    /// Persisted status.
    pub status: AssignmentStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates an active assignment.
    #[must_use]
    pub fn new(employee_id: EmployeeId, job_id: JobId, day: NaiveDate, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AssignmentId::new(),
            employee_id,
            job_id,
            day,
            status: AssignmentStatus::Active,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            id: data.id,
            employee_id: data.employee_id,
            job_id: data.job_id,
            day: data.day,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub const fn id(&self) -> AssignmentId {
        self.id
    }

    /// Returns the bound employee.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns the bound job.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the day of work.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> AssignmentStatus {
        self.status
    }

    /// Returns whether the assignment still books the employee.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, AssignmentStatus::Active)
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

    /// Marks the assignment completed.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentDomainError::NotActive`] unless active.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), AssignmentDomainError> {
        self.close(AssignmentStatus::Completed, clock)
    }

    /// Marks the assignment released.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentDomainError::NotActive`] unless active.
    pub fn release(&mut self, clock: &impl Clock) -> Result<(), AssignmentDomainError> {
        self.close(AssignmentStatus::Released, clock)
    }

    /// Moves an active assignment to another day.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentDomainError::NotActive`] unless active.
    pub fn redate(&mut self, day: NaiveDate, clock: &impl Clock) -> Result<(), AssignmentDomainError> {
        self.ensure_active()?;
        self.day = day;
        self.updated_at = clock.utc();
        Ok(())
    }

    fn close(&mut self, status: AssignmentStatus, clock: &impl Clock) -> Result<(), AssignmentDomainError> {
        self.ensure_active()?;
        self.status = status;
        self.updated_at = clock.utc();
        Ok(())
    }

    const fn ensure_active(&self) -> Result<(), AssignmentDomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(AssignmentDomainError::NotActive {
                assignment_id: self.id,
                status: self.status,
            })
        }
    }
}
