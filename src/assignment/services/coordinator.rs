//! Binds employees to jobs for a day and keeps job state in step.
//!
//! A write that touches both an assignment and its job happens under the
//! job's lock. When the second write fails, the first is undone.

use crate::assignment::{
    domain::{Assignment, AssignmentDomainError, JobListing},
    ports::{AssignmentRepository, AssignmentRepositoryError},
};
use crate::error::ErrorKind;
use crate::job::{
    domain::{Job, JobDomainError, JobId, JobStatus},
    ports::JobRepository,
    services::{JobRegistryError, JobRegistryService},
};
use crate::locks::JobGuard;
use crate::retry::RetryPolicy;
use crate::staff::{
    domain::{Actor, Capability, EmployeeId, PermissionDenied},
    ports::EmployeeRepository,
    services::{StaffDirectory, StaffError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for assignment operations.
#[derive(Debug, Error)]
pub enum AssignmentError {
    /// A job rule failed.
    #[error(transparent)]
    Job(#[from] JobRegistryError),

    /// An employee lookup failed.
    #[error(transparent)]
    Staff(#[from] StaffError),

    /// An assignment record rule failed.
    #[error(transparent)]
    Domain(#[from] AssignmentDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AssignmentRepositoryError),

    /// The actor may not perform the operation.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The employee is already booked for the day.
    #[error("employee {employee_id} already has an active job on {day}")]
    EmployeeBusy {
        /// Requested employee.
        employee_id: EmployeeId,
        /// Requested day.
        day: NaiveDate,
    },

    /// The job was taken or moved on before this request.
    #[error("job {job_id} is {status}, not pending")]
    JobNotPending {
        /// Requested job.
        job_id: JobId,
        /// Status found.
        status: JobStatus,
    },

    /// The job has started and can no longer be unassigned.
    #[error("job {job_id} is already {status}")]
    JobAlreadyStarted {
        /// Requested job.
        job_id: JobId,
        /// Status found.
        status: JobStatus,
    },

    /// No active assignment binds the employee to the job.
    #[error("employee {employee_id} is not assigned to job {job_id}")]
    NoActiveAssignment {
        /// Requested employee.
        employee_id: EmployeeId,
        /// Requested job.
        job_id: JobId,
    },
}

impl From<JobDomainError> for AssignmentError {
    fn from(err: JobDomainError) -> Self {
        Self::Job(JobRegistryError::Domain(err))
    }
}

impl AssignmentError {
    /// Classifies the error for the request boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Job(err) => err.kind(),
            Self::Staff(err) => err.kind(),
            Self::Domain(_) | Self::JobAlreadyStarted { .. } => ErrorKind::InvalidState,
            Self::Repository(AssignmentRepositoryError::NotFound(_))
            | Self::NoActiveAssignment { .. } => ErrorKind::NotFound,
            Self::Repository(
                AssignmentRepositoryError::ActiveAssignmentExists { .. }
                | AssignmentRepositoryError::JobAlreadyBound(_),
            )
            | Self::EmployeeBusy { .. }
            | Self::JobNotPending { .. } => ErrorKind::Conflict,
            Self::Repository(AssignmentRepositoryError::Persistence(_)) => ErrorKind::Storage,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
        }
    }
}

/// Result type for assignment operations.
pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// What carrying a job to a new day did to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryOutcome {
    /// The job moved with its assignee, if any.
    Carried,
    /// The assignee was already booked on the new day; the job moved as
    /// pending.
    Released,
}

/// Assignment coordinator service.
pub struct AssignmentCoordinator<J, A, S, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
{
    jobs: JobRegistryService<J, C>,
    staff: StaffDirectory<S, C>,
    assignments: Arc<A>,
    clock: Arc<C>,
    retry: RetryPolicy,
}

impl<J, A, S, C> Clone for AssignmentCoordinator<J, A, S, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            staff: self.staff.clone(),
            assignments: Arc::clone(&self.assignments),
            clock: Arc::clone(&self.clock),
            retry: self.retry,
        }
    }
}

impl<J, A, S, C> AssignmentCoordinator<J, A, S, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator over the registry and staff directory.
    #[must_use]
    pub fn new(
        jobs: JobRegistryService<J, C>,
        staff: StaffDirectory<S, C>,
        assignments: Arc<A>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            jobs,
            staff,
            assignments,
            clock,
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the storage retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the job registry this coordinator writes through.
    #[must_use]
    pub const fn jobs(&self) -> &JobRegistryService<J, C> {
        &self.jobs
    }

    /// Returns the staff directory used for employee lookups.
    #[must_use]
    pub const fn staff(&self) -> &StaffDirectory<S, C> {
        &self.staff
    }

    /// Binds `employee_id` to `job_id` for `day`.
    ///
    /// The job moves to assigned and its scheduled day becomes `day`.
    /// Concurrent requests for the same job serialise on its lock; the loser
    /// finds the job no longer pending.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::EmployeeBusy`] or
    /// [`AssignmentError::JobNotPending`] on conflicts, and not-found errors
    /// for unknown employees or jobs.
    pub async fn assign(
        &self,
        actor: &Actor,
        employee_id: EmployeeId,
        job_id: JobId,
        day: NaiveDate,
    ) -> AssignmentResult<Assignment> {
        actor.require(Capability::AssignJob)?;
        self.staff.require_active(employee_id).await?;
        if self.employee_booked(employee_id, day, None).await? {
            return Err(AssignmentError::EmployeeBusy { employee_id, day });
        }

        let guard = self.jobs.lock(job_id).await;
        let mut job = self.jobs.get(job_id).await?;
        if job.status() != JobStatus::Pending {
            return Err(AssignmentError::JobNotPending {
                job_id,
                status: job.status(),
            });
        }
        self.release_stale_for_job(job_id).await?;
        job.assign_to(employee_id, day, &*self.clock)?;

        let mut assignment = Assignment::new(employee_id, job_id, day, &*self.clock);
        self.retry
            .run("assignments.insert", || self.assignments.insert(&assignment))
            .await
            .map_err(|err| match err {
                AssignmentRepositoryError::ActiveAssignmentExists { .. } => {
                    AssignmentError::EmployeeBusy { employee_id, day }
                }
                other => AssignmentError::Repository(other),
            })?;

        if let Err(err) = self.jobs.save(&guard, &job).await {
            assignment.release(&*self.clock)?;
            self.compensate_assignment(&assignment).await;
            return Err(err.into());
        }

        tracing::info!(
            job_id = %job_id,
            employee_id = %employee_id,
            day = %day,
            assigned_by = %actor.employee_id(),
            "job assigned"
        );
        Ok(assignment)
    }

    /// Reverts a job to pending and frees the employee.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::NoActiveAssignment`] when no active
    /// assignment binds the pair, or [`AssignmentError::JobAlreadyStarted`]
    /// once work has begun.
    pub async fn unassign(
        &self,
        actor: &Actor,
        employee_id: EmployeeId,
        job_id: JobId,
    ) -> AssignmentResult<Job> {
        actor.require(Capability::AssignJob)?;
        let guard = self.jobs.lock(job_id).await;
        let original = self.jobs.get(job_id).await?;
        let mut assignment = self
            .active_for_job(job_id)
            .await?
            .filter(|assignment| assignment.employee_id() == employee_id)
            .ok_or(AssignmentError::NoActiveAssignment {
                employee_id,
                job_id,
            })?;
        if original.status().is_started() {
            return Err(AssignmentError::JobAlreadyStarted {
                job_id,
                status: original.status(),
            });
        }

        let mut job = original.clone();
        if job.status() == JobStatus::Assigned {
            job.release(&*self.clock)?;
            self.jobs.save(&guard, &job).await?;
        }
        assignment.release(&*self.clock)?;
        if let Err(err) = self.update_assignment(&assignment).await {
            self.restore_job(&guard, &original).await;
            return Err(err);
        }

        tracing::info!(
            job_id = %job_id,
            employee_id = %employee_id,
            unassigned_by = %actor.employee_id(),
            "job unassigned"
        );
        Ok(job)
    }

    /// Lists the employee's non-archived jobs for `day`.
    ///
    /// Jobs are found through the employee's assignments on that day; a job
    /// is listed only while it is still scheduled for the day and held by
    /// the employee.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Repository`] or [`AssignmentError::Job`]
    /// when lookup fails.
    pub async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentResult<JobListing> {
        let bookings = self
            .retry
            .run("assignments.list_for_employee", || {
                self.assignments.list_for_employee(employee_id, day)
            })
            .await?;
        let mut jobs: Vec<Job> = Vec::with_capacity(bookings.len());
        for booking in bookings {
            if jobs.iter().any(|job| job.id() == booking.job_id()) {
                continue;
            }
            let Some(job) = self.jobs.find(booking.job_id()).await? else {
                continue;
            };
            if job.assignee() == Some(employee_id)
                && job.scheduled_day() == day
                && job.status() != JobStatus::Archived
            {
                jobs.push(job);
            }
        }
        jobs.sort_by_key(|job| (job.created_at(), job.id()));
        Ok(JobListing::new(employee_id, day, jobs))
    }

    /// Finishes a job and closes its assignment.
    ///
    /// # Errors
    ///
    /// See [`JobRegistryService::finish_job`].
    pub async fn finish_job(&self, actor: &Actor, job_id: JobId) -> AssignmentResult<Job> {
        let job = self.jobs.finish_job(actor, job_id).await?;
        if let Err(err) = self.complete_assignment(job_id).await {
            tracing::warn!(job_id = %job_id, error = %err, "assignment left open after completion");
        }
        Ok(job)
    }

    /// Marks the job's active assignment completed, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Repository`] when persistence fails.
    pub async fn complete_assignment(&self, job_id: JobId) -> AssignmentResult<()> {
        let Some(mut assignment) = self.active_for_job(job_id).await? else {
            return Ok(());
        };
        assignment.complete(&*self.clock)?;
        self.update_assignment(&assignment).await
    }

    /// Moves an unfinished job to `day`, flagging it overdue.
    ///
    /// An assigned job keeps its assignee, re-dated, unless the assignee is
    /// already booked on `day`; then the job is released to pending.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Job`] when the job is not pending or
    /// assigned, or when persistence fails.
    pub async fn carry_forward(&self, job_id: JobId, day: NaiveDate) -> AssignmentResult<CarryOutcome> {
        let guard = self.jobs.lock(job_id).await;
        let original = self.jobs.get(job_id).await?;
        let assignee = match (original.status(), original.assignee()) {
            (JobStatus::Assigned, Some(assignee)) => assignee,
            _ => {
                let mut job = original;
                job.carry_forward(day, &*self.clock)?;
                self.jobs.save(&guard, &job).await?;
                return Ok(CarryOutcome::Carried);
            }
        };

        let current = self.active_for_job(job_id).await?;
        let busy = self.employee_booked(assignee, day, Some(job_id)).await?;

        let mut job = original.clone();
        if busy {
            job.release(&*self.clock)?;
        }
        job.carry_forward(day, &*self.clock)?;
        self.jobs.save(&guard, &job).await?;

        let written = if busy {
            self.release_assignment(current).await
        } else {
            self.redate_assignment(current, assignee, job_id, day).await
        };
        match written {
            Ok(CarryOutcome::Released) if !busy => {
                let mut released = original;
                released.release(&*self.clock)?;
                released.carry_forward(day, &*self.clock)?;
                self.jobs.save(&guard, &released).await?;
                Ok(CarryOutcome::Released)
            }
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.restore_job(&guard, &original).await;
                Err(err)
            }
        }
    }

    /// Archives a completed job and closes its assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::Job`] unless the job is completed, or when
    /// persistence fails.
    pub async fn archive(&self, job_id: JobId) -> AssignmentResult<Job> {
        let guard = self.jobs.lock(job_id).await;
        let mut job = self.jobs.get(job_id).await?;
        job.archive(&*self.clock)?;
        self.jobs.save(&guard, &job).await?;
        if let Err(err) = self.complete_assignment(job_id).await {
            tracing::warn!(job_id = %job_id, error = %err, "assignment left open after archive");
        }
        Ok(job)
    }

    /// Returns whether `employee_id` is booked on `day` by a job other than
    /// `except`. Bookings whose job no longer holds the employee are closed
    /// on the way.
    async fn employee_booked(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
        except: Option<JobId>,
    ) -> AssignmentResult<bool> {
        match self.active_for_employee(employee_id, day).await? {
            Some(booking) if Some(booking.job_id()) != except => self.settle_booking(booking).await,
            _ => Ok(false),
        }
    }

    /// Returns whether `booking` still holds its employee; closes it
    /// otherwise. Holds the booked job's lock until the decision is written.
    async fn settle_booking(&self, mut booking: Assignment) -> AssignmentResult<bool> {
        let _guard = self.jobs.lock(booking.job_id()).await;
        let job = self.jobs.find(booking.job_id()).await?;
        let holds = job.as_ref().is_some_and(|found| {
            found.assignee() == Some(booking.employee_id())
                && found.scheduled_day() == booking.day()
                && matches!(found.status(), JobStatus::Assigned | JobStatus::InProgress)
        });
        if holds {
            return Ok(true);
        }
        let finished = job
            .as_ref()
            .is_some_and(|found| matches!(found.status(), JobStatus::Completed | JobStatus::Archived));
        if finished {
            booking.complete(&*self.clock)?;
        } else {
            booking.release(&*self.clock)?;
        }
        self.update_assignment(&booking).await?;
        tracing::debug!(
            job_id = %booking.job_id(),
            employee_id = %booking.employee_id(),
            status = %booking.status(),
            "stale assignment closed"
        );
        Ok(false)
    }

    /// Releases an active assignment left behind on a job that is pending
    /// again, for example after an override.
    async fn release_stale_for_job(&self, job_id: JobId) -> AssignmentResult<()> {
        let Some(mut stale) = self.active_for_job(job_id).await? else {
            return Ok(());
        };
        stale.release(&*self.clock)?;
        self.update_assignment(&stale).await
    }

    async fn release_assignment(&self, current: Option<Assignment>) -> AssignmentResult<CarryOutcome> {
        if let Some(mut assignment) = current {
            assignment.release(&*self.clock)?;
            self.update_assignment(&assignment).await?;
        }
        Ok(CarryOutcome::Released)
    }

    async fn redate_assignment(
        &self,
        current: Option<Assignment>,
        assignee: EmployeeId,
        job_id: JobId,
        day: NaiveDate,
    ) -> AssignmentResult<CarryOutcome> {
        let written = match current {
            Some(mut assignment) => {
                assignment.redate(day, &*self.clock)?;
                self.update_assignment(&assignment).await
            }
            None => {
                let assignment = Assignment::new(assignee, job_id, day, &*self.clock);
                self.retry
                    .run("assignments.insert", || self.assignments.insert(&assignment))
                    .await
                    .map_err(AssignmentError::from)
            }
        };
        match written {
            Ok(()) => Ok(CarryOutcome::Carried),
            Err(AssignmentError::Repository(AssignmentRepositoryError::ActiveAssignmentExists {
                ..
            })) => {
                let current = self.active_for_job(job_id).await?;
                self.release_assignment(current).await
            }
            Err(err) => Err(err),
        }
    }

    async fn active_for_job(&self, job_id: JobId) -> AssignmentResult<Option<Assignment>> {
        Ok(self
            .retry
            .run("assignments.find_active_for_job", || {
                self.assignments.find_active_for_job(job_id)
            })
            .await?)
    }

    async fn active_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentResult<Option<Assignment>> {
        Ok(self
            .retry
            .run("assignments.find_active_for_employee", || {
                self.assignments.find_active_for_employee(employee_id, day)
            })
            .await?)
    }

    async fn update_assignment(&self, assignment: &Assignment) -> AssignmentResult<()> {
        Ok(self
            .retry
            .run("assignments.update", || self.assignments.update(assignment))
            .await?)
    }

    async fn compensate_assignment(&self, assignment: &Assignment) {
        if let Err(err) = self.update_assignment(assignment).await {
            tracing::error!(
                assignment_id = %assignment.id(),
                error = %err,
                "failed to undo assignment after job write failure"
            );
        }
    }

    async fn restore_job(&self, guard: &JobGuard, original: &Job) {
        if let Err(err) = self.jobs.save(guard, original).await {
            tracing::error!(
                job_id = %original.id(),
                error = %err,
                "failed to restore job after assignment write failure"
            );
        }
    }
}
