//! Authoritative job state: creation, photos, notes and status changes.

use crate::error::ErrorKind;
use crate::job::{
    domain::{
        DEFAULT_PHOTO_LIMIT, DashboardSummary, Job, JobDomainError, JobId, JobNote, JobStatus,
        PhotoRef, SiteDetails,
    },
    ports::{JobRepository, JobRepositoryError},
};
use crate::locks::{JobGuard, JobLocks};
use crate::retry::RetryPolicy;
use crate::staff::domain::{Actor, Capability, PermissionDenied};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobRequest {
    scheduled_day: NaiveDate,
    site_name: String,
    address: Option<String>,
    area: Option<String>,
    gate_code: Option<String>,
    contact: Option<String>,
    map_link: Option<String>,
    director_notes: Option<String>,
}

impl CreateJobRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(scheduled_day: NaiveDate, site_name: impl Into<String>) -> Self {
        Self {
            scheduled_day,
            site_name: site_name.into(),
            address: None,
            area: None,
            gate_code: None,
            contact: None,
            map_link: None,
            director_notes: None,
        }
    }

    /// Sets the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the area description.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Sets the gate code.
    #[must_use]
    pub fn with_gate_code(mut self, gate_code: impl Into<String>) -> Self {
        self.gate_code = Some(gate_code.into());
        self
    }

    /// Sets the on-site contact.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Sets the map link.
    #[must_use]
    pub fn with_map_link(mut self, map_link: impl Into<String>) -> Self {
        self.map_link = Some(map_link.into());
        self
    }

    /// Sets the initial director notes.
    #[must_use]
    pub fn with_director_notes(mut self, notes: impl Into<String>) -> Self {
        self.director_notes = Some(notes.into());
        self
    }

    fn into_details(self) -> Result<(NaiveDate, SiteDetails, Option<String>), JobDomainError> {
        let mut details = SiteDetails::new(self.site_name)?;
        if let Some(address) = self.address {
            details = details.with_address(address);
        }
        if let Some(area) = self.area {
            details = details.with_area(area);
        }
        if let Some(gate_code) = self.gate_code {
            details = details.with_gate_code(gate_code);
        }
        if let Some(contact) = self.contact {
            details = details.with_contact(contact);
        }
        if let Some(map_link) = self.map_link {
            details = details.with_map_link(map_link);
        }
        Ok((self.scheduled_day, details, self.director_notes))
    }
}

/// Service-level errors for job registry operations.
#[derive(Debug, Error)]
pub enum JobRegistryError {
    /// Domain validation or lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] JobDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),

    /// The job does not exist.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// The actor may not perform the operation.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// A write was attempted without holding the job's lock.
    #[error("lock for job {0} is not held")]
    LockNotHeld(JobId),
}

impl JobRegistryError {
    /// Classifies the error for the request boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(JobRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(JobRepositoryError::DuplicateJob(_)) => ErrorKind::Conflict,
            Self::Repository(JobRepositoryError::Persistence(_)) => ErrorKind::Storage,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::LockNotHeld(_) => ErrorKind::InvalidState,
        }
    }
}

/// Result type for job registry operations.
pub type JobRegistryResult<T> = Result<T, JobRegistryError>;

/// Job registry service.
///
/// Every mutation runs under the job's lock: load, change a copy, persist.
/// A failure at any step leaves the stored job untouched.
pub struct JobRegistryService<R, C>
where
    R: JobRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    locks: JobLocks,
    retry: RetryPolicy,
    photo_limit: usize,
}

impl<R, C> Clone for JobRegistryService<R, C>
where
    R: JobRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            locks: self.locks.clone(),
            retry: self.retry,
            photo_limit: self.photo_limit,
        }
    }
}

impl<R, C> JobRegistryService<R, C>
where
    R: JobRepository,
    C: Clock + Send + Sync,
{
    /// Creates a registry with default locks, retry policy and photo limit.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            locks: JobLocks::new(),
            retry: RetryPolicy::default(),
            photo_limit: DEFAULT_PHOTO_LIMIT,
        }
    }

    /// Shares an existing lock registry.
    #[must_use]
    pub fn with_locks(mut self, locks: JobLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Replaces the storage retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the maximum number of photos per job.
    #[must_use]
    pub const fn with_photo_limit(mut self, photo_limit: usize) -> Self {
        self.photo_limit = photo_limit;
        self
    }

    /// Returns the configured photo limit.
    #[must_use]
    pub const fn photo_limit(&self) -> usize {
        self.photo_limit
    }

    /// Returns the lock registry shared with other services.
    #[must_use]
    pub const fn locks(&self) -> &JobLocks {
        &self.locks
    }

    /// Returns the injected clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Waits for exclusive access to `job_id`.
    pub async fn lock(&self, job_id: JobId) -> JobGuard {
        self.locks.acquire(job_id).await
    }

    /// Finds a job by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::Repository`] when lookup fails.
    pub async fn find(&self, job_id: JobId) -> JobRegistryResult<Option<Job>> {
        Ok(self
            .retry
            .run("jobs.find_by_id", || self.repository.find_by_id(job_id))
            .await?)
    }

    /// Returns a job or fails.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::NotFound`] for unknown identifiers.
    pub async fn get(&self, job_id: JobId) -> JobRegistryResult<Job> {
        self.find(job_id)
            .await?
            .ok_or(JobRegistryError::NotFound(job_id))
    }

    /// Persists `job` while its lock is held.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::LockNotHeld`] when `guard` covers another
    /// job, or [`JobRegistryError::Repository`] when persistence fails.
    pub async fn save(&self, guard: &JobGuard, job: &Job) -> JobRegistryResult<()> {
        if !guard.covers(job.id()) {
            return Err(JobRegistryError::LockNotHeld(job.id()));
        }
        self.retry
            .run("jobs.update", || self.repository.update(job))
            .await?;
        Ok(())
    }

    /// Creates a pending job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::PermissionDenied`] without
    /// [`Capability::CreateJob`], or [`JobRegistryError::Domain`] when the
    /// site name is blank.
    pub async fn create_job(&self, actor: &Actor, request: CreateJobRequest) -> JobRegistryResult<Job> {
        actor.require(Capability::CreateJob)?;
        let (day, details, director_notes) = request.into_details()?;
        let mut job = Job::new(details, day, &*self.clock);
        if let Some(notes) = director_notes {
            job.set_director_notes(notes, &*self.clock)?;
        }
        self.retry
            .run("jobs.store", || self.repository.store(&job))
            .await?;
        tracing::info!(
            job_id = %job.id(),
            day = %day,
            site = job.details().site_name(),
            created_by = %actor.employee_id(),
            "job created"
        );
        Ok(job)
    }

    /// Appends a photo reference to a job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::Domain`] for a blank reference or when
    /// the photo limit is reached, [`JobRegistryError::NotFound`] for
    /// unknown jobs, or [`JobRegistryError::PermissionDenied`].
    pub async fn attach_photo(
        &self,
        actor: &Actor,
        job_id: JobId,
        photo_ref: impl Into<String>,
    ) -> JobRegistryResult<Job> {
        actor.require(Capability::UploadPhoto)?;
        let photo = PhotoRef::new(photo_ref)?;
        let limit = self.photo_limit;
        let job = self
            .mutate(job_id, |job, clock| {
                actor.require_assignee(job.assignee())?;
                job.attach_photo(photo, limit, clock)?;
                Ok(())
            })
            .await?;
        tracing::debug!(job_id = %job_id, photos = job.photo_count(), "photo attached");
        Ok(job)
    }

    /// Moves a job to `target`.
    ///
    /// The next forward step is allowed for actors holding the matching
    /// capability on their own jobs. Any other move needs
    /// [`Capability::OverrideTransition`] and is logged as an override.
    /// Archived is never reachable here.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::Domain`] with
    /// [`JobDomainError::InvalidStateTransition`] when the move is not
    /// permitted, [`JobRegistryError::NotFound`], or
    /// [`JobRegistryError::PermissionDenied`].
    pub async fn transition(
        &self,
        actor: &Actor,
        job_id: JobId,
        target: JobStatus,
    ) -> JobRegistryResult<Job> {
        let mut from = None;
        let mut overridden = false;
        let job = self
            .mutate(job_id, |job, clock| {
                from = Some(job.status());
                let forward = job.status().can_advance_to(target) && !target.is_reset_only();
                if forward {
                    actor.require(forward_capability(target))?;
                    actor.require_assignee(job.assignee())?;
                    job.transition_to(target, clock)?;
                } else if actor.can(Capability::OverrideTransition) {
                    job.override_status(target, clock)?;
                    overridden = true;
                } else {
                    return Err(JobDomainError::InvalidStateTransition {
                        job_id,
                        from: job.status(),
                        to: target,
                    }
                    .into());
                }
                Ok(())
            })
            .await?;

        let from_label = from.map_or("unknown", JobStatus::as_str);
        if overridden {
            tracing::warn!(
                job_id = %job_id,
                from = from_label,
                to = %target,
                actor = %actor.employee_id(),
                role = %actor.role(),
                "status override"
            );
        } else {
            tracing::info!(job_id = %job_id, from = from_label, to = %target, "job status changed");
        }
        Ok(job)
    }

    /// Starts work on an assigned job.
    ///
    /// # Errors
    ///
    /// See [`Self::transition`].
    pub async fn start_job(&self, actor: &Actor, job_id: JobId) -> JobRegistryResult<Job> {
        self.transition(actor, job_id, JobStatus::InProgress).await
    }

    /// Finishes work on a job in progress.
    ///
    /// # Errors
    ///
    /// See [`Self::transition`].
    pub async fn finish_job(&self, actor: &Actor, job_id: JobId) -> JobRegistryResult<Job> {
        self.transition(actor, job_id, JobStatus::Completed).await
    }

    /// Appends a note written by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::Domain`] for blank text or archived jobs,
    /// [`JobRegistryError::NotFound`], or
    /// [`JobRegistryError::PermissionDenied`].
    pub async fn add_note(
        &self,
        actor: &Actor,
        job_id: JobId,
        text: impl Into<String>,
    ) -> JobRegistryResult<Job> {
        actor.require(Capability::AddNote)?;
        let note = JobNote::new(
            actor.employee_id(),
            actor.display_name().as_str(),
            actor.role(),
            text,
            self.clock.utc(),
        )?;
        self.mutate(job_id, |job, clock| {
            actor.require_assignee(job.assignee())?;
            job.add_note(note, clock)?;
            Ok(())
        })
        .await
    }

    /// Replaces a job's director notes.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::PermissionDenied`] without
    /// [`Capability::EditDirectorNotes`], [`JobRegistryError::NotFound`], or
    /// [`JobRegistryError::Domain`] for archived jobs.
    pub async fn set_director_notes(
        &self,
        actor: &Actor,
        job_id: JobId,
        notes: impl Into<String>,
    ) -> JobRegistryResult<Job> {
        actor.require(Capability::EditDirectorNotes)?;
        let notes = notes.into();
        self.mutate(job_id, |job, clock| {
            job.set_director_notes(notes, clock)?;
            Ok(())
        })
        .await
    }

    /// Lists every job scheduled on `day`, archived ones included.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::PermissionDenied`] without
    /// [`Capability::ViewAllJobs`], or [`JobRegistryError::Repository`].
    pub async fn list_by_day(&self, actor: &Actor, day: NaiveDate) -> JobRegistryResult<Vec<Job>> {
        actor.require(Capability::ViewAllJobs)?;
        self.jobs_on(day).await
    }

    /// Lists pending jobs across all days.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::PermissionDenied`] without
    /// [`Capability::ViewAllJobs`], or [`JobRegistryError::Repository`].
    pub async fn list_unassigned(&self, actor: &Actor) -> JobRegistryResult<Vec<Job>> {
        actor.require(Capability::ViewAllJobs)?;
        Ok(self
            .retry
            .run("jobs.list_unassigned", || self.repository.list_unassigned())
            .await?)
    }

    /// Summarises the jobs scheduled on `day`.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::PermissionDenied`] without
    /// [`Capability::ViewDashboard`], or [`JobRegistryError::Repository`].
    pub async fn dashboard(&self, actor: &Actor, day: NaiveDate) -> JobRegistryResult<DashboardSummary> {
        actor.require(Capability::ViewDashboard)?;
        let jobs = self.jobs_on(day).await?;
        Ok(DashboardSummary::from_jobs(day, &jobs))
    }

    /// Lists every job scheduled on `day` without a capability check.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::Repository`] when lookup fails.
    pub async fn jobs_on(&self, day: NaiveDate) -> JobRegistryResult<Vec<Job>> {
        Ok(self
            .retry
            .run("jobs.list_scheduled_on", || self.repository.list_scheduled_on(day))
            .await?)
    }

    /// Lists non-archived jobs scheduled before `day`.
    ///
    /// # Errors
    ///
    /// Returns [`JobRegistryError::Repository`] when lookup fails.
    pub async fn open_jobs_before(&self, day: NaiveDate) -> JobRegistryResult<Vec<Job>> {
        Ok(self
            .retry
            .run("jobs.list_open_before", || self.repository.list_open_before(day))
            .await?)
    }

    async fn mutate<F>(&self, job_id: JobId, change: F) -> JobRegistryResult<Job>
    where
        F: FnOnce(&mut Job, &C) -> JobRegistryResult<()>,
    {
        let guard = self.lock(job_id).await;
        let mut job = self.get(job_id).await?;
        change(&mut job, &self.clock)?;
        self.save(&guard, &job).await?;
        Ok(job)
    }
}

const fn forward_capability(target: JobStatus) -> Capability {
    match target {
        JobStatus::Pending | JobStatus::Assigned => Capability::AssignJob,
        JobStatus::InProgress => Capability::StartJob,
        JobStatus::Completed | JobStatus::Archived => Capability::CompleteJob,
    }
}
