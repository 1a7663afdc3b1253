//! Job aggregate root.

use super::{JobDomainError, JobId, JobNote, JobStatus, PhotoRef, SiteDetails};
use crate::staff::domain::EmployeeId;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Default maximum number of photos a job may hold.
pub const DEFAULT_PHOTO_LIMIT: usize = 25;

/// A unit of site work scheduled for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    details: SiteDetails,
    status: JobStatus,
    assignee: Option<EmployeeId>,
    scheduled_day: NaiveDate,
    photos: Vec<PhotoRef>,
    notes: Vec<JobNote>,
    director_notes: Option<String>,
    overdue: bool,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted identifier.
    pub id: JobId,
    /// Persisted site details.
    pub details: SiteDetails,
    /// Persisted status.
    pub status: JobStatus,
    /// Persisted assignee.
    pub assignee: Option<EmployeeId>,
    /// Persisted scheduled day.
    pub scheduled_day: NaiveDate,
    /// Persisted photo references in upload order.
    pub photos: Vec<PhotoRef>,
    /// Persisted note log.
    pub notes: Vec<JobNote>,
    /// Persisted director notes.
    pub director_notes: Option<String>,
    /// Whether the job was carried over from an earlier day.
    pub overdue: bool,
    /// When work started.
    pub started_at: Option<DateTime<Utc>>,
    /// When work finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new pending job.
    #[must_use]
    pub fn new(details: SiteDetails, scheduled_day: NaiveDate, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: JobId::new(),
            details,
            status: JobStatus::Pending,
            assignee: None,
            scheduled_day,
            photos: Vec::new(),
            notes: Vec::new(),
            director_notes: None,
            overdue: false,
            started_at: None,
            finished_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            details: data.details,
            status: data.status,
            assignee: data.assignee,
            scheduled_day: data.scheduled_day,
            photos: data.photos,
            notes: data.notes,
            director_notes: data.director_notes,
            overdue: data.overdue,
            started_at: data.started_at,
            finished_at: data.finished_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the site details.
    #[must_use]
    pub const fn details(&self) -> &SiteDetails {
        &self.details
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<EmployeeId> {
        self.assignee
    }

    /// Returns the scheduled day.
    #[must_use]
    pub const fn scheduled_day(&self) -> NaiveDate {
        self.scheduled_day
    }

    /// Returns photo references in upload order.
    #[must_use]
    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    /// Returns the number of attached photos.
    #[must_use]
    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Returns the note log, oldest first.
    #[must_use]
    pub fn notes(&self) -> &[JobNote] {
        &self.notes
    }

    /// Returns the director notes, if any.
    #[must_use]
    pub fn director_notes(&self) -> Option<&str> {
        self.director_notes.as_deref()
    }

    /// Returns whether the job was carried over from an earlier day.
    #[must_use]
    pub const fn is_overdue(&self) -> bool {
        self.overdue
    }

    /// Returns when work started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when work finished.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the time spent on site once the job has finished.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) if finished >= started => Some(finished - started),
            _ => None,
        }
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

    /// Binds the job to `employee` for `day`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidStateTransition`] unless the job is
    /// pending.
    pub fn assign_to(
        &mut self,
        employee: EmployeeId,
        day: NaiveDate,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_forward(JobStatus::Assigned)?;
        self.assignee = Some(employee);
        self.scheduled_day = day;
        self.status = JobStatus::Assigned;
        self.touch(clock);
        Ok(())
    }

    /// Reverts an assigned job to pending.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotReleasable`] unless the job is assigned.
    pub fn release(&mut self, clock: &impl Clock) -> Result<(), JobDomainError> {
        if self.status != JobStatus::Assigned {
            return Err(JobDomainError::NotReleasable {
                job_id: self.id,
                status: self.status,
            });
        }
        self.assignee = None;
        self.status = JobStatus::Pending;
        self.touch(clock);
        Ok(())
    }

    /// Moves the job one step forward.
    ///
    /// Starting stamps `started_at`; completing stamps `finished_at`.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidStateTransition`] unless `target` is
    /// the next forward step and not reserved for the reset, or
    /// [`JobDomainError::MissingAssignee`] when assigning without an
    /// assignee.
    pub fn transition_to(&mut self, target: JobStatus, clock: &impl Clock) -> Result<(), JobDomainError> {
        self.ensure_forward(target)?;
        if target == JobStatus::Assigned && self.assignee.is_none() {
            return Err(JobDomainError::MissingAssignee(self.id));
        }
        let timestamp = clock.utc();
        match target {
            JobStatus::InProgress => self.started_at = Some(timestamp),
            JobStatus::Completed => self.finished_at = Some(timestamp),
            JobStatus::Pending | JobStatus::Assigned | JobStatus::Archived => {}
        }
        self.status = target;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Forces the job into `target`, bypassing the forward-only rule.
    ///
    /// Moving back to pending clears the assignee and timing. Archived stays
    /// out of reach and archived jobs cannot be changed.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::JobArchived`] for archived jobs,
    /// [`JobDomainError::InvalidStateTransition`] when `target` is archived,
    /// or [`JobDomainError::MissingAssignee`] when a job without an assignee
    /// is forced to assigned.
    pub fn override_status(&mut self, target: JobStatus, clock: &impl Clock) -> Result<(), JobDomainError> {
        if self.status.is_terminal() {
            return Err(JobDomainError::JobArchived(self.id));
        }
        if target.is_reset_only() {
            return Err(self.invalid_transition(target));
        }
        if target == JobStatus::Assigned && self.assignee.is_none() {
            return Err(JobDomainError::MissingAssignee(self.id));
        }
        let timestamp = clock.utc();
        match target {
            JobStatus::Pending => {
                self.assignee = None;
                self.started_at = None;
                self.finished_at = None;
            }
            JobStatus::Assigned => {
                self.started_at = None;
                self.finished_at = None;
            }
            JobStatus::InProgress => {
                self.started_at.get_or_insert(timestamp);
                self.finished_at = None;
            }
            JobStatus::Completed => {
                self.started_at.get_or_insert(timestamp);
                self.finished_at = Some(timestamp);
            }
            JobStatus::Archived => {}
        }
        self.status = target;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Archives a completed job.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::InvalidStateTransition`] unless the job is
    /// completed.
    pub fn archive(&mut self, clock: &impl Clock) -> Result<(), JobDomainError> {
        if self.status != JobStatus::Completed {
            return Err(self.invalid_transition(JobStatus::Archived));
        }
        self.status = JobStatus::Archived;
        self.touch(clock);
        Ok(())
    }

    /// Moves an unfinished job to `day` and flags it overdue.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::NotCarriable`] unless the job is pending or
    /// assigned.
    pub fn carry_forward(&mut self, day: NaiveDate, clock: &impl Clock) -> Result<(), JobDomainError> {
        if !matches!(self.status, JobStatus::Pending | JobStatus::Assigned) {
            return Err(JobDomainError::NotCarriable {
                job_id: self.id,
                status: self.status,
            });
        }
        self.scheduled_day = day;
        self.overdue = true;
        self.touch(clock);
        Ok(())
    }

    /// Appends a photo reference.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::PhotoLimitReached`] when the job already
    /// holds `limit` photos, or [`JobDomainError::JobArchived`] for archived
    /// jobs.
    pub fn attach_photo(
        &mut self,
        photo: PhotoRef,
        limit: usize,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_mutable()?;
        if self.photos.len() >= limit {
            return Err(JobDomainError::PhotoLimitReached {
                job_id: self.id,
                limit,
            });
        }
        self.photos.push(photo);
        self.touch(clock);
        Ok(())
    }

    /// Appends a note to the log.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::JobArchived`] for archived jobs.
    pub fn add_note(&mut self, note: JobNote, clock: &impl Clock) -> Result<(), JobDomainError> {
        self.ensure_mutable()?;
        self.notes.push(note);
        self.touch(clock);
        Ok(())
    }

    /// Replaces the director notes. Blank text clears them.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::JobArchived`] for archived jobs.
    pub fn set_director_notes(
        &mut self,
        notes: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), JobDomainError> {
        self.ensure_mutable()?;
        let raw = notes.into();
        let trimmed = raw.trim();
        self.director_notes = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self.touch(clock);
        Ok(())
    }

    fn ensure_forward(&self, target: JobStatus) -> Result<(), JobDomainError> {
        if target.is_reset_only() || !self.status.can_advance_to(target) {
            return Err(self.invalid_transition(target));
        }
        Ok(())
    }

    const fn ensure_mutable(&self) -> Result<(), JobDomainError> {
        if self.status.is_terminal() {
            return Err(JobDomainError::JobArchived(self.id));
        }
        Ok(())
    }

    const fn invalid_transition(&self, target: JobStatus) -> JobDomainError {
        JobDomainError::InvalidStateTransition {
            job_id: self.id,
            from: self.status,
            to: target,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
