//! Repository port for job persistence and lookup.

use crate::job::domain::{Job, JobId};
use crate::retry::Transient;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job repository operations.
pub type JobRepositoryResult<T> = Result<T, JobRepositoryError>;

/// Job persistence contract.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a new job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::DuplicateJob`] when the identifier is
    /// already taken.
    async fn store(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Replaces the stored job with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::NotFound`] when the job does not exist.
    async fn update(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Finds a job by identifier.
    ///
    /// Returns `None` when the job does not exist.
    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>>;

    /// Returns every job scheduled on `day`, including archived ones,
    /// ordered by creation time.
    async fn list_scheduled_on(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>>;

    /// Returns non-archived jobs scheduled strictly before `day`, ordered by
    /// creation time.
    async fn list_open_before(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>>;

    /// Returns pending jobs across all days, ordered by scheduled day then
    /// creation time.
    async fn list_unassigned(&self) -> JobRepositoryResult<Vec<Job>>;
}

/// Errors returned by job repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRepositoryError {
    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// The job to update does not exist.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Transient for JobRepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
