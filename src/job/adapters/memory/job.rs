//! In-memory repository for jobs.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::job::{
    domain::{Job, JobId, JobStatus},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};

/// Thread-safe in-memory job repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobRepository {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl InMemoryJobRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, keep: impl Fn(&Job) -> bool) -> JobRepositoryResult<Vec<Job>> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        let mut selected: Vec<Job> = jobs.values().filter(|job| keep(job)).cloned().collect();
        selected.sort_by_key(|job| (job.scheduled_day(), job.created_at(), job.id()));
        Ok(selected)
    }
}

fn poisoned(err: impl ToString) -> JobRepositoryError {
    JobRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        if jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let slot = jobs
            .get_mut(&job.id())
            .ok_or(JobRepositoryError::NotFound(job.id()))?;
        *slot = job.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs.get(&id).cloned())
    }

    async fn list_scheduled_on(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        self.select(|job| job.scheduled_day() == day)
    }

    async fn list_open_before(&self, day: NaiveDate) -> JobRepositoryResult<Vec<Job>> {
        self.select(|job| job.scheduled_day() < day && job.status() != JobStatus::Archived)
    }

    async fn list_unassigned(&self) -> JobRepositoryResult<Vec<Job>> {
        self.select(|job| job.status() == JobStatus::Pending)
    }
}
