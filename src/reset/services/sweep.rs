//! The daily sweep: archive finished work, carry unfinished work forward.

use crate::assignment::{
    ports::AssignmentRepository,
    services::{AssignmentCoordinator, AssignmentError, CarryOutcome},
};
use crate::error::ErrorKind;
use crate::job::{domain::JobStatus, ports::JobRepository, services::JobRegistryError};
use crate::reset::{
    domain::{ResetBoundary, ResetOutcome, ResetReport, ResetRun},
    ports::{ResetLedger, ResetLedgerError},
};
use crate::retry::RetryPolicy;
use crate::staff::ports::EmployeeRepository;
use chrono::{NaiveDate, NaiveDateTime};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Service-level errors for the reset.
#[derive(Debug, Error)]
pub enum ResetError {
    /// Listing jobs failed.
    #[error(transparent)]
    Jobs(#[from] JobRegistryError),

    /// Reading or writing the ledger failed.
    #[error(transparent)]
    Ledger(#[from] ResetLedgerError),

    /// Some jobs could not be processed; the day stays unrecorded.
    #[error("reset for {business_day} left {failed} job(s) unprocessed: {last_error}")]
    Incomplete {
        /// Business day being reset.
        business_day: NaiveDate,
        /// Number of jobs that failed.
        failed: usize,
        /// Last failure seen.
        last_error: Box<AssignmentError>,
    },
}

impl ResetError {
    /// Classifies the error for the request boundary.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Jobs(err) => err.kind(),
            Self::Ledger(_) => ErrorKind::Storage,
            Self::Incomplete { last_error, .. } => last_error.kind(),
        }
    }
}

/// Result type for reset operations.
pub type ResetResult<T> = Result<T, ResetError>;

/// Runs the daily sweep at most once per business day.
pub struct ResetService<J, A, S, L, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
{
    coordinator: AssignmentCoordinator<J, A, S, C>,
    ledger: Arc<L>,
    clock: Arc<C>,
    boundary: ResetBoundary,
    retry: RetryPolicy,
    running: Arc<Mutex<()>>,
}

impl<J, A, S, L, C> Clone for ResetService<J, A, S, L, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            ledger: Arc::clone(&self.ledger),
            clock: Arc::clone(&self.clock),
            boundary: self.boundary,
            retry: self.retry,
            running: Arc::clone(&self.running),
        }
    }
}

impl<J, A, S, L, C> ResetService<J, A, S, L, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
{
    /// Creates a reset service with a midnight boundary.
    #[must_use]
    pub fn new(coordinator: AssignmentCoordinator<J, A, S, C>, ledger: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            coordinator,
            ledger,
            clock,
            boundary: ResetBoundary::MIDNIGHT,
            retry: RetryPolicy::default(),
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Sets the local time at which business days begin.
    #[must_use]
    pub const fn with_boundary(mut self, boundary: ResetBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Replaces the storage retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the configured boundary.
    #[must_use]
    pub const fn boundary(&self) -> ResetBoundary {
        self.boundary
    }

    /// Returns the last business day recorded in the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`ResetError::Ledger`] when the ledger cannot be read.
    pub async fn last_reset_day(&self) -> ResetResult<Option<NaiveDate>> {
        let last = self
            .retry
            .run("reset_runs.last_run", || self.ledger.last_run())
            .await?;
        Ok(last.map(|run| run.business_day))
    }

    /// Resets every job scheduled before the business day of `now`.
    ///
    /// Completed jobs are archived. Pending and assigned jobs move to the
    /// business day and are flagged overdue. Jobs in progress are left
    /// alone. Repeating the call for the same business day does nothing;
    /// missed days are covered by a single catch-up run.
    ///
    /// # Errors
    ///
    /// Returns [`ResetError::Incomplete`] when some jobs failed; the day is
    /// not recorded so the next call retries the remainder.
    pub async fn run_reset(&self, now: NaiveDateTime) -> ResetResult<ResetReport> {
        let _running = self.running.lock().await;
        let business_day = self.boundary.business_day(now);
        if self
            .last_reset_day()
            .await?
            .is_some_and(|last| last >= business_day)
        {
            tracing::debug!(business_day = %business_day, "reset already ran");
            return Ok(ResetReport::empty(business_day, ResetOutcome::AlreadyRan));
        }

        tracing::info!(business_day = %business_day, "daily reset started");
        let mut report = ResetReport::empty(business_day, ResetOutcome::Completed);
        let mut failures = Vec::new();
        for job in self.coordinator.jobs().open_jobs_before(business_day).await? {
            let job_id = job.id();
            let step = match job.status() {
                JobStatus::Completed => self
                    .coordinator
                    .archive(job_id)
                    .await
                    .map(|_| report.archived.push(job_id)),
                JobStatus::Pending | JobStatus::Assigned => self
                    .coordinator
                    .carry_forward(job_id, business_day)
                    .await
                    .map(|outcome| match outcome {
                        CarryOutcome::Carried => report.carried_forward.push(job_id),
                        CarryOutcome::Released => report.released.push(job_id),
                    }),
                JobStatus::InProgress => {
                    report.still_in_progress.push(job_id);
                    Ok(())
                }
                JobStatus::Archived => Ok(()),
            };
            if let Err(err) = step {
                tracing::warn!(job_id = %job_id, error = %err, "reset step failed");
                failures.push(err);
            }
        }

        let failed = failures.len();
        if let Some(last_error) = failures.pop() {
            return Err(ResetError::Incomplete {
                business_day,
                failed,
                last_error: Box::new(last_error),
            });
        }

        let run = ResetRun::from_report(&report, self.clock.utc());
        self.retry
            .run("reset_runs.record", || self.ledger.record(&run))
            .await?;
        tracing::info!(
            business_day = %business_day,
            archived = report.archived.len(),
            carried_forward = report.carried_forward.len(),
            released = report.released.len(),
            still_in_progress = report.still_in_progress.len(),
            "daily reset completed"
        );
        Ok(report)
    }
}
