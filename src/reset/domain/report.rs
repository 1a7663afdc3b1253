//! Results of a reset run.

use crate::job::domain::JobId;
use chrono::{DateTime, NaiveDate, Utc};

/// Whether a reset did any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The business day had already been reset.
    AlreadyRan,
    /// The sweep ran and was recorded.
    Completed,
}

/// What one call to the reset did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    /// Business day the reset ran for.
    pub business_day: NaiveDate,
    /// Whether any work was done.
    pub outcome: ResetOutcome,
    /// Completed jobs that were archived.
    pub archived: Vec<JobId>,
    /// Unfinished jobs moved to the business day, assignee kept.
    pub carried_forward: Vec<JobId>,
    /// Assigned jobs moved to the business day as pending because the
    /// assignee was already booked.
    pub released: Vec<JobId>,
    /// Jobs still being worked, left untouched.
    pub still_in_progress: Vec<JobId>,
}

impl ResetReport {
    /// Creates an empty report for `business_day`.
    #[must_use]
    pub const fn empty(business_day: NaiveDate, outcome: ResetOutcome) -> Self {
        Self {
            business_day,
            outcome,
            archived: Vec::new(),
            carried_forward: Vec::new(),
            released: Vec::new(),
            still_in_progress: Vec::new(),
        }
    }

    /// Returns whether the reset was skipped as a repeat.
    #[must_use]
    pub const fn already_ran(&self) -> bool {
        matches!(self.outcome, ResetOutcome::AlreadyRan)
    }
}

/// Ledger entry for a completed reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetRun {
    /// Business day the reset ran for.
    pub business_day: NaiveDate,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Number of archived jobs.
    pub archived: u32,
    /// Number of carried jobs.
    pub carried_forward: u32,
    /// Number of released jobs.
    pub released: u32,
}

impl ResetRun {
    /// Summarises `report` for the ledger.
    #[must_use]
    pub fn from_report(report: &ResetReport, completed_at: DateTime<Utc>) -> Self {
        Self {
            business_day: report.business_day,
            completed_at,
            archived: count(&report.archived),
            carried_forward: count(&report.carried_forward),
            released: count(&report.released),
        }
    }
}

fn count(ids: &[JobId]) -> u32 {
    u32::try_from(ids.len()).unwrap_or(u32::MAX)
}
