//! Day overview for directors.

use super::{Job, JobStatus};
use crate::staff::domain::EmployeeId;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Job counts for one employee on a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeLoad {
    /// Jobs assigned but not started.
    pub assigned: usize,
    /// Jobs being worked.
    pub in_progress: usize,
    /// Jobs finished.
    pub completed: usize,
}

impl EmployeeLoad {
    /// Returns the number of jobs the employee holds.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.assigned + self.in_progress + self.completed
    }
}

/// Totals for a day's jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    day: NaiveDate,
    by_status: BTreeMap<JobStatus, usize>,
    overdue: usize,
    photos: usize,
    by_employee: BTreeMap<EmployeeId, EmployeeLoad>,
}

impl DashboardSummary {
    /// Summarises the jobs scheduled on `day`; jobs on other days are ignored.
    #[must_use]
    pub fn from_jobs<'a>(day: NaiveDate, jobs: impl IntoIterator<Item = &'a Job>) -> Self {
        let mut summary = Self {
            day,
            by_status: BTreeMap::new(),
            overdue: 0,
            photos: 0,
            by_employee: BTreeMap::new(),
        };
        for job in jobs.into_iter().filter(|job| job.scheduled_day() == day) {
            *summary.by_status.entry(job.status()).or_default() += 1;
            summary.photos += job.photo_count();
            if job.is_overdue() {
                summary.overdue += 1;
            }
            let Some(employee) = job.assignee() else {
                continue;
            };
            let load = summary.by_employee.entry(employee).or_default();
            match job.status() {
                JobStatus::Assigned => load.assigned += 1,
                JobStatus::InProgress => load.in_progress += 1,
                JobStatus::Completed | JobStatus::Archived => load.completed += 1,
                JobStatus::Pending => {}
            }
        }
        summary
    }

    /// Returns the summarised day.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Returns the number of jobs in `status`.
    #[must_use]
    pub fn count(&self, status: JobStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or_default()
    }

    /// Returns the number of jobs on the day.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_status.values().sum()
    }

    /// Returns how many jobs were carried over from earlier days.
    #[must_use]
    pub const fn overdue(&self) -> usize {
        self.overdue
    }

    /// Returns the number of photos attached across the day's jobs.
    #[must_use]
    pub const fn photos(&self) -> usize {
        self.photos
    }

    /// Returns per-employee loads ordered by employee id.
    pub fn employee_loads(&self) -> impl Iterator<Item = (EmployeeId, EmployeeLoad)> + '_ {
        self.by_employee.iter().map(|(id, load)| (*id, *load))
    }
}
