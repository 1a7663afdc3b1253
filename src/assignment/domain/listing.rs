//! An employee's jobs for one day.

use crate::job::domain::Job;
use crate::staff::domain::EmployeeId;
use chrono::NaiveDate;

/// Finite listing of an employee's open jobs for a day.
///
/// The listing owns its snapshot, so it can be iterated any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    employee_id: EmployeeId,
    day: NaiveDate,
    jobs: Vec<Job>,
}

impl JobListing {
    /// Creates a listing from a snapshot of jobs.
    #[must_use]
    pub const fn new(employee_id: EmployeeId, day: NaiveDate, jobs: Vec<Job>) -> Self {
        Self {
            employee_id,
            day,
            jobs,
        }
    }

    /// Returns the listed employee.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns the listed day.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Iterates the jobs in schedule order.
    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Returns the number of jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns whether the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl<'a> IntoIterator for &'a JobListing {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
