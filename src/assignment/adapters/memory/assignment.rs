//! In-memory repository for assignments.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::assignment::{
    domain::{Assignment, AssignmentId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use crate::job::domain::JobId;
use crate::staff::domain::EmployeeId;

/// Thread-safe in-memory assignment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    assignments: Arc<RwLock<HashMap<AssignmentId, Assignment>>>,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> AssignmentRepositoryError {
    AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn check_collisions(
    stored: &HashMap<AssignmentId, Assignment>,
    candidate: &Assignment,
) -> AssignmentRepositoryResult<()> {
    if !candidate.is_active() {
        return Ok(());
    }
    let others = stored
        .values()
        .filter(|other| other.is_active() && other.id() != candidate.id());
    for other in others {
        if other.employee_id() == candidate.employee_id() && other.day() == candidate.day() {
            return Err(AssignmentRepositoryError::ActiveAssignmentExists {
                employee_id: candidate.employee_id(),
                day: candidate.day(),
            });
        }
        if other.job_id() == candidate.job_id() {
            return Err(AssignmentRepositoryError::JobAlreadyBound(candidate.job_id()));
        }
    }
    Ok(())
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn insert(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let mut assignments = self.assignments.write().map_err(poisoned)?;
        check_collisions(&assignments, assignment)?;
        assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn update(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let mut assignments = self.assignments.write().map_err(poisoned)?;
        if !assignments.contains_key(&assignment.id()) {
            return Err(AssignmentRepositoryError::NotFound(assignment.id()));
        }
        check_collisions(&assignments, assignment)?;
        assignments.insert(assignment.id(), assignment.clone());
        Ok(())
    }

    async fn find_active_for_job(&self, job_id: JobId) -> AssignmentRepositoryResult<Option<Assignment>> {
        let assignments = self.assignments.read().map_err(poisoned)?;
        Ok(assignments
            .values()
            .find(|assignment| assignment.is_active() && assignment.job_id() == job_id)
            .cloned())
    }

    async fn find_active_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentRepositoryResult<Option<Assignment>> {
        let assignments = self.assignments.read().map_err(poisoned)?;
        Ok(assignments
            .values()
            .find(|assignment| {
                assignment.is_active()
                    && assignment.employee_id() == employee_id
                    && assignment.day() == day
            })
            .cloned())
    }

    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentRepositoryResult<Vec<Assignment>> {
        let assignments = self.assignments.read().map_err(poisoned)?;
        let mut matching: Vec<Assignment> = assignments
            .values()
            .filter(|assignment| assignment.employee_id() == employee_id && assignment.day() == day)
            .cloned()
            .collect();
        matching.sort_by_key(Assignment::created_at);
        Ok(matching)
    }
}
