//! `PostgreSQL` repository implementation for assignments.

use super::{models::AssignmentRow, schema::assignments};
use crate::assignment::{
    domain::{Assignment, AssignmentId, AssignmentStatus, PersistedAssignmentData},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use crate::db::{GroundcrewPgPool, PersistenceFailure, run_blocking};
use crate::job::domain::JobId;
use crate::staff::domain::EmployeeId;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

const EMPLOYEE_DAY_INDEX: &str = "idx_assignments_active_employee_day";
const ACTIVE_STATUS: &str = "active";

/// `PostgreSQL`-backed assignment repository.
#[derive(Debug, Clone)]
pub struct PostgresAssignmentRepository {
    pool: GroundcrewPgPool,
}

impl PostgresAssignmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GroundcrewPgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for AssignmentRepositoryError {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn insert(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let row = to_row(assignment);
        let candidate = assignment.clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(assignments::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| collision_error(err, &candidate))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let row = to_row(assignment);
        let candidate = assignment.clone();
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(assignments::table.filter(assignments::id.eq(row.id)))
                .set(&row)
                .execute(connection)
                .map_err(|err| collision_error(err, &candidate))?;
            if updated == 0 {
                return Err(AssignmentRepositoryError::NotFound(candidate.id()));
            }
            Ok(())
        })
        .await
    }

    async fn find_active_for_job(&self, job_id: JobId) -> AssignmentRepositoryResult<Option<Assignment>> {
        run_blocking(&self.pool, move |connection| {
            let row = assignments::table
                .filter(assignments::job_id.eq(job_id.into_inner()))
                .filter(assignments::status.eq(ACTIVE_STATUS))
                .select(AssignmentRow::as_select())
                .first::<AssignmentRow>(connection)
                .optional()
                .map_err(AssignmentRepositoryError::persistence)?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn find_active_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentRepositoryResult<Option<Assignment>> {
        run_blocking(&self.pool, move |connection| {
            let row = assignments::table
                .filter(assignments::employee_id.eq(employee_id.value()))
                .filter(assignments::day.eq(day))
                .filter(assignments::status.eq(ACTIVE_STATUS))
                .select(AssignmentRow::as_select())
                .first::<AssignmentRow>(connection)
                .optional()
                .map_err(AssignmentRepositoryError::persistence)?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        day: NaiveDate,
    ) -> AssignmentRepositoryResult<Vec<Assignment>> {
        run_blocking(&self.pool, move |connection| {
            let rows = assignments::table
                .filter(assignments::employee_id.eq(employee_id.value()))
                .filter(assignments::day.eq(day))
                .order(assignments::created_at.asc())
                .select(AssignmentRow::as_select())
                .load::<AssignmentRow>(connection)
                .map_err(AssignmentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_assignment).collect()
        })
        .await
    }
}

fn collision_error(err: DieselError, candidate: &Assignment) -> AssignmentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_employee_day_violation(info.as_ref()) =>
        {
            AssignmentRepositoryError::ActiveAssignmentExists {
                employee_id: candidate.employee_id(),
                day: candidate.day(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AssignmentRepositoryError::JobAlreadyBound(candidate.job_id())
        }
        _ => AssignmentRepositoryError::persistence(err),
    }
}

fn is_employee_day_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == EMPLOYEE_DAY_INDEX)
}

fn to_row(assignment: &Assignment) -> AssignmentRow {
    AssignmentRow {
        id: assignment.id().into_inner(),
        employee_id: assignment.employee_id().value(),
        job_id: assignment.job_id().into_inner(),
        day: assignment.day(),
        status: assignment.status().as_str().to_owned(),
        created_at: assignment.created_at(),
        updated_at: assignment.updated_at(),
    }
}

fn row_to_assignment(row: AssignmentRow) -> AssignmentRepositoryResult<Assignment> {
    let AssignmentRow {
        id,
        employee_id,
        job_id,
        day,
        status,
        created_at,
        updated_at,
    } = row;

    let data = PersistedAssignmentData {
        id: AssignmentId::from_uuid(id),
        employee_id: EmployeeId::new(employee_id).map_err(AssignmentRepositoryError::persistence)?,
        job_id: JobId::from_uuid(job_id),
        day,
        status: AssignmentStatus::try_from(status.as_str())
            .map_err(AssignmentRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Assignment::from_persisted(data))
}
