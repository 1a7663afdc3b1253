//! `PostgreSQL` repository implementation for the staff directory.

use super::{models::EmployeeRow, schema::employees};
use crate::db::{GroundcrewPgPool, PersistenceFailure, run_blocking};
use crate::staff::{
    domain::{DisplayName, Employee, EmployeeId, PersistedEmployeeData, Role},
    ports::{EmployeeRepository, EmployeeRepositoryError, EmployeeRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed employee repository.
#[derive(Debug, Clone)]
pub struct PostgresEmployeeRepository {
    pool: GroundcrewPgPool,
}

impl PostgresEmployeeRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GroundcrewPgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for EmployeeRepositoryError {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn upsert(&self, employee: &Employee) -> EmployeeRepositoryResult<()> {
        let row = to_row(employee);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(employees::table)
                .values(&row)
                .on_conflict(employees::id)
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(EmployeeRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: EmployeeId) -> EmployeeRepositoryResult<Option<Employee>> {
        run_blocking(&self.pool, move |connection| {
            let row = employees::table
                .filter(employees::id.eq(id.value()))
                .select(EmployeeRow::as_select())
                .first::<EmployeeRow>(connection)
                .optional()
                .map_err(EmployeeRepositoryError::persistence)?;
            row.map(row_to_employee).transpose()
        })
        .await
    }

    async fn list_all(&self) -> EmployeeRepositoryResult<Vec<Employee>> {
        run_blocking(&self.pool, move |connection| {
            let rows = employees::table
                .order(employees::id.asc())
                .select(EmployeeRow::as_select())
                .load::<EmployeeRow>(connection)
                .map_err(EmployeeRepositoryError::persistence)?;
            rows.into_iter().map(row_to_employee).collect()
        })
        .await
    }
}

fn to_row(employee: &Employee) -> EmployeeRow {
    EmployeeRow {
        id: employee.id().value(),
        display_name: employee.display_name().as_str().to_owned(),
        role: employee.role().as_str().to_owned(),
        active: employee.is_active(),
        created_at: employee.created_at(),
        updated_at: employee.updated_at(),
    }
}

fn row_to_employee(row: EmployeeRow) -> EmployeeRepositoryResult<Employee> {
    let EmployeeRow {
        id,
        display_name,
        role,
        active,
        created_at,
        updated_at,
    } = row;

    let data = PersistedEmployeeData {
        id: EmployeeId::new(id).map_err(EmployeeRepositoryError::persistence)?,
        display_name: DisplayName::new(display_name)
            .map_err(EmployeeRepositoryError::persistence)?,
        role: Role::try_from(role.as_str()).map_err(EmployeeRepositoryError::persistence)?,
        active,
        created_at,
        updated_at,
    };
    Ok(Employee::from_persisted(data))
}
