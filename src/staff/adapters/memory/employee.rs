//! In-memory repository for employees.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::staff::{
    domain::{Employee, EmployeeId},
    ports::{EmployeeRepository, EmployeeRepositoryError, EmployeeRepositoryResult},
};

/// Thread-safe in-memory employee repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeRepository {
    employees: Arc<RwLock<BTreeMap<EmployeeId, Employee>>>,
}

impl InMemoryEmployeeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> EmployeeRepositoryError {
    EmployeeRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn upsert(&self, employee: &Employee) -> EmployeeRepositoryResult<()> {
        let mut employees = self.employees.write().map_err(poisoned)?;
        employees.insert(employee.id(), employee.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: EmployeeId) -> EmployeeRepositoryResult<Option<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.get(&id).cloned())
    }

    async fn list_all(&self) -> EmployeeRepositoryResult<Vec<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.values().cloned().collect())
    }
}
