//! Repository port for employee persistence.

use crate::retry::Transient;
use crate::staff::domain::{Employee, EmployeeId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for employee repository operations.
pub type EmployeeRepositoryResult<T> = Result<T, EmployeeRepositoryError>;

/// Employee persistence contract.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts the employee or replaces the stored record with the same ID.
    async fn upsert(&self, employee: &Employee) -> EmployeeRepositoryResult<()>;

    /// Finds an employee by identifier.
    ///
    /// Returns `None` when the employee does not exist.
    async fn find_by_id(&self, id: EmployeeId) -> EmployeeRepositoryResult<Option<Employee>>;

    /// Returns every stored employee, ordered by identifier.
    async fn list_all(&self) -> EmployeeRepositoryResult<Vec<Employee>>;
}

/// Errors returned by employee repository implementations.
#[derive(Debug, Clone, Error)]
pub enum EmployeeRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EmployeeRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Transient for EmployeeRepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
