//! Roster synchronisation, employee lookup and actor resolution.

use crate::error::ErrorKind;
use crate::retry::RetryPolicy;
use crate::staff::{
    domain::{
        Actor, DisplayName, Employee, EmployeeId, PermissionDenied, Role, RosterEntry,
        StaffDomainError,
    },
    ports::{EmployeeRepository, EmployeeRepositoryError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a single employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEmployeeRequest {
    id: i64,
    display_name: String,
    role: Role,
}

impl RegisterEmployeeRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(id: i64, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }
}

/// Service-level errors for staff operations.
#[derive(Debug, Error)]
pub enum StaffError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] StaffDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] EmployeeRepositoryError),

    /// The employee is unknown or no longer on the roster.
    #[error("employee not found: {0}")]
    NotFound(EmployeeId),

    /// The caller is not a known crew member.
    #[error("user {0} is not on the crew roster")]
    UnknownUser(i64),

    /// The caller lacks a capability.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
}

impl StaffError {
    /// Classifies the error for the request boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(_) => ErrorKind::Storage,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UnknownUser(_) | Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
        }
    }
}

/// Result type for staff service operations.
pub type StaffResult<T> = Result<T, StaffError>;

/// Staff directory service.
pub struct StaffDirectory<R, C>
where
    R: EmployeeRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    retry: RetryPolicy,
    developer_mode: bool,
}

impl<R, C> Clone for StaffDirectory<R, C>
where
    R: EmployeeRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            retry: self.retry,
            developer_mode: self.developer_mode,
        }
    }
}

impl<R, C> StaffDirectory<R, C>
where
    R: EmployeeRepository,
    C: Clock + Send + Sync,
{
    /// Creates a staff directory with developer mode disabled.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            retry: RetryPolicy::default(),
            developer_mode: false,
        }
    }

    /// Enables or disables developer mode for actor resolution.
    #[must_use]
    pub const fn with_developer_mode(mut self, enabled: bool) -> Self {
        self.developer_mode = enabled;
        self
    }

    /// Replaces the storage retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns whether developer mode is enabled.
    #[must_use]
    pub const fn developer_mode(&self) -> bool {
        self.developer_mode
    }

    /// Registers or updates a single employee.
    ///
    /// # Errors
    ///
    /// Returns [`StaffError::Domain`] for invalid input and
    /// [`StaffError::Repository`] when persistence fails.
    pub async fn register(&self, request: RegisterEmployeeRequest) -> StaffResult<Employee> {
        let id = EmployeeId::new(request.id)?;
        let display_name = DisplayName::new(request.display_name)?;
        self.upsert_entry(&RosterEntry::new(id, display_name, request.role))
            .await
    }

    /// Makes the stored roster match `entries`.
    ///
    /// Listed employees are created or updated; stored employees missing
    /// from the list are deactivated. Returns the active roster.
    ///
    /// # Errors
    ///
    /// Returns [`StaffError::Repository`] when persistence fails.
    pub async fn sync_roster(&self, entries: &[RosterEntry]) -> StaffResult<Vec<Employee>> {
        let mut roster = Vec::with_capacity(entries.len());
        for entry in entries {
            roster.push(self.upsert_entry(entry).await?);
        }

        let listed: HashSet<EmployeeId> = entries.iter().map(|entry| entry.id).collect();
        let stored = self
            .retry
            .run("employees.list_all", || self.repository.list_all())
            .await?;
        for mut employee in stored {
            if listed.contains(&employee.id()) || !employee.deactivate(&*self.clock) {
                continue;
            }
            self.retry
                .run("employees.upsert", || self.repository.upsert(&employee))
                .await?;
            tracing::info!(employee_id = %employee.id(), "employee removed from roster");
        }

        tracing::info!(active = roster.len(), "crew roster synchronised");
        Ok(roster)
    }

    /// Finds an employee by identifier, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`StaffError::Repository`] when lookup fails.
    pub async fn find(&self, id: EmployeeId) -> StaffResult<Option<Employee>> {
        Ok(self
            .retry
            .run("employees.find_by_id", || self.repository.find_by_id(id))
            .await?)
    }

    /// Returns an active employee or fails.
    ///
    /// # Errors
    ///
    /// Returns [`StaffError::NotFound`] when the employee is unknown or
    /// inactive.
    pub async fn require_active(&self, id: EmployeeId) -> StaffResult<Employee> {
        match self.find(id).await? {
            Some(employee) if employee.is_active() => Ok(employee),
            _ => Err(StaffError::NotFound(id)),
        }
    }

    /// Returns all active employees ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StaffError::Repository`] when lookup fails.
    pub async fn list_active(&self) -> StaffResult<Vec<Employee>> {
        let all = self
            .retry
            .run("employees.list_all", || self.repository.list_all())
            .await?;
        Ok(all.into_iter().filter(Employee::is_active).collect())
    }

    /// Resolves an inbound messaging user into an [`Actor`].
    ///
    /// # Errors
    ///
    /// Returns [`StaffError::UnknownUser`] when the user is not an active
    /// crew member.
    pub async fn resolve_actor(&self, user_id: i64) -> StaffResult<Actor> {
        let Ok(id) = EmployeeId::new(user_id) else {
            return Err(StaffError::UnknownUser(user_id));
        };
        match self.find(id).await? {
            Some(employee) if employee.is_active() => {
                Ok(Actor::for_employee(&employee, self.developer_mode))
            }
            _ => Err(StaffError::UnknownUser(user_id)),
        }
    }

    async fn upsert_entry(&self, entry: &RosterEntry) -> StaffResult<Employee> {
        let existing = self.find(entry.id).await?;
        let employee = match existing {
            Some(mut employee) => {
                if !employee.apply_roster(entry.display_name.clone(), entry.role, &*self.clock) {
                    return Ok(employee);
                }
                employee
            }
            None => Employee::new(
                entry.id,
                entry.display_name.clone(),
                entry.role,
                &*self.clock,
            ),
        };
        self.retry
            .run("employees.upsert", || self.repository.upsert(&employee))
            .await?;
        tracing::debug!(employee_id = %employee.id(), role = %employee.role(), "employee registered");
        Ok(employee)
    }
}
