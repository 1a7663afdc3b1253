//! Service wiring shared by the binary and the integration tests.
//!
//! [`App::assemble`] builds every service from an [`AppConfig`] and a set
//! of [`Repositories`]; the repositories decide whether the application
//! runs against `PostgreSQL` or in memory.

use crate::assignment::{
    adapters::{memory::InMemoryAssignmentRepository, postgres::PostgresAssignmentRepository},
    ports::AssignmentRepository,
    services::AssignmentCoordinator,
};
use crate::command::services::{CommandDispatcher, ReplyRenderer};
use crate::config::{AppConfig, ConfigError};
use crate::db::{DbSetupError, GroundcrewPgPool};
use crate::job::{
    adapters::{memory::InMemoryJobRepository, postgres::PostgresJobRepository},
    ports::JobRepository,
    services::JobRegistryService,
};
use crate::reset::{
    adapters::{
        log::LogAlertSink, memory::InMemoryResetLedger, postgres::PostgresResetLedger,
    },
    ports::ResetLedger,
    services::{ResetScheduler, ResetService},
};
use crate::staff::{
    adapters::{memory::InMemoryEmployeeRepository, postgres::PostgresEmployeeRepository},
    domain::Employee,
    ports::EmployeeRepository,
    services::{StaffDirectory, StaffError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::util::TryInitError;

/// Errors that stop the application from starting or running.
#[derive(Debug, Error)]
pub enum AppError {
    /// The environment did not describe a usable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The database could not be prepared.
    #[error(transparent)]
    Database(#[from] DbSetupError),

    /// The reply templates failed to compile.
    #[error("failed to compile reply templates: {0}")]
    Templates(#[from] minijinja::Error),

    /// The configured roster could not be stored.
    #[error(transparent)]
    Staff(#[from] StaffError),

    /// Logging could not be initialised.
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TryInitError),

    /// Reading commands or writing replies failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The reset scheduler task panicked.
    #[error("reset scheduler task failed: {0}")]
    Scheduler(#[from] tokio::task::JoinError),
}

/// The four stores the application runs against.
#[derive(Debug)]
pub struct Repositories<J, A, S, L> {
    /// Job store.
    pub jobs: Arc<J>,
    /// Assignment store.
    pub assignments: Arc<A>,
    /// Employee store.
    pub employees: Arc<S>,
    /// Reset ledger.
    pub ledger: Arc<L>,
}

/// Repositories backed by process memory.
pub type InMemoryRepositories = Repositories<
    InMemoryJobRepository,
    InMemoryAssignmentRepository,
    InMemoryEmployeeRepository,
    InMemoryResetLedger,
>;

/// Repositories backed by `PostgreSQL`.
pub type PostgresRepositories = Repositories<
    PostgresJobRepository,
    PostgresAssignmentRepository,
    PostgresEmployeeRepository,
    PostgresResetLedger,
>;

impl InMemoryRepositories {
    /// Creates empty in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            jobs: Arc::new(InMemoryJobRepository::new()),
            assignments: Arc::new(InMemoryAssignmentRepository::new()),
            employees: Arc::new(InMemoryEmployeeRepository::new()),
            ledger: Arc::new(InMemoryResetLedger::new()),
        }
    }
}

impl PostgresRepositories {
    /// Creates stores sharing one connection pool.
    #[must_use]
    pub fn postgres(pool: &GroundcrewPgPool) -> Self {
        Self {
            jobs: Arc::new(PostgresJobRepository::new(pool.clone())),
            assignments: Arc::new(PostgresAssignmentRepository::new(pool.clone())),
            employees: Arc::new(PostgresEmployeeRepository::new(pool.clone())),
            ledger: Arc::new(PostgresResetLedger::new(pool.clone())),
        }
    }
}

/// Reset scheduler as wired by [`App`], alerting through the log.
pub type AppScheduler<J, A, S, L, C> = ResetScheduler<J, A, S, L, C, LogAlertSink>;

/// Fully wired application services.
pub struct App<J, A, S, L, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
{
    staff: StaffDirectory<S, C>,
    dispatcher: CommandDispatcher<J, A, S, C>,
    reset: ResetService<J, A, S, L, C>,
    scheduler: Arc<AppScheduler<J, A, S, L, C>>,
}

impl<J, A, S, L, C> App<J, A, S, L, C>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
{
    /// Builds the services described by `config` over `repositories`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Templates`] when the reply templates fail to
    /// compile.
    pub fn assemble(
        config: &AppConfig,
        repositories: Repositories<J, A, S, L>,
        clock: Arc<C>,
    ) -> Result<Self, AppError> {
        let retry = config.retry_policy();
        let staff = StaffDirectory::new(repositories.employees, Arc::clone(&clock))
            .with_developer_mode(config.developer_mode)
            .with_retry_policy(retry);
        let jobs = JobRegistryService::new(repositories.jobs, Arc::clone(&clock))
            .with_photo_limit(config.photo_limit)
            .with_retry_policy(retry);
        let coordinator = AssignmentCoordinator::new(
            jobs,
            staff.clone(),
            repositories.assignments,
            Arc::clone(&clock),
        )
        .with_retry_policy(retry);
        let reset = ResetService::new(coordinator.clone(), repositories.ledger, Arc::clone(&clock))
            .with_boundary(config.reset_boundary)
            .with_retry_policy(retry);
        let scheduler = ResetScheduler::new(reset.clone(), Arc::clone(&clock), Arc::new(LogAlertSink))
            .with_tick_interval(config.reset_tick)
            .with_max_consecutive_failures(config.reset_max_failures);
        let renderer = Arc::new(ReplyRenderer::new()?);
        let dispatcher =
            CommandDispatcher::new(coordinator, renderer, clock).with_boundary(config.reset_boundary);
        Ok(Self {
            staff,
            dispatcher,
            reset,
            scheduler: Arc::new(scheduler),
        })
    }

    /// Stores the configured roster and deactivates anyone no longer on it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Staff`] when the roster cannot be stored.
    pub async fn sync_roster(&self, config: &AppConfig) -> Result<Vec<Employee>, AppError> {
        Ok(self.staff.sync_roster(&config.roster).await?)
    }

    /// Returns the inbound command dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &CommandDispatcher<J, A, S, C> {
        &self.dispatcher
    }

    /// Returns the daily reset service.
    #[must_use]
    pub const fn reset(&self) -> &ResetService<J, A, S, L, C> {
        &self.reset
    }

    /// Returns the reset scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &Arc<AppScheduler<J, A, S, L, C>> {
        &self.scheduler
    }
}

impl<J, A, S, L, C> App<J, A, S, L, C>
where
    J: JobRepository + 'static,
    A: AssignmentRepository + 'static,
    S: EmployeeRepository + 'static,
    L: ResetLedger + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Runs the reset scheduler on the runtime until `shutdown` is cancelled.
    #[must_use]
    pub fn spawn_scheduler(&self, shutdown: CancellationToken) -> JoinHandle<()> {
        let scheduler = Arc::clone(&self.scheduler);
        tokio::spawn(async move { scheduler.run(shutdown).await })
    }
}
