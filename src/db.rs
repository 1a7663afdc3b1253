//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Each bounded context owns its own schema module and repository; this
//! module only provides the pool type, schema bootstrap, and the blocking
//! bridge every repository uses.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool shared by all repositories.
pub type GroundcrewPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied at start-up. Every statement is idempotent.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_groundcrew_tables/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum DbSetupError {
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// A pooled connection could not be checked out.
    #[error("failed to check out connection: {0}")]
    Connection(#[source] PoolError),

    /// Applying the schema failed.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),

    /// The blocking task panicked or was cancelled.
    #[error("schema task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`DbSetupError::Pool`] when the pool cannot be created.
pub fn connect(database_url: &str, max_size: u32) -> Result<GroundcrewPgPool, DbSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder().max_size(max_size).build(manager)?)
}

/// Applies [`SCHEMA_SQL`] to the pooled database.
///
/// # Errors
///
/// Returns [`DbSetupError`] when no connection is available or a statement
/// fails.
pub async fn apply_schema(pool: &GroundcrewPgPool) -> Result<(), DbSetupError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(DbSetupError::Connection)?;
        connection.batch_execute(SCHEMA_SQL)?;
        Ok(())
    })
    .await?
}

/// Repository errors that can wrap an infrastructure failure.
pub(crate) trait PersistenceFailure {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

/// Runs `f` on a pooled connection inside `spawn_blocking`.
pub(crate) async fn run_blocking<F, T, E>(pool: &GroundcrewPgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::persistence_failure)?;
        f(&mut connection)
    })
    .await
    .map_err(E::persistence_failure)?
}
