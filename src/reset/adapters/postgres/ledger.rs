//! `PostgreSQL` reset ledger.

use super::{models::ResetRunRow, schema::reset_runs};
use crate::db::{GroundcrewPgPool, PersistenceFailure, run_blocking};
use crate::reset::{
    domain::ResetRun,
    ports::{ResetLedger, ResetLedgerError, ResetLedgerResult},
};
use async_trait::async_trait;
use diesel::prelude::*;

/// `PostgreSQL`-backed reset ledger.
#[derive(Debug, Clone)]
pub struct PostgresResetLedger {
    pool: GroundcrewPgPool,
}

impl PostgresResetLedger {
    /// Creates a ledger from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GroundcrewPgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for ResetLedgerError {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl ResetLedger for PostgresResetLedger {
    async fn last_run(&self) -> ResetLedgerResult<Option<ResetRun>> {
        run_blocking(&self.pool, move |connection| {
            let row = reset_runs::table
                .order(reset_runs::business_day.desc())
                .select(ResetRunRow::as_select())
                .first::<ResetRunRow>(connection)
                .optional()
                .map_err(ResetLedgerError::persistence)?;
            row.map(row_to_run).transpose()
        })
        .await
    }

    async fn record(&self, run: &ResetRun) -> ResetLedgerResult<()> {
        let row = to_row(run)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(reset_runs::table)
                .values(&row)
                .on_conflict(reset_runs::business_day)
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(ResetLedgerError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn to_row(run: &ResetRun) -> ResetLedgerResult<ResetRunRow> {
    Ok(ResetRunRow {
        business_day: run.business_day,
        completed_at: run.completed_at,
        archived: i32::try_from(run.archived).map_err(ResetLedgerError::persistence)?,
        carried_forward: i32::try_from(run.carried_forward).map_err(ResetLedgerError::persistence)?,
        released: i32::try_from(run.released).map_err(ResetLedgerError::persistence)?,
    })
}

fn row_to_run(row: ResetRunRow) -> ResetLedgerResult<ResetRun> {
    Ok(ResetRun {
        business_day: row.business_day,
        completed_at: row.completed_at,
        archived: u32::try_from(row.archived).map_err(ResetLedgerError::persistence)?,
        carried_forward: u32::try_from(row.carried_forward).map_err(ResetLedgerError::persistence)?,
        released: u32::try_from(row.released).map_err(ResetLedgerError::persistence)?,
    })
}
