//! Diesel row models for the reset ledger.

use super::schema::reset_runs;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row and upsert payload for ledger entries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = reset_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResetRunRow {
    /// Business day the reset ran for.
    pub business_day: NaiveDate,
    /// When the run finished.
    pub completed_at: DateTime<Utc>,
    /// Number of archived jobs.
    pub archived: i32,
    /// Number of carried jobs.
    pub carried_forward: i32,
    /// Number of released jobs.
    pub released: i32,
}
