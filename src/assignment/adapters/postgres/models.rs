//! Diesel row models for assignment persistence.

use super::schema::assignments;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row and write payload for assignment records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Assignment identifier.
    pub id: Uuid,
    /// Bound employee.
    pub employee_id: i64,
    /// Bound job.
    pub job_id: Uuid,
    /// Day of work.
    pub day: NaiveDate,
    /// Assignment status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
