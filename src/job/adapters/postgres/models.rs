//! Diesel row models for job persistence.

use super::schema::jobs;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row and write payload for job records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct JobRow {
    /// Job identifier.
    pub id: Uuid,
    /// Serialized site details.
    pub details: serde_json::Value,
    /// Lifecycle status.
    pub status: String,
    /// Assigned employee, if any.
    pub assignee_id: Option<i64>,
    /// Day the job is scheduled for.
    pub scheduled_day: NaiveDate,
    /// Serialized photo references.
    pub photos: serde_json::Value,
    /// Director notes.
    pub director_notes: Option<String>,
    /// Serialized note log.
    pub notes: serde_json::Value,
    /// Carried over from an earlier day.
    pub overdue: bool,
    /// When work started.
    pub started_at: Option<DateTime<Utc>>,
    /// When work finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
