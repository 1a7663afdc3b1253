//! Diesel row models for employee persistence.

use super::schema::employees;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row and upsert payload for employee records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    /// Messaging user identifier.
    pub id: i64,
    /// Name shown in replies.
    pub display_name: String,
    /// Role name.
    pub role: String,
    /// Whether the employee is on the current roster.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
