//! Diesel schema for job persistence.

diesel::table! {
    /// Site jobs and their lifecycle state.
    jobs (id) {
        /// Job identifier.
        id -> Uuid,
        /// Serialized site details.
        details -> Jsonb,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Assigned employee, if any.
        assignee_id -> Nullable<Int8>,
        /// Day the job is scheduled for.
        scheduled_day -> Date,
        /// Serialized photo references.
        photos -> Jsonb,
        /// Director notes.
        director_notes -> Nullable<Text>,
        /// Serialized note log.
        notes -> Jsonb,
        /// Carried over from an earlier day.
        overdue -> Bool,
        /// When work started.
        started_at -> Nullable<Timestamptz>,
        /// When work finished.
        finished_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
