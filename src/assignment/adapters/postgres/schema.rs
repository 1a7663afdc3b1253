//! Diesel schema for assignment persistence.

diesel::table! {
    /// Employee-to-job bindings per day.
    assignments (id) {
        /// Assignment identifier.
        id -> Uuid,
        /// Bound employee.
        employee_id -> Int8,
        /// Bound job.
        job_id -> Uuid,
        /// Day of work.
        day -> Date,
        /// Assignment status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
