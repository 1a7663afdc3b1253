//! Diesel schema for the reset ledger.

diesel::table! {
    /// One row per reset business day.
    reset_runs (business_day) {
        /// Business day the reset ran for.
        business_day -> Date,
        /// When the run finished.
        completed_at -> Timestamptz,
        /// Number of archived jobs.
        archived -> Int4,
        /// Number of carried jobs.
        carried_forward -> Int4,
        /// Number of released jobs.
        released -> Int4,
    }
}
