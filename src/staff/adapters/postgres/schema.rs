//! Diesel schema for employee persistence.

diesel::table! {
    /// Crew roster.
    employees (id) {
        /// Messaging user identifier.
        id -> Int8,
        /// Name shown in replies.
        #[max_length = 255]
        display_name -> Varchar,
        /// Role name.
        #[max_length = 50]
        role -> Varchar,
        /// Whether the employee is on the current roster.
        active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
