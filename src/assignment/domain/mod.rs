//! Domain model for daily employee-to-job assignments.

mod assignment;
mod error;
mod listing;
mod status;

pub use assignment::{Assignment, AssignmentId, PersistedAssignmentData};
pub use error::{AssignmentDomainError, ParseAssignmentStatusError};
pub use listing::JobListing;
pub use status::AssignmentStatus;
