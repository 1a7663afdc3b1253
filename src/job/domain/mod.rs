//! Domain model for site jobs and their lifecycle.

mod dashboard;
mod details;
mod error;
mod ids;
mod job;
mod note;
mod status;

pub use dashboard::{DashboardSummary, EmployeeLoad};
pub use details::SiteDetails;
pub use error::{JobDomainError, ParseJobStatusError};
pub use ids::{JobId, PhotoRef};
pub use job::{DEFAULT_PHOTO_LIMIT, Job, PersistedJobData};
pub use note::JobNote;
pub use status::JobStatus;
