//! Port definitions for job persistence.

mod repository;

pub use repository::{JobRepository, JobRepositoryError, JobRepositoryResult};
