//! Application services for the job registry.

mod registry;

pub use registry::{CreateJobRequest, JobRegistryError, JobRegistryResult, JobRegistryService};
