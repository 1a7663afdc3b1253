//! Domain model for the daily reset.

mod alert;
mod boundary;
mod error;
mod report;

pub use alert::{AlertKind, OperationalAlert};
pub use boundary::ResetBoundary;
pub use error::ResetDomainError;
pub use report::{ResetOutcome, ResetReport, ResetRun};
