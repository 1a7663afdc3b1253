//! Application services for the daily reset.

mod scheduler;
mod sweep;

pub use scheduler::{
    DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_TICK_INTERVAL, ResetScheduler, TickOutcome,
};
pub use sweep::{ResetError, ResetResult, ResetService};
