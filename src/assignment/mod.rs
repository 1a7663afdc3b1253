//! Daily assignments: which employee works which job on which day.
//!
//! At most one active assignment exists per (employee, day) and per job.
//! An assignment completes with its job and is released when the job is
//! unassigned or handed back by the daily reset.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
