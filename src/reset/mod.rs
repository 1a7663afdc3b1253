//! Daily reset: sweeps the job set once per business day.
//!
//! The business day starts at a configured local time. At the first tick
//! past the boundary, completed jobs are archived and unfinished ones carried
//! to the new day. A ledger records each reset day so restarts neither
//! repeat nor skip a reset.
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
