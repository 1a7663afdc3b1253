//! Job registry: the authoritative record of every site job.
//!
//! Jobs move `pending → assigned → in_progress → completed` one step at a
//! time; only a director override bypasses the order and only the daily
//! reset archives. Photo count is capped per job.
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
