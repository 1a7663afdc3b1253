//! Crew roster, roles and capability resolution.
//!
//! Every inbound request is resolved into an
//! [`Actor`](domain::Actor) whose capability set is derived from the
//! employee's role. Services check capabilities explicitly per operation.
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
