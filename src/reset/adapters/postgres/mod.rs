//! `PostgreSQL` adapters for the reset ledger.

mod ledger;
mod models;
mod schema;

pub use ledger::PostgresResetLedger;
