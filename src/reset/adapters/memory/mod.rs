//! In-memory reset adapters.

mod ledger;

pub use ledger::InMemoryResetLedger;
