//! Port definitions for the reset ledger and operator alerts.

mod alert;
mod ledger;

#[cfg(test)]
pub use alert::MockAlertSink;
pub use alert::AlertSink;
pub use ledger::{ResetLedger, ResetLedgerError, ResetLedgerResult};
