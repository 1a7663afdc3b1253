//! Alert sink that writes to the log.

use crate::reset::{domain::OperationalAlert, ports::AlertSink};

/// Emits alerts as `error` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn raise(&self, alert: &OperationalAlert) {
        tracing::error!(
            alert = %alert.kind,
            consecutive_failures = alert.consecutive_failures,
            raised_at = %alert.raised_at,
            "{}",
            alert.message
        );
    }
}
