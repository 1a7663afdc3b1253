//! Outbound port for operator alerts.

use crate::reset::domain::OperationalAlert;

/// Delivers operational alerts to whoever watches the system.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSink: Send + Sync {
    /// Raises `alert`. Delivery failures are the sink's concern.
    fn raise(&self, alert: &OperationalAlert);
}
