//! Repository port recording which business days have been reset.

use crate::reset::domain::ResetRun;
use crate::retry::Transient;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ledger operations.
pub type ResetLedgerResult<T> = Result<T, ResetLedgerError>;

/// Persistent record of completed resets.
#[async_trait]
pub trait ResetLedger: Send + Sync {
    /// Returns the run with the latest business day, if any.
    async fn last_run(&self) -> ResetLedgerResult<Option<ResetRun>>;

    /// Records a completed run, replacing any entry for the same day.
    async fn record(&self, run: &ResetRun) -> ResetLedgerResult<()>;
}

/// Errors returned by ledger implementations.
#[derive(Debug, Clone, Error)]
pub enum ResetLedgerError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ResetLedgerError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl Transient for ResetLedgerError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
