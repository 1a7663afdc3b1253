//! In-memory reset ledger.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::reset::{
    domain::ResetRun,
    ports::{ResetLedger, ResetLedgerError, ResetLedgerResult},
};

/// Thread-safe in-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResetLedger {
    runs: Arc<RwLock<BTreeMap<NaiveDate, ResetRun>>>,
}

impl InMemoryResetLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> ResetLedgerError {
    ResetLedgerError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ResetLedger for InMemoryResetLedger {
    async fn last_run(&self) -> ResetLedgerResult<Option<ResetRun>> {
        let runs = self.runs.read().map_err(poisoned)?;
        Ok(runs.values().next_back().cloned())
    }

    async fn record(&self, run: &ResetRun) -> ResetLedgerResult<()> {
        let mut runs = self.runs.write().map_err(poisoned)?;
        runs.insert(run.business_day, run.clone());
        Ok(())
    }
}
