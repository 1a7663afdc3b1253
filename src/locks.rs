//! Per-job mutual exclusion.
//!
//! Every read-modify-write of a job runs while holding that job's guard.
//! Guards for different jobs never contend. A job's slot is dropped from
//! the registry when its last guard is released with nobody waiting.

use crate::job::domain::JobId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of per-job async mutexes.
#[derive(Debug, Clone, Default)]
pub struct JobLocks {
    slots: Slots,
}

type Slots = Arc<Mutex<HashMap<JobId, Arc<AsyncMutex<()>>>>>;

/// Exclusive access to one job until dropped.
#[derive(Debug)]
pub struct JobGuard {
    job_id: JobId,
    slots: Slots,
    guard: OwnedMutexGuard<()>,
}

impl JobGuard {
    /// Returns the locked job's identifier.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns whether this guard covers `job_id`.
    #[must_use]
    pub fn covers(&self, job_id: JobId) -> bool {
        self.job_id == job_id
    }
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // The registry and this guard are the only owners: no waiters.
        if Arc::strong_count(OwnedMutexGuard::mutex(&self.guard)) <= 2 {
            slots.remove(&self.job_id);
        }
    }
}

impl JobLocks {
    /// Creates an empty lock registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `job_id`.
    pub async fn acquire(&self, job_id: JobId) -> JobGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(job_id).or_default())
        };
        JobGuard {
            job_id,
            slots: Arc::clone(&self.slots),
            guard: slot.lock_owned().await,
        }
    }

    /// Returns the number of tracked jobs.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
