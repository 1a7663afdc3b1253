//! Tick loop that triggers the reset when the business day advances.

use super::{ResetError, ResetService};
use crate::assignment::ports::AssignmentRepository;
use crate::job::ports::JobRepository;
use crate::reset::{
    domain::{AlertKind, OperationalAlert, ResetReport},
    ports::{AlertSink, ResetLedger},
};
use crate::staff::ports::EmployeeRepository;
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Default polling interval.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of failed ticks in a row before alerting.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// The current business day was already reset.
    Idle,
    /// The reset ran (or found the day already recorded).
    Ran(ResetReport),
    /// The reset failed and will be retried on the next tick.
    Failed {
        /// Failures in a row including this one.
        consecutive_failures: u32,
        /// Error from this attempt.
        error: ResetError,
    },
}

#[derive(Debug, Default)]
struct SchedulerState {
    last_completed: Option<NaiveDate>,
    consecutive_failures: u32,
    alerted: bool,
}

/// Polls the clock and runs the reset once per business day.
pub struct ResetScheduler<J, A, S, L, C, K>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
    K: AlertSink,
{
    service: ResetService<J, A, S, L, C>,
    clock: Arc<C>,
    alerts: Arc<K>,
    tick_interval: Duration,
    max_consecutive_failures: u32,
    state: Mutex<SchedulerState>,
}

impl<J, A, S, L, C, K> ResetScheduler<J, A, S, L, C, K>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    L: ResetLedger,
    C: Clock + Send + Sync,
    K: AlertSink,
{
    /// Creates a scheduler with default interval and alert threshold.
    #[must_use]
    pub fn new(service: ResetService<J, A, S, L, C>, clock: Arc<C>, alerts: Arc<K>) -> Self {
        Self {
            service,
            clock,
            alerts,
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    /// Sets the polling interval.
    #[must_use]
    pub const fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Sets how many failed ticks in a row raise an alert. Zero means one.
    #[must_use]
    pub const fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = if max == 0 { 1 } else { max };
        self
    }

    /// Checks the clock and runs the reset if the business day moved on.
    ///
    /// Failures are counted; once the count reaches the threshold a single
    /// alert is raised for the streak. A success clears the streak.
    pub async fn tick(&self) -> TickOutcome {
        let mut state = self.state.lock().await;
        let now = self.clock.local().naive_local();
        let business_day = self.service.boundary().business_day(now);
        if state.last_completed.is_some_and(|day| day >= business_day) {
            return TickOutcome::Idle;
        }

        match self.service.run_reset(now).await {
            Ok(report) => {
                if state.consecutive_failures > 0 {
                    tracing::info!(
                        business_day = %business_day,
                        failures = state.consecutive_failures,
                        "daily reset recovered"
                    );
                }
                state.last_completed = Some(business_day);
                state.consecutive_failures = 0;
                state.alerted = false;
                TickOutcome::Ran(report)
            }
            Err(error) => {
                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                tracing::warn!(
                    business_day = %business_day,
                    failures = state.consecutive_failures,
                    error = %error,
                    "daily reset failed, will retry"
                );
                if state.consecutive_failures >= self.max_consecutive_failures && !state.alerted {
                    self.alerts.raise(&OperationalAlert {
                        kind: AlertKind::ResetFailing,
                        message: format!(
                            "daily reset for {business_day} failed {} times in a row: {error}",
                            state.consecutive_failures
                        ),
                        consecutive_failures: state.consecutive_failures,
                        raised_at: self.clock.utc(),
                    });
                    state.alerted = true;
                }
                TickOutcome::Failed {
                    consecutive_failures: state.consecutive_failures,
                    error,
                }
            }
        }
    }

    /// Ticks on the configured interval until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.tick_interval.as_secs(),
            boundary = %self.service.boundary(),
            "reset scheduler started"
        );
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("reset scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}
