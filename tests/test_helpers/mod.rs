//! Application wiring shared by the integration and behaviour tests.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use groundcrew::app::{App, InMemoryRepositories};
use groundcrew::assignment::adapters::memory::InMemoryAssignmentRepository;
use groundcrew::command::domain::Reply;
use groundcrew::config::AppConfig;
use groundcrew::job::adapters::memory::InMemoryJobRepository;
use groundcrew::reset::adapters::memory::InMemoryResetLedger;
use groundcrew::staff::adapters::memory::InMemoryEmployeeRepository;
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Director on the base roster.
pub const DIRECTOR: i64 = 900;
/// First employee on the base roster.
pub const ANDY: i64 = 1;
/// Second employee on the base roster.
pub const ALEX: i64 = 2;
/// Developer on the base roster.
pub const DEVI: i64 = 500;

/// Application wired over in-memory stores and a settable clock.
pub type TestApp = App<
    InMemoryJobRepository,
    InMemoryAssignmentRepository,
    InMemoryEmployeeRepository,
    InMemoryResetLedger,
    ManualClock,
>;

/// Clock that reports a local time chosen by the test.
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    /// Creates a clock showing `now`.
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(to_local(now)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to_local(now);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

fn to_local(now: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&now)
        .earliest()
        .expect("test times avoid DST gaps")
}

/// A day in October 2026.
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
}

/// A local time on a day in October 2026.
pub fn at(d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    day(d).and_hms_opt(hour, minute, 0).expect("valid time")
}

/// Parses a configuration from the base variables plus `overrides`.
///
/// A `None` override unsets the variable.
pub fn config(overrides: &[(&str, Option<&str>)]) -> AppConfig {
    let mut vars: HashMap<String, String> = [
        ("GROUNDCREW_BOT_TOKEN", "test-token"),
        ("GROUNDCREW_DIRECTORS", "900:Dana"),
        ("GROUNDCREW_EMPLOYEES", "1:Andy,2:Alex"),
        ("GROUNDCREW_DEVELOPERS", "500:Devi"),
        ("GROUNDCREW_STORAGE_RETRIES", "1"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect();
    for (key, value) in overrides {
        match value {
            Some(set) => vars.insert((*key).to_owned(), (*set).to_owned()),
            None => vars.remove(*key),
        };
    }
    AppConfig::from_lookup(|name| vars.get(name).cloned()).expect("test configuration parses")
}

/// Assembled application plus the clock it reads.
pub struct TestBed {
    /// The application under test.
    pub app: TestApp,
    /// Clock shared by every service.
    pub clock: Arc<ManualClock>,
}

impl TestBed {
    /// Sends `text` as `user_id`.
    pub async fn say(&self, user_id: i64, text: &str) -> Reply {
        self.app.dispatcher().handle(user_id, text).await
    }

    /// Sends `text` as `user_id` and fails the test on an error reply.
    pub async fn ok(&self, user_id: i64, text: &str) -> String {
        let reply = self.say(user_id, text).await;
        assert!(!reply.is_error(), "`{text}` failed: {}", reply.text());
        reply.into_text()
    }

    /// Creates a job as the director and returns its id.
    pub async fn create(&self, scheduled: NaiveDate, site: &str) -> String {
        let reply = self.ok(DIRECTOR, &format!("/create {scheduled} {site}")).await;
        job_id(&reply)
    }
}

/// Builds the application at 08:00 on 12 October with its roster synced.
pub async fn test_bed(config: &AppConfig) -> TestBed {
    let clock = Arc::new(ManualClock::at(at(12, 8, 0)));
    let app = App::assemble(config, InMemoryRepositories::in_memory(), Arc::clone(&clock))
        .expect("application assembles");
    app.sync_roster(config).await.expect("roster syncs");
    TestBed { app, clock }
}

/// Extracts the job id from a `Job created.` style reply.
pub fn job_id(reply: &str) -> String {
    let (_, tail) = reply.rsplit_once('(').expect("reply names a job id");
    let (id, _) = tail.split_once(')').expect("job id is parenthesised");
    id.to_owned()
}
