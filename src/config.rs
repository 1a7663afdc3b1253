//! Process configuration read from the environment.
//!
//! | Variable                        | Default            |
//! |---------------------------------|--------------------|
//! | `GROUNDCREW_BOT_TOKEN`          | required unless developer mode |
//! | `DATABASE_URL`                  | unset: in-memory storage |
//! | `GROUNDCREW_DB_POOL_SIZE`       | `4`                |
//! | `GROUNDCREW_RESET_TIME`         | `00:00`            |
//! | `GROUNDCREW_PHOTO_LIMIT`        | `25`               |
//! | `GROUNDCREW_DIRECTORS`          | empty              |
//! | `GROUNDCREW_EMPLOYEES`          | empty              |
//! | `GROUNDCREW_DEVELOPERS`         | empty              |
//! | `GROUNDCREW_DEVELOPER_MODE`     | `false`            |
//! | `GROUNDCREW_RESET_TICK_SECS`    | `60`               |
//! | `GROUNDCREW_RESET_MAX_FAILURES` | `3`                |
//! | `GROUNDCREW_STORAGE_RETRIES`    | `3`                |
//!
//! Roster variables are comma-separated `id:name` pairs, for example
//! `GROUNDCREW_EMPLOYEES="101:Andy,102:Alex"`.

use crate::job::domain::DEFAULT_PHOTO_LIMIT;
use crate::reset::domain::ResetBoundary;
use crate::reset::services::{DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_TICK_INTERVAL};
use crate::retry::RetryPolicy;
use crate::staff::domain::{DisplayName, EmployeeId, Role, RosterEntry};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const BOT_TOKEN: &str = "GROUNDCREW_BOT_TOKEN";
const DATABASE_URL: &str = "DATABASE_URL";
const DB_POOL_SIZE: &str = "GROUNDCREW_DB_POOL_SIZE";
const RESET_TIME: &str = "GROUNDCREW_RESET_TIME";
const PHOTO_LIMIT: &str = "GROUNDCREW_PHOTO_LIMIT";
const DIRECTORS: &str = "GROUNDCREW_DIRECTORS";
const EMPLOYEES: &str = "GROUNDCREW_EMPLOYEES";
const DEVELOPERS: &str = "GROUNDCREW_DEVELOPERS";
const DEVELOPER_MODE: &str = "GROUNDCREW_DEVELOPER_MODE";
const RESET_TICK_SECS: &str = "GROUNDCREW_RESET_TICK_SECS";
const RESET_MAX_FAILURES: &str = "GROUNDCREW_RESET_MAX_FAILURES";
const STORAGE_RETRIES: &str = "GROUNDCREW_STORAGE_RETRIES";

const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value of the wrong shape.
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The same user id appears more than once across the roster lists.
    #[error("user {0} appears more than once in the roster")]
    DuplicateRosterEntry(EmployeeId),
}

/// Fully parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Messaging bot token; absent only in developer mode.
    pub bot_token: Option<String>,
    /// `PostgreSQL` connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: u32,
    /// Local time at which business days begin.
    pub reset_boundary: ResetBoundary,
    /// Maximum photos per job.
    pub photo_limit: usize,
    /// Configured crew members.
    pub roster: Vec<RosterEntry>,
    /// Whether developer accounts receive every capability.
    pub developer_mode: bool,
    /// Reset scheduler polling interval.
    pub reset_tick: Duration,
    /// Failed reset ticks in a row before alerting.
    pub reset_max_failures: u32,
    /// Attempts per storage call, including the first.
    pub storage_retries: u32,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's
    /// value or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let developer_mode = read(DEVELOPER_MODE)
            .map(|value| parse_bool(DEVELOPER_MODE, &value))
            .transpose()?
            .unwrap_or(false);
        let bot_token = read(BOT_TOKEN);
        if bot_token.is_none() && !developer_mode {
            return Err(ConfigError::Missing(BOT_TOKEN));
        }

        let reset_boundary = read(RESET_TIME)
            .map(|value| {
                ResetBoundary::parse(&value).map_err(|err| ConfigError::Invalid {
                    name: RESET_TIME,
                    value: value.clone(),
                    reason: err.to_string(),
                })
            })
            .transpose()?
            .unwrap_or(ResetBoundary::MIDNIGHT);

        let mut roster = Vec::new();
        for (name, role) in [
            (DIRECTORS, Role::Director),
            (EMPLOYEES, Role::Employee),
            (DEVELOPERS, Role::Developer),
        ] {
            if let Some(value) = read(name) {
                roster.extend(parse_roster(name, &value, role)?);
            }
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = roster.iter().find(|entry| !seen.insert(entry.id)) {
            return Err(ConfigError::DuplicateRosterEntry(duplicate.id));
        }

        let tick_secs = parse_or(RESET_TICK_SECS, read(RESET_TICK_SECS), DEFAULT_TICK_INTERVAL.as_secs())?;
        Ok(Self {
            bot_token,
            database_url: read(DATABASE_URL),
            db_pool_size: positive(DB_POOL_SIZE, read(DB_POOL_SIZE), DEFAULT_POOL_SIZE)?,
            reset_boundary,
            photo_limit: positive(PHOTO_LIMIT, read(PHOTO_LIMIT), DEFAULT_PHOTO_LIMIT)?,
            roster,
            developer_mode,
            reset_tick: Duration::from_secs(tick_secs.max(1)),
            reset_max_failures: positive(
                RESET_MAX_FAILURES,
                read(RESET_MAX_FAILURES),
                DEFAULT_MAX_CONSECUTIVE_FAILURES,
            )?,
            storage_retries: positive(
                STORAGE_RETRIES,
                read(STORAGE_RETRIES),
                RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            )?,
        })
    }

    /// Returns the storage retry policy implied by the configuration.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default().with_max_attempts(self.storage_retries)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_owned(),
            reason: "expected true or false".to_owned(),
        }),
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: err.to_string(),
        })
    })
}

fn positive<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let raw = value.clone().unwrap_or_default();
    let parsed = parse_or(name, value, default)?;
    if parsed <= T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(parsed)
}

fn parse_roster(name: &'static str, value: &str, role: Role) -> Result<Vec<RosterEntry>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let invalid = |reason: String| ConfigError::Invalid {
                name,
                value: item.to_owned(),
                reason,
            };
            let (raw_id, raw_name) = item
                .split_once(':')
                .ok_or_else(|| invalid("expected id:name".to_owned()))?;
            let id = EmployeeId::from_str(raw_id).map_err(|err| invalid(err.to_string()))?;
            let display_name = DisplayName::new(raw_name).map_err(|err| invalid(err.to_string()))?;
            Ok(RosterEntry::new(id, display_name, role))
        })
        .collect()
}
