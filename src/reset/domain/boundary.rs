//! Local-time boundary that separates business days.

use super::ResetDomainError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Local time of day at which a new business day begins.
///
/// With a boundary of `02:00`, `01:30` on the 13th still belongs to the
/// business day of the 12th.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetBoundary(NaiveTime);

impl ResetBoundary {
    /// Midnight boundary.
    pub const MIDNIGHT: Self = Self(NaiveTime::MIN);

    /// Creates a boundary at `time`.
    #[must_use]
    pub const fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Parses an `HH:MM` boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ResetDomainError::InvalidBoundary`] for anything else.
    pub fn parse(value: &str) -> Result<Self, ResetDomainError> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ResetDomainError::InvalidBoundary(value.to_owned()))
    }

    /// Returns the boundary time.
    #[must_use]
    pub const fn time(self) -> NaiveTime {
        self.0
    }

    /// Returns the business day that `now` (local time) falls in.
    #[must_use]
    pub fn business_day(self, now: NaiveDateTime) -> NaiveDate {
        let offset = self.0.signed_duration_since(NaiveTime::MIN);
        now.checked_sub_signed(offset)
            .map_or_else(|| now.date(), |shifted| shifted.date())
    }
}

impl fmt::Display for ResetBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
