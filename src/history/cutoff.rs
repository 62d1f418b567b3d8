//! Time window for a run

use crate::{GglError, Result};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Days of history shown when no `--until` date is given
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Date format accepted by `--until`
pub const UNTIL_FORMAT: &str = "%Y-%m-%d";

/// Earliest author time included in a run
///
/// Commits authored exactly at the cutoff are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeCutoff(DateTime<Utc>);

impl TimeCutoff {
    pub fn new<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        Self(at.with_timezone(&Utc))
    }

    /// [`DEFAULT_WINDOW_DAYS`] before `now`
    pub fn default_window<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        Self::new(now - Duration::days(DEFAULT_WINDOW_DAYS))
    }

    /// Midnight local time on a `YYYY-MM-DD` date
    pub fn from_date(date: &str) -> Result<Self> {
        Self::from_date_in(date, &Local)
    }

    /// Midnight on a `YYYY-MM-DD` date in `tz`
    pub fn from_date_in<Tz: TimeZone>(date: &str, tz: &Tz) -> Result<Self> {
        let invalid = || {
            GglError::Input(format!(
                "Failed to parse 'until' date '{}': expected YYYY-MM-DD, e.g. 2022-12-31",
                date
            ))
        };

        let day = NaiveDate::parse_from_str(date.trim(), UNTIL_FORMAT).map_err(|_| invalid())?;
        let midnight = day.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        let local = first_instant_from(tz, midnight).ok_or_else(invalid)?;

        Ok(Self::new(local))
    }

    /// Resolve the cutoff for a run from an optional `--until` value
    pub fn resolve<Tz: TimeZone>(until: Option<&str>, now: DateTime<Tz>) -> Result<Self> {
        match until {
            Some(date) => Self::from_date(date),
            None => Ok(Self::default_window(now)),
        }
    }

    /// Whether a commit authored at `when` is inside the window
    pub fn includes(&self, when: &DateTime<FixedOffset>) -> bool {
        when.with_timezone(&Utc) >= self.0
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

/// First existing local instant at or after `start` on the same day
///
/// A daylight-saving gap can swallow local midnight; the day then begins
/// at the end of the gap.
fn first_instant_from<Tz: TimeZone>(tz: &Tz, start: NaiveDateTime) -> Option<DateTime<Tz>> {
    let mut candidate = start;
    while candidate.date() == start.date() {
        if let Some(local) = tz.from_local_datetime(&candidate).earliest() {
            return Some(local);
        }
        candidate += Duration::minutes(1);
    }
    None
}
