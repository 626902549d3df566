//! Fixed calendar used to truncate timestamps to days
//!
//! All day comparisons in the crate go through one `Calendar` so that two
//! records are "the same day" under a single, fixed UTC offset.

use crate::error::ComputeError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest offset accepted, in minutes (UTC±14:00)
const MAX_OFFSET_MINUTES: u32 = 14 * 60;

/// Calendar with a fixed UTC offset
///
/// Deserialization goes through [`Calendar::with_offset_minutes`], so a
/// stored calendar is range-checked the same way a parsed one is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarRepr")]
pub struct Calendar {
    utc_offset_minutes: i32,
}

/// Wire shape of [`Calendar`] before validation
#[derive(Deserialize)]
struct CalendarRepr {
    utc_offset_minutes: i32,
}

impl TryFrom<CalendarRepr> for Calendar {
    type Error = ComputeError;

    fn try_from(repr: CalendarRepr) -> Result<Self, Self::Error> {
        Self::with_offset_minutes(repr.utc_offset_minutes)
    }
}

impl Calendar {
    /// UTC calendar
    pub fn utc() -> Self {
        Self::default()
    }

    /// Calendar offset from UTC by the given number of minutes (east positive)
    pub fn with_offset_minutes(minutes: i32) -> Result<Self, ComputeError> {
        if minutes.unsigned_abs() > MAX_OFFSET_MINUTES {
            return Err(ComputeError::InvalidTimezone(format!(
                "offset of {minutes} minutes is out of range"
            )));
        }
        Ok(Self {
            utc_offset_minutes: minutes,
        })
    }

    /// Parse "UTC", "Z" or an offset such as "+02:00"
    pub fn parse(tz: &str) -> Result<Self, ComputeError> {
        let trimmed = tz.trim();
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::utc());
        }

        let offset: FixedOffset = trimmed
            .parse()
            .map_err(|_| ComputeError::InvalidTimezone(tz.to_string()))?;
        Self::with_offset_minutes(offset.local_minus_utc() / 60)
    }

    pub fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Calendar day a timestamp falls on
    pub fn day_of(&self, timestamp: &DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.offset()).date_naive()
    }

    /// Local midnight of a calendar day, expressed in UTC
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let local = date.and_time(NaiveTime::MIN);
        let utc = local - Duration::seconds(i64::from(self.utc_offset_minutes) * 60);
        Utc.from_utc_datetime(&utc)
    }

    /// Whether two timestamps fall on the same calendar day
    pub fn is_same_day(&self, a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }
}

impl fmt::Display for Calendar {
    /// Formats as "UTC" or "+HH:MM", the forms [`Calendar::parse`] accepts
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.utc_offset_minutes == 0 {
            return f.write_str("UTC");
        }
        let sign = if self.utc_offset_minutes < 0 { '-' } else { '+' };
        let minutes = self.utc_offset_minutes.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
    }
}
