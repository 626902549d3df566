//! Rolling window filter
//!
//! Aggregation has no idea what "today" is, so callers trim sequences to the
//! window they want (the dashboard uses the last 28 days) before averaging.

use crate::types::Sample;
use chrono::{Days, NaiveDate};

/// First day of the `days`-day window ending on `today`.
///
/// Returns `None` for an empty window. A window reaching past the earliest
/// representable date starts at [`NaiveDate::MIN`].
pub fn window_start(today: NaiveDate, days: u32) -> Option<NaiveDate> {
    let span = days.checked_sub(1)?;
    Some(
        today
            .checked_sub_days(Days::new(u64::from(span)))
            .unwrap_or(NaiveDate::MIN),
    )
}

/// Keep samples dated within the `days` calendar days ending on `today`
pub fn last_days(samples: &[Sample], today: NaiveDate, days: u32) -> Vec<Sample> {
    let Some(first) = window_start(today, days) else {
        return Vec::new();
    };
    samples
        .iter()
        .filter(|s| s.date >= first && s.date <= today)
        .copied()
        .collect()
}
