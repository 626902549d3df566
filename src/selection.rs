//! Cursor selection
//!
//! Maps interactive chart input to the sample it points at. Two models exist:
//! - date cursors for bar and line charts (exact calendar-day match)
//! - cumulative offsets for the radial chart, where each sample spans an
//!   angle proportional to its value
//!
//! [`SelectionFeedback`] reduces a stream of resolved selections to the
//! moments the highlighted weekday actually changes.

use crate::calendar::Calendar;
use crate::types::Sample;
use chrono::{DateTime, NaiveDate, Utc};

/// Resolver for both selection models
pub struct SelectionResolver;

impl SelectionResolver {
    /// Sample on exactly the cursor's calendar day.
    ///
    /// There is no nearest-neighbour fallback: a cursor over a day without
    /// data selects nothing.
    pub fn by_date(samples: &[Sample], cursor: Option<NaiveDate>) -> Option<&Sample> {
        let cursor = cursor?;
        samples.iter().find(|s| s.date == cursor)
    }

    /// Same as [`SelectionResolver::by_date`] for a raw timestamp cursor
    pub fn by_timestamp<'a>(
        samples: &'a [Sample],
        cursor: Option<DateTime<Utc>>,
        calendar: &Calendar,
    ) -> Option<&'a Sample> {
        Self::by_date(samples, cursor.map(|ts| calendar.day_of(&ts)))
    }

    /// Sample whose angular span contains the cumulative cursor offset.
    ///
    /// Walks the sequence summing values and returns the first sample where
    /// the running total reaches the offset. Without a cursor the first
    /// sample is selected, since the radial chart always highlights a slice.
    /// Offsets past the total select nothing.
    pub fn by_offset(samples: &[Sample], cursor: Option<f64>) -> Option<&Sample> {
        let Some(offset) = cursor else {
            return samples.first();
        };

        let mut total = 0.0;
        samples.iter().find(|s| {
            total += s.value;
            offset <= total
        })
    }
}

/// Tracks the highlighted weekday across cursor updates.
///
/// Fine-grained drags resolve to the same sample many times in a row; only a
/// change of weekday should trigger haptics or animation downstream.
#[derive(Debug, Clone, Default)]
pub struct SelectionFeedback {
    last_weekday: Option<u32>,
}

impl SelectionFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest resolved selection.
    ///
    /// Returns true when a sample is selected and its weekday differs from the
    /// previously observed selection. Clearing the selection never fires but
    /// resets the tracker, so the next selection fires.
    ///
    /// Going from no selection to a selection fires deliberately: the first
    /// touch on a chart gets the same feedback as moving to a new weekday,
    /// rather than only old-to-new weekday transitions firing.
    pub fn observe(&mut self, resolved: Option<&Sample>) -> bool {
        let weekday = resolved.map(Sample::weekday_number);
        let changed = weekday.is_some() && weekday != self.last_weekday;
        self.last_weekday = weekday;
        changed
    }

    /// Weekday number of the last observed selection
    pub fn current_weekday(&self) -> Option<u32> {
        self.last_weekday
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weekday::WeekdayAggregator;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn week() -> Vec<Sample> {
        // Jan 14 2024 (Sunday) through Jan 20 (Saturday)
        (14..=20)
            .map(|d| Sample::new(day(d), 1000.0 * (d - 13) as f64))
            .collect()
    }

    #[test]
    fn test_by_date_exact_match() {
        let samples = week();
        let selected = SelectionResolver::by_date(&samples, Some(day(16)));
        assert_eq!(selected, Some(&samples[2]));
    }

    #[test]
    fn test_by_date_without_match() {
        let samples = week();
        assert_eq!(SelectionResolver::by_date(&samples, Some(day(21))), None);
        assert_eq!(SelectionResolver::by_date(&samples, None), None);
        assert_eq!(SelectionResolver::by_date(&[], Some(day(16))), None);
    }

    #[test]
    fn test_by_timestamp_truncates_cursor() {
        let samples = week();
        let cursor = DateTime::parse_from_rfc3339("2024-01-17T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let utc = SelectionResolver::by_timestamp(&samples, Some(cursor), &Calendar::utc());
        assert_eq!(utc.map(|s| s.date), Some(day(17)));

        let east = Calendar::parse("+02:00").unwrap();
        let shifted = SelectionResolver::by_timestamp(&samples, Some(cursor), &east);
        assert_eq!(shifted.map(|s| s.date), Some(day(18)));
    }

    #[test]
    fn test_by_offset_walks_cumulative_spans() {
        let samples = vec![
            Sample::new(day(14), 10.0),
            Sample::new(day(15), 20.0),
            Sample::new(day(16), 30.0),
        ];

        assert_eq!(SelectionResolver::by_offset(&samples, Some(0.0)), Some(&samples[0]));
        assert_eq!(SelectionResolver::by_offset(&samples, Some(10.0)), Some(&samples[0]));
        assert_eq!(SelectionResolver::by_offset(&samples, Some(10.5)), Some(&samples[1]));
        assert_eq!(SelectionResolver::by_offset(&samples, Some(60.0)), Some(&samples[2]));
        assert_eq!(SelectionResolver::by_offset(&samples, Some(60.1)), None);
    }

    #[test]
    fn test_by_offset_defaults_to_first() {
        let samples = week();
        assert_eq!(SelectionResolver::by_offset(&samples, None), Some(&samples[0]));
        assert_eq!(SelectionResolver::by_offset(&[], None), None);
        assert_eq!(SelectionResolver::by_offset(&[], Some(5.0)), None);
    }

    #[test]
    fn test_by_offset_over_weekday_averages() {
        let averaged = WeekdayAggregator::average_by_weekday(&week());
        // Sunday spans [0, 1000], Monday (1000, 3000]
        let selected = SelectionResolver::by_offset(&averaged, Some(2500.0));
        assert_eq!(selected.map(Sample::weekday_number), Some(2));
    }

    #[test]
    fn test_feedback_fires_only_on_weekday_change() {
        let samples = week();
        let mut feedback = SelectionFeedback::new();

        assert!(feedback.observe(Some(&samples[0])));
        // Dragging within the same slice stays quiet
        assert!(!feedback.observe(Some(&samples[0])));
        assert!(!feedback.observe(Some(&samples[0])));
        assert!(feedback.observe(Some(&samples[1])));
        assert_eq!(feedback.current_weekday(), Some(2));
    }

    #[test]
    fn test_feedback_same_weekday_different_week() {
        let mut feedback = SelectionFeedback::new();
        let monday = Sample::new(day(15), 1.0);
        let next_monday = Sample::new(day(22), 2.0);

        assert!(feedback.observe(Some(&monday)));
        assert!(!feedback.observe(Some(&next_monday)));
    }

    #[test]
    fn test_first_selection_fires() {
        let samples = week();
        let mut feedback = SelectionFeedback::new();
        assert_eq!(feedback.current_weekday(), None);

        assert!(!feedback.observe(None));
        assert!(feedback.observe(Some(&samples[2])));
        assert_eq!(feedback.current_weekday(), Some(samples[2].weekday_number()));
    }

    #[test]
    fn test_feedback_clear_resets() {
        let samples = week();
        let mut feedback = SelectionFeedback::new();

        assert!(feedback.observe(Some(&samples[3])));
        assert!(!feedback.observe(None));
        assert_eq!(feedback.current_weekday(), None);
        assert!(feedback.observe(Some(&samples[3])));
    }
}
