//! Record normalization
//!
//! This module turns raw store records into an ordered sample sequence:
//! - one sample per calendar day
//! - same-day duplicates resolved by the metric's policy
//! - ascending by date

use crate::calendar::Calendar;
use crate::types::{DuplicatePolicy, MetricContext, RawRecord, Sample};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Normalizer for converting raw records to ordered samples
pub struct Normalizer;

impl Normalizer {
    /// Normalize raw records for a metric under the given calendar
    pub fn normalize(
        records: &[RawRecord],
        context: MetricContext,
        calendar: &Calendar,
    ) -> Vec<Sample> {
        let policy = context.duplicate_policy();
        let mut by_day: BTreeMap<NaiveDate, DayValue> = BTreeMap::new();

        for record in records {
            let day = calendar.day_of(&record.timestamp);
            by_day
                .entry(day)
                .and_modify(|existing| existing.merge(policy, record))
                .or_insert_with(|| DayValue::from(record));
        }

        tracing::debug!(
            metric = context.as_str(),
            records = records.len(),
            days = by_day.len(),
            "normalized raw records"
        );

        // BTreeMap iteration is already ascending by day
        by_day
            .into_iter()
            .map(|(day, value)| Sample::new(day, value.value))
            .collect()
    }
}

/// Running value for one calendar day
struct DayValue {
    value: f64,
    latest: DateTime<Utc>,
}

impl From<&RawRecord> for DayValue {
    fn from(record: &RawRecord) -> Self {
        Self {
            value: record.value,
            latest: record.timestamp,
        }
    }
}

impl DayValue {
    fn merge(&mut self, policy: DuplicatePolicy, record: &RawRecord) {
        match policy {
            DuplicatePolicy::Sum => {
                self.value += record.value;
                self.latest = self.latest.max(record.timestamp);
            }
            DuplicatePolicy::Latest => {
                // Equal timestamps resolve to the later record in input order
                if record.timestamp >= self.latest {
                    self.value = record.value;
                    self.latest = record.timestamp;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_steps_are_summed() {
        let records = vec![
            RawRecord::new(ts("2024-01-15T08:00:00Z"), 100.0),
            RawRecord::new(ts("2024-01-15T18:30:00Z"), 250.0),
        ];
        let samples = Normalizer::normalize(&records, MetricContext::Steps, &Calendar::utc());
        assert_eq!(samples, vec![Sample::new(day(2024, 1, 15), 350.0)]);
    }

    #[test]
    fn test_same_day_weight_keeps_latest() {
        let records = vec![
            RawRecord::new(ts("2024-01-15T07:00:00Z"), 180.2),
            RawRecord::new(ts("2024-01-15T21:00:00Z"), 179.8),
        ];
        let samples = Normalizer::normalize(&records, MetricContext::Weight, &Calendar::utc());
        assert_eq!(samples, vec![Sample::new(day(2024, 1, 15), 179.8)]);

        // Input order does not matter, only timestamps do
        let reversed: Vec<RawRecord> = records.into_iter().rev().collect();
        let samples = Normalizer::normalize(&reversed, MetricContext::Weight, &Calendar::utc());
        assert_eq!(samples, vec![Sample::new(day(2024, 1, 15), 179.8)]);
    }

    #[test]
    fn test_weight_tie_resolves_to_later_record() {
        let at = ts("2024-01-15T07:00:00Z");
        let records = vec![RawRecord::new(at, 181.0), RawRecord::new(at, 180.5)];
        let samples = Normalizer::normalize(&records, MetricContext::Weight, &Calendar::utc());
        assert_eq!(samples[0].value, 180.5);
    }

    #[test]
    fn test_output_sorted_and_unique() {
        let records = vec![
            RawRecord::new(ts("2024-01-17T10:00:00Z"), 3.0),
            RawRecord::new(ts("2024-01-15T10:00:00Z"), 1.0),
            RawRecord::new(ts("2024-01-16T10:00:00Z"), 2.0),
            RawRecord::new(ts("2024-01-15T11:00:00Z"), 1.0),
        ];
        let samples = Normalizer::normalize(&records, MetricContext::Steps, &Calendar::utc());

        assert_eq!(samples.len(), 3);
        assert!(samples.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(samples[0], Sample::new(day(2024, 1, 15), 2.0));
    }

    #[test]
    fn test_calendar_offset_groups_by_local_day() {
        let records = vec![
            RawRecord::new(ts("2024-01-15T20:00:00Z"), 500.0),
            // Past midnight UTC but still Jan 15 in UTC-5
            RawRecord::new(ts("2024-01-16T03:00:00Z"), 700.0),
        ];
        let calendar = Calendar::parse("-05:00").unwrap();
        let samples = Normalizer::normalize(&records, MetricContext::Steps, &calendar);
        assert_eq!(samples, vec![Sample::new(day(2024, 1, 15), 1200.0)]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let calendar = Calendar::utc();
        let records = vec![
            RawRecord::new(ts("2024-01-15T07:00:00Z"), 180.2),
            RawRecord::new(ts("2024-01-16T07:00:00Z"), 179.6),
            RawRecord::new(ts("2024-01-16T09:00:00Z"), 179.4),
        ];
        let once = Normalizer::normalize(&records, MetricContext::Weight, &calendar);

        let replayed: Vec<RawRecord> = once
            .iter()
            .map(|s| RawRecord::new(calendar.start_of_day(s.date), s.value))
            .collect();
        let twice = Normalizer::normalize(&replayed, MetricContext::Weight, &calendar);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_and_single_input() {
        let calendar = Calendar::utc();
        assert!(Normalizer::normalize(&[], MetricContext::Steps, &calendar).is_empty());

        let single = vec![RawRecord::new(ts("2024-01-15T07:00:00Z"), 42.0)];
        let samples = Normalizer::normalize(&single, MetricContext::Steps, &calendar);
        assert_eq!(samples, vec![Sample::new(day(2024, 1, 15), 42.0)]);
    }
}
