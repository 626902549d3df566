//! Core types for the Trackline transformation layer
//!
//! Every stage passes plain owned vectors of these values around; nothing here
//! holds shared state.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Health metric a sequence belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricContext {
    Steps,
    Weight,
}

impl MetricContext {
    pub const ALL: [MetricContext; 2] = [MetricContext::Steps, MetricContext::Weight];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricContext::Steps => "steps",
            MetricContext::Weight => "weight",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricContext::Steps => "Steps",
            MetricContext::Weight => "Weight",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricContext::Steps => "steps",
            MetricContext::Weight => "lbs",
        }
    }

    /// How same-day records collapse into one sample
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        match self {
            // Step counts are cumulative over the day
            MetricContext::Steps => DuplicatePolicy::Sum,
            // Weight is a point-in-time reading
            MetricContext::Weight => DuplicatePolicy::Latest,
        }
    }

    /// Number of fraction digits shown for values of this metric
    pub fn fraction_digits(&self) -> usize {
        match self {
            MetricContext::Steps => 0,
            MetricContext::Weight => 1,
        }
    }

    /// Format a value with this metric's display precision
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.fraction_digits(), value)
    }
}

impl std::str::FromStr for MetricContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "steps" => Ok(MetricContext::Steps),
            "weight" => Ok(MetricContext::Weight),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// Resolution applied to records that land on the same calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Add all same-day values together
    Sum,
    /// Keep the chronologically last value
    Latest,
}

/// Raw record as handed over by a health store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// When the record was taken (UTC)
    pub timestamp: DateTime<Utc>,
    /// Recorded value
    pub value: f64,
}

impl RawRecord {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Canonical (day, value) point consumed by every chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Calendar day this sample represents
    pub date: NaiveDate,
    pub value: f64,
}

impl Sample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    /// Weekday number with Sunday = 1 through Saturday = 7
    pub fn weekday_number(&self) -> u32 {
        self.date.weekday().number_from_sunday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_numbering_starts_on_sunday() {
        // 2024-01-14 is a Sunday
        let sunday = Sample::new(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(), 1.0);
        let saturday = Sample::new(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(), 1.0);
        assert_eq!(sunday.weekday_number(), 1);
        assert_eq!(saturday.weekday_number(), 7);
    }

    #[test]
    fn test_metric_precision() {
        assert_eq!(MetricContext::Steps.format_value(8432.7), "8433");
        assert_eq!(MetricContext::Weight.format_value(179.84), "179.8");
    }

    #[test]
    fn test_metric_policies() {
        assert_eq!(MetricContext::Steps.duplicate_policy(), DuplicatePolicy::Sum);
        assert_eq!(
            MetricContext::Weight.duplicate_policy(),
            DuplicatePolicy::Latest
        );
        assert_eq!("Weight".parse::<MetricContext>(), Ok(MetricContext::Weight));
        assert!("sleep".parse::<MetricContext>().is_err());
    }

    #[test]
    fn test_sample_serialization() {
        let sample = Sample::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 8500.0);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"date":"2024-01-15","value":8500.0}"#);
    }
}
