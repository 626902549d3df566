//! Health store boundary
//!
//! The platform health store is an external collaborator. This module defines
//! the interface the pipeline consumes, the validation applied to user-entered
//! values before they are appended, and a JSON-backed in-memory store used by
//! the CLI and by tests.

use crate::calendar::Calendar;
use crate::error::StoreError;
use crate::types::{MetricContext, RawRecord};
use crate::window;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of raw health records
pub trait HealthStore {
    /// Calendar the store uses to place records on days.
    ///
    /// Appended values land at local midnight in this calendar, so records
    /// must be normalized with it too.
    fn calendar(&self) -> Calendar;

    /// Raw records for `metric` on the `lookback_days` calendar days ending
    /// on `today`.
    fn fetch(
        &self,
        metric: MetricContext,
        lookback_days: u32,
        today: NaiveDate,
    ) -> Result<Vec<RawRecord>, StoreError>;

    /// Append a user-entered value for a calendar day
    fn append(
        &mut self,
        metric: MetricContext,
        date: NaiveDate,
        value: f64,
    ) -> Result<(), StoreError>;
}

/// Parse a user-entered value.
///
/// Accepts plain positive decimals: digits with an optional fractional part
/// of at most the metric's display precision. Steps come from a number pad
/// and take whole numbers only; weight takes one decimal place. Signs,
/// exponents and spelled-out values are rejected.
pub fn parse_entry_value(text: &str, metric: MetricContext) -> Result<f64, StoreError> {
    let trimmed = text.trim();
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(StoreError::InvalidValue);
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        let whole_only = metric.fraction_digits() == 0;
        if whole_only || fraction.len() > metric.fraction_digits() {
            return Err(StoreError::InvalidValue);
        }
    }

    let value: f64 = trimmed.parse().map_err(|_| StoreError::InvalidValue)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(StoreError::InvalidValue);
    }

    tracing::debug!(metric = metric.as_str(), value, "accepted entry value");
    Ok(value)
}

/// Record held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub metric: MetricContext,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// In-memory health store that can be loaded from and saved to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    calendar: Calendar,
    /// Whether the user has answered the read/write authorization request
    #[serde(default = "default_authorized")]
    authorized: bool,
    /// Metrics the user refused to let this app write
    #[serde(default)]
    sharing_denied: Vec<MetricContext>,
    #[serde(default)]
    records: Vec<StoredRecord>,
}

fn default_authorized() -> bool {
    true
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Calendar::utc())
    }
}

impl MemoryStore {
    /// Create an empty, authorized store
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            authorized: true,
            sharing_denied: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn set_calendar(&mut self, calendar: Calendar) {
        self.calendar = calendar;
    }

    pub fn set_authorized(&mut self, authorized: bool) {
        self.authorized = authorized;
    }

    /// Refuse write access for a metric
    pub fn deny_sharing(&mut self, metric: MetricContext) {
        if !self.sharing_denied.contains(&metric) {
            self.sharing_denied.push(metric);
        }
    }

    /// Insert a record with an exact timestamp
    pub fn insert(&mut self, metric: MetricContext, record: RawRecord) -> Uuid {
        let id = Uuid::new_v4();
        self.records.push(StoredRecord {
            id,
            metric,
            timestamp: record.timestamp,
            value: record.value,
        });
        id
    }

    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    /// Load a store from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the store to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl HealthStore for MemoryStore {
    fn calendar(&self) -> Calendar {
        self.calendar
    }

    fn fetch(
        &self,
        metric: MetricContext,
        lookback_days: u32,
        today: NaiveDate,
    ) -> Result<Vec<RawRecord>, StoreError> {
        if !self.authorized {
            return Err(StoreError::AuthorizationNotDetermined);
        }
        let Some(first) = window::window_start(today, lookback_days) else {
            return Err(StoreError::NoData);
        };

        let records: Vec<RawRecord> = self
            .records
            .iter()
            .filter(|r| r.metric == metric)
            .filter(|r| {
                let day = self.calendar.day_of(&r.timestamp);
                day >= first && day <= today
            })
            .map(|r| RawRecord::new(r.timestamp, r.value))
            .collect();

        tracing::debug!(
            metric = metric.as_str(),
            lookback_days,
            found = records.len(),
            "fetched records"
        );

        if records.is_empty() {
            return Err(StoreError::NoData);
        }
        Ok(records)
    }

    fn append(
        &mut self,
        metric: MetricContext,
        date: NaiveDate,
        value: f64,
    ) -> Result<(), StoreError> {
        if !self.authorized {
            return Err(StoreError::AuthorizationNotDetermined);
        }
        if self.sharing_denied.contains(&metric) {
            tracing::warn!(metric = metric.as_str(), "sharing denied");
            return Err(StoreError::SharingDenied {
                kind: metric.as_str().to_string(),
            });
        }
        if !value.is_finite() || value <= 0.0 {
            return Err(StoreError::InvalidValue);
        }

        let timestamp = self.calendar.start_of_day(date);
        self.insert(metric, RawRecord::new(timestamp, value));
        Ok(())
    }
}
