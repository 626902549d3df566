//! Dashboard pipeline
//!
//! This module provides the public entry point for hosts. It fetches the
//! windows each chart needs from a [`HealthStore`] and runs them through the
//! transformation stages:
//!
//! 1. Normalizer - one sample per calendar day
//! 2. WeekdayAggregator - per-weekday averages for the radial chart
//! 3. DifferentialCalculator - day-over-day weight change
//! 4. stats - averages and baselines for titles and axes

use crate::calendar::Calendar;
use crate::differential::DifferentialCalculator;
use crate::error::{ComputeError, StoreError};
use crate::normalizer::Normalizer;
use crate::settings::Settings;
use crate::stats;
use crate::store::HealthStore;
use crate::types::{MetricContext, RawRecord, Sample};
use crate::weekday::WeekdayAggregator;
use crate::window;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Chart-ready data for one metric's main chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChart {
    pub metric: MetricContext,
    pub samples: Vec<Sample>,
    /// Mean value, 0 without data
    pub average: f64,
    /// Lowest value, 0 without data
    pub min: f64,
    /// Subtitle shown under the chart title
    pub subtitle: String,
}

impl MetricChart {
    pub fn new(metric: MetricContext, samples: Vec<Sample>) -> Self {
        let average = stats::sample_mean(&samples);
        let min = stats::sample_min(&samples);
        let subtitle = match metric {
            // Step averages are shown as whole steps, truncated
            MetricContext::Steps => format!("Avg {} steps", average.trunc() as i64),
            MetricContext::Weight => {
                format!("Avg {} {}", metric.format_value(average), metric.unit())
            }
        };

        Self {
            metric,
            samples,
            average,
            min,
            subtitle,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Last day included in every window
    pub today: NaiveDate,
    pub window_days: u32,
    pub steps: MetricChart,
    /// Average steps per weekday over the window
    pub step_weekday_averages: Vec<Sample>,
    pub weights: MetricChart,
    /// Average day-over-day weight change per weekday
    pub weight_weekday_diffs: Vec<Sample>,
    pub weight_goal: Option<f64>,
}

/// Builds [`Dashboard`] values from a store
pub struct DashboardBuilder {
    settings: Settings,
    /// Calendar pinned by the settings, `None` to follow the store
    configured: Option<Calendar>,
}

impl DashboardBuilder {
    pub fn new(settings: Settings) -> Result<Self, ComputeError> {
        let configured = settings.calendar()?;
        Ok(Self {
            settings,
            configured,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn configured_calendar(&self) -> Option<&Calendar> {
        self.configured.as_ref()
    }

    /// Fetch and transform all dashboard data ending on `today`.
    ///
    /// Records are placed on days with the store's calendar; a configured
    /// timezone that disagrees with it is an error. A metric without data
    /// produces empty charts; any other store error is returned to the
    /// caller.
    pub fn build(
        &self,
        store: &dyn HealthStore,
        today: NaiveDate,
    ) -> Result<Dashboard, DashboardError> {
        let calendar = self.settings.calendar_for(store.calendar())?;
        let window_days = self.settings.window_days;

        let step_records = fetch_or_empty(store, MetricContext::Steps, window_days, today)?;
        let steps =
            window_samples(&step_records, MetricContext::Steps, &calendar, today, window_days);
        let step_weekday_averages = WeekdayAggregator::average_by_weekday(&steps);

        let weight_records = fetch_or_empty(store, MetricContext::Weight, window_days, today)?;
        let weights =
            window_samples(&weight_records, MetricContext::Weight, &calendar, today, window_days);

        let diff_days = self.settings.differential_fetch_days();
        let diff_records = fetch_or_empty(store, MetricContext::Weight, diff_days, today)?;
        let diff_source =
            window_samples(&diff_records, MetricContext::Weight, &calendar, today, diff_days);
        let weight_diffs = DifferentialCalculator::daily_differences(&diff_source);
        let weight_weekday_diffs = WeekdayAggregator::average_by_weekday(&weight_diffs);

        tracing::debug!(
            %today,
            %calendar,
            steps = steps.len(),
            weights = weights.len(),
            weight_diffs = weight_diffs.len(),
            "built dashboard"
        );

        Ok(Dashboard {
            today,
            window_days,
            steps: MetricChart::new(MetricContext::Steps, steps),
            step_weekday_averages,
            weights: MetricChart::new(MetricContext::Weight, weights),
            weight_weekday_diffs,
            weight_goal: self.settings.weight_goal,
        })
    }
}

/// Normalized samples for one metric, newest last.
///
/// Stores may hand back more than asked for, so the window is enforced again
/// after normalization.
fn window_samples(
    records: &[RawRecord],
    metric: MetricContext,
    calendar: &Calendar,
    today: NaiveDate,
    days: u32,
) -> Vec<Sample> {
    let normalized = Normalizer::normalize(records, metric, calendar);
    window::last_days(&normalized, today, days)
}

/// Build a dashboard with the given settings
pub fn build_dashboard(
    store: &dyn HealthStore,
    settings: Settings,
    today: NaiveDate,
) -> Result<Dashboard, DashboardError> {
    DashboardBuilder::new(settings)?.build(store, today)
}

/// Failure of [`build_dashboard`]
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn fetch_or_empty(
    store: &dyn HealthStore,
    metric: MetricContext,
    days: u32,
    today: NaiveDate,
) -> Result<Vec<RawRecord>, StoreError> {
    match store.fetch(metric, days, today) {
        Ok(records) => Ok(records),
        Err(StoreError::NoData) => {
            tracing::debug!(metric = metric.as_str(), "no data, rendering empty chart");
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::warn!(metric = metric.as_str(), error = %e, "store fetch failed");
            Err(e)
        }
    }
}
