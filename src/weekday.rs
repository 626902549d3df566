//! Weekday averaging
//!
//! Buckets a window of samples by weekday number and emits one averaged
//! sample per weekday present. Feeds the radial "averages" chart for steps and
//! the average-change bar chart for weight.

use crate::stats;
use crate::types::Sample;

/// Aggregator producing per-weekday averages
pub struct WeekdayAggregator;

impl WeekdayAggregator {
    /// Average samples by weekday number.
    ///
    /// Samples are stably sorted by weekday number (Sunday = 1) and split into
    /// runs of equal weekday. Each run yields a sample dated with the run's
    /// first date and valued with the run's mean. The output holds at most
    /// seven entries, in that sorted-run order.
    ///
    /// The aggregator has no notion of "now"; filter the input to the window
    /// of interest first (see [`crate::window::last_days`]).
    pub fn average_by_weekday(samples: &[Sample]) -> Vec<Sample> {
        Self::weekday_runs(samples)
            .iter()
            .map(|run| {
                let values: Vec<f64> = run.iter().map(|s| s.value).collect();
                Sample::new(run[0].date, stats::mean(&values))
            })
            .collect()
    }

    /// Partition samples into weekday runs after a stable weekday sort.
    ///
    /// Every input sample lands in exactly one run and no run is empty.
    pub fn weekday_runs(samples: &[Sample]) -> Vec<Vec<Sample>> {
        let mut sorted = samples.to_vec();
        // sort_by_key is stable, so ties keep their input order
        sorted.sort_by_key(Sample::weekday_number);

        sorted
            .chunk_by(|a, b| a.weekday_number() == b.weekday_number())
            .map(<[Sample]>::to_vec)
            .collect()
    }
}
