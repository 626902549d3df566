//! Day-over-day differences

use crate::types::Sample;

/// Calculator for day-over-day deltas
pub struct DifferentialCalculator;

impl DifferentialCalculator {
    /// Difference between each sample and the one before it.
    ///
    /// The result has one entry fewer than the input, dated with the later
    /// day of each pair. Input must already be normalized (one sample per day,
    /// ascending); it is not re-sorted here.
    pub fn daily_differences(samples: &[Sample]) -> Vec<Sample> {
        samples
            .windows(2)
            .map(|pair| Sample::new(pair[1].date, pair[1].value - pair[0].value))
            .collect()
    }
}
