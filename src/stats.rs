//! Scalar reductions used for chart titles and axes
//!
//! Empty input yields 0 so that a chart can always draw a baseline.

use crate::types::Sample;

/// Arithmetic mean, 0 when empty
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    sum / values.len() as f64
}

/// Smallest value, 0 when empty
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Mean of the sample values
pub fn sample_mean(samples: &[Sample]) -> f64 {
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    mean(&values)
}

/// Smallest sample value; only used for the lower edge of area charts
pub fn sample_min(samples: &[Sample]) -> f64 {
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    min(&values)
}
