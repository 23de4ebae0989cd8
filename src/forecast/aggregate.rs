//! Outlier-robust aggregation across ensemble members.

use crate::stats;

/// Members further than this many standard deviations from the row mean are dropped.
pub const OUTLIER_SIGMA: f64 = 2.0;

/// Returns the members of `row` within [`OUTLIER_SIGMA`] population standard
/// deviations of the row mean.
///
/// When every member agrees the deviation is zero and all are kept.
pub fn retained(row: &[f64]) -> Vec<f64> {
    let mu = stats::mean(row);
    let sigma = stats::population_std(row);
    row.iter()
        .copied()
        .filter(|p| (p - mu).abs() <= OUTLIER_SIGMA * sigma)
        .collect()
}

/// Robust point estimate for one timestep: the mean of the retained members.
pub fn robust_mean(row: &[f64]) -> f64 {
    let kept = retained(row);
    if kept.is_empty() {
        return stats::mean(row);
    }
    stats::mean(&kept)
}

/// Collapses an N×M prediction matrix (one row per timestep, one column per
/// member) into N robust point estimates.
pub fn aggregate(predictions: &[Vec<f64>]) -> Vec<f64> {
    predictions.iter().map(|row| robust_mean(row)).collect()
}
