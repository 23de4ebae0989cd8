//! Confidence intervals from the dispersion of the raw ensemble series.

use serde::{Deserialize, Serialize};

use crate::stats;

/// How interval bounds are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalClamp {
    /// Generation is non-positive, so the magnitude lower bound is zero:
    /// the signed bound nearest zero (`upper`) may not rise above zero.
    /// A clamp never crosses the point estimate.
    #[default]
    GenerationMagnitude,
    /// Symmetric bounds, no clamping.
    Unclamped,
}

/// Point estimates with lower and upper bounds, as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastSeries {
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }
}

/// Derives a uniform interval half-width from the raw aggregated series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceIntervalEstimator {
    /// Multiplier on the population standard deviation (1.96 ≈ 95%).
    pub z: f64,
    pub clamp: IntervalClamp,
}

impl Default for ConfidenceIntervalEstimator {
    fn default() -> Self {
        Self {
            z: 1.96,
            clamp: IntervalClamp::GenerationMagnitude,
        }
    }
}

impl ConfidenceIntervalEstimator {
    /// Half-width applied to every timestep: `z * std(raw)`.
    pub fn half_width(&self, raw: &[f64]) -> f64 {
        self.z * stats::population_std(raw)
    }

    /// Bounds `estimates` with the half-width computed from `raw`.
    pub fn bound(&self, estimates: &[f64], raw: &[f64]) -> ForecastSeries {
        let hw = self.half_width(raw);
        self.bound_with(estimates, hw)
    }

    /// Bounds `estimates` with an explicit half-width.
    pub fn bound_with(&self, estimates: &[f64], half_width: f64) -> ForecastSeries {
        let mut series = ForecastSeries {
            point: estimates.to_vec(),
            lower: Vec::with_capacity(estimates.len()),
            upper: Vec::with_capacity(estimates.len()),
        };
        for &p in estimates {
            let lower = p - half_width;
            let mut upper = p + half_width;
            if self.clamp == IntervalClamp::GenerationMagnitude {
                upper = upper.min(0.0).max(p);
            }
            series.lower.push(lower);
            series.upper.push(upper);
        }
        series
    }
}
