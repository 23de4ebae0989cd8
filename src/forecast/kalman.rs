//! Scalar Kalman filter with identity dynamics.
//!
//! The true generation level is modelled as a slowly varying scalar
//! (transition = 1) observed directly with noise (observation = 1).

use crate::error::{ForecastError, Result};

/// Noise parameters for one filtering pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanParams {
    /// Process-noise variance Q.
    pub process_noise: f64,
    /// Observation-noise variance R.
    pub observation_noise: f64,
    /// Initial state variance.
    pub initial_variance: f64,
    /// Initial state mean; the first observation when `None`.
    pub initial_mean: Option<f64>,
}

impl KalmanParams {
    /// Solar defaults: Q = 0.1, R = 1.0.
    pub fn solar() -> Self {
        Self {
            process_noise: 0.1,
            observation_noise: 1.0,
            initial_variance: 1.0,
            initial_mean: None,
        }
    }

    /// Wind defaults: Q = 0.2, R = 1.5.
    pub fn wind() -> Self {
        Self {
            process_noise: 0.2,
            observation_noise: 1.5,
            initial_variance: 1.0,
            initial_mean: None,
        }
    }
}

/// Scalar mean and variance of the filtered state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanState {
    pub mean: f64,
    pub variance: f64,
}

/// One-dimensional linear-Gaussian filter.
#[derive(Debug, Clone, Copy)]
pub struct ScalarKalmanFilter {
    params: KalmanParams,
}

impl ScalarKalmanFilter {
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] if any variance is not strictly positive.
    pub fn new(params: KalmanParams) -> Result<Self> {
        let checks = [
            ("process_noise", params.process_noise),
            ("observation_noise", params.observation_noise),
            ("initial_variance", params.initial_variance),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ForecastError::config(
                    format!("kalman.{name}"),
                    "must be > 0",
                ));
            }
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &KalmanParams {
        &self.params
    }

    /// Runs the predict/update recursion over `observations` in time order.
    ///
    /// Returns the filtered state after every observation. The state is
    /// created fresh for each call. At the first step the initial state is
    /// the prediction; later steps add Q before updating.
    pub fn filter_states(&self, observations: &[f64]) -> Vec<KalmanState> {
        let Some(&first) = observations.first() else {
            return Vec::new();
        };
        let q = self.params.process_noise;
        let r = self.params.observation_noise;
        let mut state = KalmanState {
            mean: self.params.initial_mean.unwrap_or(first),
            variance: self.params.initial_variance,
        };

        let mut out = Vec::with_capacity(observations.len());
        for (t, &z) in observations.iter().enumerate() {
            if t > 0 {
                state.variance += q;
            }
            let gain = state.variance / (state.variance + r);
            state.mean += gain * (z - state.mean);
            state.variance *= 1.0 - gain;
            out.push(state);
        }
        out
    }

    /// Filtered means, one per observation.
    pub fn filter(&self, observations: &[f64]) -> Vec<f64> {
        self.filter_states(observations)
            .into_iter()
            .map(|s| s.mean)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_starting_at_first_observation_stays_put() {
        let kf = ScalarKalmanFilter::new(KalmanParams::solar()).unwrap();
        let out = kf.filter(&[-3.0; 12]);
        assert_eq!(out[0], -3.0);
        assert!(out.iter().all(|&m| m == -3.0));
    }

    #[test]
    fn converges_monotonically_to_constant() {
        let params = KalmanParams {
            initial_mean: Some(0.0),
            ..KalmanParams::wind()
        };
        let kf = ScalarKalmanFilter::new(params).unwrap();
        let out = kf.filter(&[-4.0; 30]);
        let mut prev_gap = 4.0;
        for m in &out {
            let gap = (m + 4.0).abs();
            assert!(gap <= prev_gap, "gap grew: {gap} > {prev_gap}");
            assert!(*m >= -4.0, "overshot the constant: {m}");
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-3);
    }

    #[test]
    fn first_gain_uses_initial_variance() {
        // P0 = 1, R = 1 -> K0 = 0.5
        let params = KalmanParams {
            initial_mean: Some(0.0),
            ..KalmanParams::solar()
        };
        let kf = ScalarKalmanFilter::new(params).unwrap();
        let states = kf.filter_states(&[2.0]);
        assert!((states[0].mean - 1.0).abs() < 1e-12);
        assert!((states[0].variance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn variance_settles_to_steady_state() {
        let kf = ScalarKalmanFilter::new(KalmanParams::solar()).unwrap();
        let states = kf.filter_states(&[0.0; 200]);
        let q = 0.1;
        let r = 1.0;
        // steady-state posterior P solves P = (P + q) r / (P + q + r)
        let p = states[199].variance;
        let predicted = p + q;
        assert!((p - predicted * r / (predicted + r)).abs() < 1e-9);
    }

    #[test]
    fn output_matches_input_length() {
        let kf = ScalarKalmanFilter::new(KalmanParams::wind()).unwrap();
        assert_eq!(kf.filter(&[1.0, -2.0, 0.5, 0.0]).len(), 4);
        assert!(kf.filter(&[]).is_empty());
    }

    #[test]
    fn non_positive_noise_rejected() {
        let params = KalmanParams {
            observation_noise: 0.0,
            ..KalmanParams::solar()
        };
        assert!(matches!(
            ScalarKalmanFilter::new(params),
            Err(ForecastError::Config { .. })
        ));
    }
}
