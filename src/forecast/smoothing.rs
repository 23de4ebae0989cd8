//! Centered moving-average smoothing with edge padding.

use crate::error::{ForecastError, Result};

/// Centered moving-average filter.
///
/// For window `W` the average at index `i` covers
/// `[i - W/2, i + W - 1 - W/2]`. Indices without a full window take the
/// nearest computed average (backfill at the start, forward-fill at the
/// end). A series shorter than the window has no full window at all and
/// is returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    window: usize,
}

impl Smoother {
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] if `window` is zero.
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::config("smoothing.window", "must be >= 1"));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Smooths `series`; the output has the same length as the input.
    pub fn smooth(&self, series: &[f64]) -> Vec<f64> {
        let n = series.len();
        let w = self.window;
        if w == 1 || n < w {
            return series.to_vec();
        }

        let left = w / 2;
        let right = w - 1 - left;
        let first = left;
        let last = n - 1 - right;

        let mut out = vec![0.0; n];
        for i in first..=last {
            let sum: f64 = series[i - left..=i + right].iter().sum();
            out[i] = sum / w as f64;
        }

        let head = out[first];
        out[..first].fill(head);
        let tail = out[last];
        out[last + 1..].fill(tail);
        out
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self { window: 3 }
    }
}
