//! Column-wise z-score feature scaling.

use crate::frame::{FeatureRow, N_FEATURES};

/// Z-score scaler fitted on a training matrix.
///
/// A scaler only exists in fitted form, so `transform` can never run on
/// unfitted parameters. Columns with zero variance are centered but not
/// rescaled.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; N_FEATURES],
    scale: [f64; N_FEATURES],
}

impl StandardScaler {
    /// Fits per-column mean and population standard deviation.
    ///
    /// An empty matrix yields the identity transform.
    pub fn fit(rows: &[FeatureRow]) -> Self {
        let mut mean = [0.0; N_FEATURES];
        let mut scale = [1.0; N_FEATURES];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut var = [0.0; N_FEATURES];
        for row in rows {
            for col in 0..N_FEATURES {
                var[col] += (row[col] - mean[col]).powi(2);
            }
        }
        for col in 0..N_FEATURES {
            let std = (var[col] / n).sqrt();
            scale[col] = if std > 0.0 { std } else { 1.0 };
        }

        Self { mean, scale }
    }

    pub fn mean(&self) -> &[f64; N_FEATURES] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; N_FEATURES] {
        &self.scale
    }

    /// Scales a single row.
    pub fn transform_row(&self, row: &FeatureRow) -> FeatureRow {
        let mut out = [0.0; N_FEATURES];
        for col in 0..N_FEATURES {
            out[col] = (row[col] - self.mean[col]) / self.scale[col];
        }
        out
    }

    /// Scales every row of a matrix.
    pub fn transform(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}
