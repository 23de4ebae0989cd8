//! Ensemble of independently seeded random-forest regressors.
//!
//! Every call to [`EnsembleRegressor::train_and_predict`] draws a fresh
//! synthetic training set, fits a fresh scaler on it and retrains every
//! member from scratch. Nothing survives between calls.

use rand::Rng;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

use super::aggregate;
use super::labels::{EnergySource, SyntheticLabelGenerator};
use super::scaler::StandardScaler;
use crate::error::{ForecastError, Result};
use crate::frame::{FeatureRow, N_FEATURES};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Per-member random forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
        }
    }
}

/// One untrained ensemble member and its deterministic seed.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleMember {
    pub index: usize,
    pub seed: u64,
    pub forest: ForestParams,
}

impl EnsembleMember {
    fn parameters(&self) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth: self.forest.max_depth,
            min_samples_leaf: self.forest.min_samples_leaf,
            min_samples_split: self.forest.min_samples_split,
            n_trees: self.forest.n_trees,
            m: None,
            keep_samples: false,
            seed: self.seed,
        }
    }

    fn fit(&self, x: &DenseMatrix<f64>, y: &Vec<f64>, source: EnergySource) -> Result<Forest> {
        Forest::fit(x, y, self.parameters()).map_err(|e| {
            ForecastError::training(source, format!("member {} failed to fit: {e:?}", self.index))
        })
    }
}

/// Ensemble sizing and training parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleParams {
    /// Number of members (must be >= 1).
    pub size: usize,
    /// Member `i` is seeded with `base_seed + i`.
    pub base_seed: u64,
    pub forest: ForestParams,
    /// Lower bound on the synthetic training set size.
    pub min_training_rows: usize,
}

impl Default for EnsembleParams {
    fn default() -> Self {
        Self {
            size: 5,
            base_seed: 42,
            forest: ForestParams::default(),
            min_training_rows: 1000,
        }
    }
}

/// Output of one training-and-prediction call.
#[derive(Debug, Clone)]
pub struct EnsembleForecast {
    /// Robust point estimate per timestep.
    pub estimates: Vec<f64>,
    /// N×M member predictions, one row per timestep.
    pub predictions: Vec<Vec<f64>>,
    /// Bias added to the synthetic labels.
    pub label_bias: f64,
    /// Standard deviation of the synthetic label noise.
    pub label_noise_std: f64,
    /// Number of synthetic training rows drawn.
    pub training_rows: usize,
}

/// Ensemble regressor for one energy source.
///
/// The label strategy is injected through the [`SyntheticLabelGenerator`];
/// solar and wind differ only in the generator they carry.
#[derive(Debug, Clone)]
pub struct EnsembleRegressor {
    generator: SyntheticLabelGenerator,
    params: EnsembleParams,
}

impl EnsembleRegressor {
    pub fn new(generator: SyntheticLabelGenerator, params: EnsembleParams) -> Self {
        Self { generator, params }
    }

    pub fn source(&self) -> EnergySource {
        self.generator.model().source()
    }

    /// Instantiates the members, member `i` seeded with `base_seed + i`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] if the ensemble size is zero.
    pub fn create_ensemble(&self) -> Result<Vec<EnsembleMember>> {
        if self.params.size == 0 {
            return Err(ForecastError::config("ensemble.size", "must be >= 1"));
        }
        Ok((0..self.params.size)
            .map(|i| EnsembleMember {
                index: i,
                seed: self.params.base_seed.wrapping_add(i as u64),
                forest: self.params.forest,
            })
            .collect())
    }

    /// Trains every member on one synthetic set and predicts `x_test`.
    ///
    /// The scaler is fitted on the synthetic features only and applied to
    /// both matrices. All members see identical training data; only their
    /// internal seeds differ.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Training`] if `x_test` is empty, contains a
    /// non-finite value, or a member fails to fit or predict, and
    /// [`ForecastError::Config`] if the ensemble size is zero.
    pub fn train_and_predict<R: Rng>(
        &self,
        x_test: &[FeatureRow],
        latitude: f64,
        rng: &mut R,
    ) -> Result<EnsembleForecast> {
        let source = self.source();
        if x_test.is_empty() {
            return Err(ForecastError::training(source, "no feature rows to predict"));
        }
        if let Some((row, col)) = first_non_finite(x_test) {
            return Err(ForecastError::training(
                source,
                format!("non-finite feature at row {row}, column {col}"),
            ));
        }
        let members = self.create_ensemble()?;

        let n = self.params.min_training_rows.max(x_test.len());
        let training = self.generator.generate(n, latitude, rng);
        debug!(
            %source,
            rows = n,
            bias = training.bias,
            noise_std = training.noise_std,
            "drew synthetic training set"
        );

        let scaler = StandardScaler::fit(&training.features);
        let x_train = to_dense(&scaler.transform(&training.features));
        let x_eval = to_dense(&scaler.transform(x_test));

        let mut columns = Vec::with_capacity(members.len());
        for member in &members {
            let forest = member.fit(&x_train, &training.labels, source)?;
            let predicted = forest.predict(&x_eval).map_err(|e| {
                ForecastError::training(
                    source,
                    format!("member {} failed to predict: {e:?}", member.index),
                )
            })?;
            debug!(%source, member = member.index, seed = member.seed, "member trained");
            columns.push(predicted);
        }

        let predictions: Vec<Vec<f64>> = (0..x_test.len())
            .map(|t| columns.iter().map(|c| c[t]).collect())
            .collect();
        let estimates = aggregate::aggregate(&predictions);

        Ok(EnsembleForecast {
            estimates,
            predictions,
            label_bias: training.bias,
            label_noise_std: training.noise_std,
            training_rows: n,
        })
    }
}

fn first_non_finite(rows: &[FeatureRow]) -> Option<(usize, usize)> {
    rows.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|v| !v.is_finite())
            .map(|c| (r, c))
    })
}

fn to_dense(rows: &[FeatureRow]) -> DenseMatrix<f64> {
    let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    DenseMatrix::new(rows.len(), N_FEATURES, flat, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::labels::{LabelModel, LabelNoise, WindFarm};
    use rand::{SeedableRng, rngs::StdRng};

    fn small_params(size: usize) -> EnsembleParams {
        EnsembleParams {
            size,
            base_seed: 42,
            forest: ForestParams {
                n_trees: 5,
                max_depth: Some(6),
                ..ForestParams::default()
            },
            min_training_rows: 300,
        }
    }

    fn solar_regressor(size: usize) -> EnsembleRegressor {
        EnsembleRegressor::new(
            SyntheticLabelGenerator::new(LabelModel::Solar, LabelNoise::default()),
            small_params(size),
        )
    }

    fn test_rows(n: usize) -> Vec<FeatureRow> {
        (0..n)
            .map(|h| {
                let hour = (h % 24) as f64;
                [hour, 120.0, 5.0, 22.0, 4.0, 50.0 * hour]
            })
            .collect()
    }

    #[test]
    fn members_seeded_consecutively() {
        let members = solar_regressor(5).create_ensemble().unwrap();
        let seeds: Vec<u64> = members.iter().map(|m| m.seed).collect();
        assert_eq!(seeds, vec![42, 43, 44, 45, 46]);
    }

    #[test]
    fn empty_ensemble_rejected() {
        assert!(matches!(
            solar_regressor(0).create_ensemble(),
            Err(ForecastError::Config { .. })
        ));
    }

    #[test]
    fn empty_input_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = solar_regressor(2).train_and_predict(&[], 0.0, &mut rng);
        assert!(matches!(
            err,
            Err(ForecastError::Training {
                energy: EnergySource::Solar,
                ..
            })
        ));
    }

    #[test]
    fn non_finite_input_rejected() {
        let mut rows = test_rows(4);
        rows[2][3] = f64::NAN;
        let mut rng = StdRng::seed_from_u64(1);
        let err = solar_regressor(2).train_and_predict(&rows, 0.0, &mut rng);
        match err {
            Err(ForecastError::Training { message, .. }) => {
                assert!(message.contains("row 2, column 3"), "{message}");
            }
            other => panic!("expected training error, got {other:?}"),
        }
    }

    #[test]
    fn prediction_matrix_is_n_by_m() {
        let rows = test_rows(10);
        let mut rng = StdRng::seed_from_u64(3);
        let out = solar_regressor(3).train_and_predict(&rows, 20.0, &mut rng).unwrap();
        assert_eq!(out.estimates.len(), 10);
        assert_eq!(out.predictions.len(), 10);
        assert!(out.predictions.iter().all(|r| r.len() == 3));
        assert_eq!(out.training_rows, 300);
    }

    #[test]
    fn training_set_grows_with_input() {
        let rows = test_rows(400);
        let mut rng = StdRng::seed_from_u64(3);
        let out = solar_regressor(1).train_and_predict(&rows, 20.0, &mut rng).unwrap();
        assert_eq!(out.training_rows, 400);
    }

    #[test]
    fn identical_seeds_give_identical_output() {
        let rows = test_rows(24);
        let regressor = EnsembleRegressor::new(
            SyntheticLabelGenerator::new(LabelModel::Wind(WindFarm::default()), LabelNoise::default()),
            small_params(3),
        );
        let a = regressor
            .train_and_predict(&rows, 51.5, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let b = regressor
            .train_and_predict(&rows, 51.5, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a.estimates, b.estimates);
        assert_eq!(a.predictions, b.predictions);
    }
}
