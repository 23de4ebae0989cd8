//! Per-source orchestration of the forecasting stages.

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, info_span};

use super::ensemble::EnsembleRegressor;
use super::interval::{ConfidenceIntervalEstimator, ForecastSeries};
use super::kalman::{KalmanParams, ScalarKalmanFilter};
use super::labels::{EnergySource, LabelModel, SyntheticLabelGenerator};
use super::smoothing::Smoother;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::frame::{FeatureFrame, FeatureRow, WeatherFeatureVector};

/// Offset added to the label seed for the wind training draw.
pub const WIND_SEED_OFFSET: u64 = 1_000;

/// Final series and intermediate diagnostics for one energy source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceForecast {
    pub source: EnergySource,
    /// Kalman-filtered point estimates with confidence bounds.
    pub series: ForecastSeries,
    /// Robust ensemble aggregate before smoothing.
    pub raw: Vec<f64>,
    /// Moving-average output fed to the Kalman filter.
    pub smoothed: Vec<f64>,
    /// Uniform interval half-width.
    pub half_width: f64,
    /// Bias added to the synthetic training labels.
    pub label_bias: f64,
    /// Standard deviation of the synthetic label noise.
    pub label_noise_std: f64,
}

/// Complete result of one forecast request, aligned to the input frame.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub latitude: f64,
    pub timestamps: Vec<NaiveDateTime>,
    pub weather: Vec<WeatherFeatureVector>,
    pub solar: SourceForecast,
    pub wind: SourceForecast,
    /// Sum of the solar and wind series. Its interval comes from the summed
    /// raw series.
    pub total: ForecastSeries,
}

impl ForecastReport {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Runs the full forecasting pipeline for solar and wind.
///
/// The pipeline holds only configuration. Every [`run`](Self::run) draws new
/// training data and retrains both ensembles; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecasts solar, wind and total generation for every row of `frame`.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::Config`] for an invalid configuration or a latitude
    ///   outside `[-90, 90]`.
    /// - [`ForecastError::EmptyForecast`] if `frame` has no rows.
    /// - [`ForecastError::Training`] if either ensemble fails.
    pub fn run(&self, frame: &FeatureFrame, latitude: f64) -> Result<ForecastReport> {
        self.config.ensure_valid()?;
        if !(latitude.is_finite() && (-90.0..=90.0).contains(&latitude)) {
            return Err(ForecastError::config(
                "latitude",
                format!("{latitude} is outside [-90, 90]"),
            ));
        }
        if frame.is_empty() {
            return Err(ForecastError::EmptyForecast);
        }

        let span = info_span!("forecast", rows = frame.len(), latitude);
        let _guard = span.enter();

        let x = frame.feature_matrix();
        let seed = self.config.labels.seed;

        let solar = self.run_source(
            LabelModel::Solar,
            self.config.kalman.solar.params(),
            &x,
            latitude,
            seed,
        )?;
        let wind = self.run_source(
            LabelModel::Wind(self.config.wind.farm()),
            self.config.kalman.wind.params(),
            &x,
            latitude,
            seed.wrapping_add(WIND_SEED_OFFSET),
        )?;
        let total = combine(&self.config.interval.estimator(), &solar, &wind);

        info!(
            solar_mean = crate::stats::mean(&solar.series.point),
            wind_mean = crate::stats::mean(&wind.series.point),
            "forecast complete"
        );

        Ok(ForecastReport {
            latitude,
            timestamps: frame.timestamps().to_vec(),
            weather: frame.features().to_vec(),
            solar,
            wind,
            total,
        })
    }

    fn run_source(
        &self,
        model: LabelModel,
        kalman: KalmanParams,
        x: &[FeatureRow],
        latitude: f64,
        seed: u64,
    ) -> Result<SourceForecast> {
        let source = model.source();
        let generator = SyntheticLabelGenerator::new(model, self.config.labels.noise());
        let regressor = EnsembleRegressor::new(generator, self.config.ensemble.params());
        let smoother = Smoother::new(self.config.smoothing.window)?;
        let filter = ScalarKalmanFilter::new(kalman)?;
        let estimator = self.config.interval.estimator();

        let mut rng = StdRng::seed_from_u64(seed);
        let ensemble = regressor.train_and_predict(x, latitude, &mut rng)?;
        let raw = ensemble.estimates;
        let smoothed = smoother.smooth(&raw);
        let filtered = filter.filter(&smoothed);
        let half_width = estimator.half_width(&raw);
        let series = estimator.bound_with(&filtered, half_width);
        debug!(%source, half_width, training_rows = ensemble.training_rows, "source stages done");

        info!(%source, members = self.config.ensemble.size, "source forecast ready");
        Ok(SourceForecast {
            source,
            series,
            raw,
            smoothed,
            half_width,
            label_bias: ensemble.label_bias,
            label_noise_std: ensemble.label_noise_std,
        })
    }
}

fn combine(
    estimator: &ConfidenceIntervalEstimator,
    solar: &SourceForecast,
    wind: &SourceForecast,
) -> ForecastSeries {
    let point: Vec<f64> = sum(&solar.series.point, &wind.series.point);
    let raw = sum(&solar.raw, &wind.raw);
    estimator.bound(&point, &raw)
}

fn sum(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}
