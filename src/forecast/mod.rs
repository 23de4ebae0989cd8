//! Generation forecasting stages, leaf to root.
//!
//! Synthetic labels train an ensemble of random forests whose predictions
//! are aggregated, smoothed, Kalman-filtered and bounded with a confidence
//! interval. [`pipeline::ForecastPipeline`] runs the stages for solar and
//! wind and composes the total.

pub mod aggregate;
pub mod ensemble;
pub mod interval;
pub mod kalman;
pub mod labels;
pub mod pipeline;
pub mod scaler;
pub mod smoothing;

pub use ensemble::{EnsembleForecast, EnsembleMember, EnsembleParams, EnsembleRegressor, ForestParams};
pub use interval::{ConfidenceIntervalEstimator, ForecastSeries, IntervalClamp};
pub use kalman::{KalmanParams, KalmanState, ScalarKalmanFilter};
pub use labels::{EnergySource, LabelModel, LabelNoise, SyntheticLabelGenerator, WindFarm};
pub use pipeline::{ForecastPipeline, ForecastReport, SourceForecast};
pub use scaler::StandardScaler;
pub use smoothing::Smoother;
