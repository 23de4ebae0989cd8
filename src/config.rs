//! TOML-based forecast configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ForecastError;
use crate::forecast::ensemble::{EnsembleParams, ForestParams};
use crate::forecast::interval::{ConfidenceIntervalEstimator, IntervalClamp};
use crate::forecast::kalman::KalmanParams;
use crate::forecast::labels::{LabelNoise, WindFarm};

/// Top-level forecast configuration parsed from TOML.
///
/// Every field has a default. Load from
/// TOML with [`ForecastConfig::from_toml_file`] or use
/// [`ForecastConfig::default`] for the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    /// Ensemble size, member seeds and forest parameters.
    #[serde(default)]
    pub ensemble: EnsembleConfig,
    /// Synthetic training-label parameters.
    #[serde(default)]
    pub labels: LabelConfig,
    /// Wind farm parameters for wind label synthesis.
    #[serde(default)]
    pub wind: WindConfig,
    /// Moving-average smoothing parameters.
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    /// Kalman filter noise parameters per energy source.
    #[serde(default)]
    pub kalman: KalmanConfig,
    /// Confidence interval parameters.
    #[serde(default)]
    pub interval: IntervalConfig,
}

/// Ensemble size, member seeds and forest parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnsembleConfig {
    /// Number of ensemble members (must be >= 1).
    pub size: usize,
    /// Member `i` is seeded with `base_seed + i`.
    pub base_seed: u64,
    /// Trees per member forest.
    pub n_trees: usize,
    /// Maximum tree depth; unlimited when absent.
    pub max_depth: Option<u16>,
    /// Minimum samples per leaf.
    pub min_samples_leaf: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Lower bound on the synthetic training set size.
    pub min_training_rows: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            size: 5,
            base_seed: 42,
            n_trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
            min_training_rows: 1000,
        }
    }
}

/// Synthetic training-label parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    /// Seed for synthetic feature, terrain and noise draws.
    pub seed: u64,
    /// Positive bias added to every label, as a fraction of `mean(|y|)`.
    pub bias_fraction: f64,
    /// Label noise standard deviation, as a fraction of `std(y)`.
    pub noise_fraction: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            bias_fraction: 0.1,
            noise_fraction: 0.05,
        }
    }
}

/// Wind farm parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    /// Rated power per turbine (MW).
    pub rated_power_mw: f64,
    /// Number of turbines.
    pub turbine_count: u32,
    /// Lower bound of the per-call terrain factor.
    pub terrain_min: f64,
    /// Upper bound of the per-call terrain factor.
    pub terrain_max: f64,
    /// Cut-in wind speed (m/s).
    pub cut_in_ms: f64,
    /// Wind speed at which rated power is reached (m/s).
    pub rated_speed_ms: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            rated_power_mw: 2.0,
            turbine_count: 5,
            terrain_min: 0.8,
            terrain_max: 1.2,
            cut_in_ms: 3.0,
            rated_speed_ms: 12.0,
        }
    }
}

/// Moving-average smoothing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Centered window length (must be >= 1).
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window: 3 }
    }
}

/// Kalman filter noise parameters per energy source.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KalmanConfig {
    #[serde(default = "KalmanSourceConfig::solar")]
    pub solar: KalmanSourceConfig,
    #[serde(default = "KalmanSourceConfig::wind")]
    pub wind: KalmanSourceConfig,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            solar: KalmanSourceConfig::solar(),
            wind: KalmanSourceConfig::wind(),
        }
    }
}

/// Kalman filter noise parameters for one energy source.
///
/// Both noise variances are required when the section is present.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KalmanSourceConfig {
    /// Process-noise variance Q.
    pub process_noise: f64,
    /// Observation-noise variance R.
    pub observation_noise: f64,
    /// Initial state variance.
    #[serde(default = "default_initial_variance")]
    pub initial_variance: f64,
}

fn default_initial_variance() -> f64 {
    1.0
}

impl KalmanSourceConfig {
    /// Solar defaults: Q = 0.1, R = 1.0.
    pub fn solar() -> Self {
        Self {
            process_noise: 0.1,
            observation_noise: 1.0,
            initial_variance: default_initial_variance(),
        }
    }

    /// Wind defaults: Q = 0.2, R = 1.5.
    pub fn wind() -> Self {
        Self {
            process_noise: 0.2,
            observation_noise: 1.5,
            initial_variance: default_initial_variance(),
        }
    }
}

/// Confidence interval parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntervalConfig {
    /// Half-width multiplier applied to the raw series std (1.96 ≈ 95%).
    pub z: f64,
    /// Bound clamping policy.
    pub clamp: IntervalClamp,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            z: 1.96,
            clamp: IntervalClamp::GenerationMagnitude,
        }
    }
}

impl EnsembleConfig {
    /// Ensemble parameters for one regressor.
    pub fn params(&self) -> EnsembleParams {
        EnsembleParams {
            size: self.size,
            base_seed: self.base_seed,
            forest: ForestParams {
                n_trees: self.n_trees,
                max_depth: self.max_depth,
                min_samples_leaf: self.min_samples_leaf,
                min_samples_split: self.min_samples_split,
            },
            min_training_rows: self.min_training_rows,
        }
    }
}

impl LabelConfig {
    pub fn noise(&self) -> LabelNoise {
        LabelNoise {
            bias_fraction: self.bias_fraction,
            noise_fraction: self.noise_fraction,
        }
    }
}

impl WindConfig {
    pub fn farm(&self) -> WindFarm {
        WindFarm {
            rated_power_mw: self.rated_power_mw,
            turbine_count: self.turbine_count,
            terrain_min: self.terrain_min,
            terrain_max: self.terrain_max,
            cut_in_ms: self.cut_in_ms,
            rated_speed_ms: self.rated_speed_ms,
        }
    }
}

impl KalmanSourceConfig {
    /// Filter parameters; the initial mean is the first observation.
    pub fn params(&self) -> KalmanParams {
        KalmanParams {
            process_noise: self.process_noise,
            observation_noise: self.observation_noise,
            initial_variance: self.initial_variance,
            initial_mean: None,
        }
    }
}

impl IntervalConfig {
    pub fn estimator(&self) -> ConfidenceIntervalEstimator {
        ConfidenceIntervalEstimator {
            z: self.z,
            clamp: self.clamp,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"ensemble.size"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl From<ConfigError> for ForecastError {
    fn from(e: ConfigError) -> Self {
        ForecastError::Config {
            field: e.field,
            message: e.message,
        }
    }
}

impl ForecastConfig {
    /// Returns the fast preset: small forests for quick interactive runs.
    pub fn fast() -> Self {
        Self {
            ensemble: EnsembleConfig {
                n_trees: 10,
                max_depth: Some(10),
                ..EnsembleConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the utility-scale preset: a larger wind farm and ensemble.
    pub fn utility_scale() -> Self {
        Self {
            ensemble: EnsembleConfig {
                size: 7,
                ..EnsembleConfig::default()
            },
            wind: WindConfig {
                rated_power_mw: 3.0,
                turbine_count: 20,
                ..WindConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "fast", "utility_scale"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "fast" => Ok(Self::fast()),
            "utility_scale" => Ok(Self::utility_scale()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Sets both the member base seed and the label seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ensemble.base_seed = seed;
        self.labels.seed = seed;
        self
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let e = &self.ensemble;
        if e.size == 0 {
            errors.push(ConfigError::new("ensemble.size", "must be >= 1"));
        }
        if e.n_trees == 0 {
            errors.push(ConfigError::new("ensemble.n_trees", "must be >= 1"));
        }
        if e.max_depth == Some(0) {
            errors.push(ConfigError::new("ensemble.max_depth", "must be >= 1 when set"));
        }
        if e.min_samples_leaf == 0 {
            errors.push(ConfigError::new("ensemble.min_samples_leaf", "must be >= 1"));
        }
        if e.min_samples_split < 2 {
            errors.push(ConfigError::new("ensemble.min_samples_split", "must be >= 2"));
        }
        if e.min_training_rows == 0 {
            errors.push(ConfigError::new("ensemble.min_training_rows", "must be >= 1"));
        }

        let l = &self.labels;
        if !(l.bias_fraction.is_finite() && l.bias_fraction >= 0.0) {
            errors.push(ConfigError::new("labels.bias_fraction", "must be finite and >= 0"));
        }
        if !(l.noise_fraction.is_finite() && l.noise_fraction >= 0.0) {
            errors.push(ConfigError::new("labels.noise_fraction", "must be finite and >= 0"));
        }

        let w = &self.wind;
        if !(w.rated_power_mw.is_finite() && w.rated_power_mw > 0.0) {
            errors.push(ConfigError::new("wind.rated_power_mw", "must be > 0"));
        }
        if w.turbine_count == 0 {
            errors.push(ConfigError::new("wind.turbine_count", "must be >= 1"));
        }
        if !(w.terrain_min.is_finite() && w.terrain_min > 0.0) {
            errors.push(ConfigError::new("wind.terrain_min", "must be > 0"));
        }
        if !(w.terrain_max.is_finite() && w.terrain_max >= w.terrain_min) {
            errors.push(ConfigError::new("wind.terrain_max", "must be >= wind.terrain_min"));
        }
        if !(w.cut_in_ms.is_finite() && w.rated_speed_ms.is_finite() && w.cut_in_ms < w.rated_speed_ms)
        {
            errors.push(ConfigError::new("wind.cut_in_ms", "must be < wind.rated_speed_ms"));
        }

        if self.smoothing.window == 0 {
            errors.push(ConfigError::new("smoothing.window", "must be >= 1"));
        }

        for (name, k) in [("solar", &self.kalman.solar), ("wind", &self.kalman.wind)] {
            let checks = [
                ("process_noise", k.process_noise),
                ("observation_noise", k.observation_noise),
                ("initial_variance", k.initial_variance),
            ];
            for (param, value) in checks {
                if !(value.is_finite() && value > 0.0) {
                    errors.push(ConfigError::new(
                        &format!("kalman.{name}.{param}"),
                        "must be > 0",
                    ));
                }
            }
        }

        if !(self.interval.z.is_finite() && self.interval.z > 0.0) {
            errors.push(ConfigError::new("interval.z", "must be > 0"));
        }

        errors
    }

    /// Validates and converts the first violation into a [`ForecastError`].
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] for the first violated constraint.
    pub fn ensure_valid(&self) -> Result<(), ForecastError> {
        match self.validate().into_iter().next() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
