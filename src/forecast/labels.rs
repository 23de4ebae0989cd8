//! Synthetic training-label generation.
//!
//! Training data is drawn from a standard normal distribution and labelled
//! with closed-form physical approximations of solar and wind output. Labels
//! follow the load-reduction sign convention: generation is reported as a
//! non-positive number.

use std::fmt;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::frame::{FeatureRow, N_FEATURES, SOLAR_IRRADIANCE, TEMPERATURE, WIND_SPEED};
use crate::stats;

/// Energy source being forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergySource {
    Solar,
    Wind,
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergySource::Solar => f.write_str("solar"),
            EnergySource::Wind => f.write_str("wind"),
        }
    }
}

/// Wind farm description used to label wind training rows.
#[derive(Debug, Clone, PartialEq)]
pub struct WindFarm {
    /// Rated power per turbine (MW).
    pub rated_power_mw: f64,
    /// Number of turbines.
    pub turbine_count: u32,
    /// Terrain factor range, sampled once per labelling call.
    pub terrain_min: f64,
    pub terrain_max: f64,
    /// Cut-in wind speed (m/s).
    pub cut_in_ms: f64,
    /// Wind speed at which rated output is reached (m/s).
    pub rated_speed_ms: f64,
}

impl Default for WindFarm {
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

impl WindFarm {
    /// Nameplate capacity of the whole farm (MW).
    pub fn capacity_mw(&self) -> f64 {
        self.rated_power_mw * f64::from(self.turbine_count)
    }

    /// Fraction of rated output at `wind_speed`, linear between cut-in and rated speed.
    ///
    /// A farm whose rated speed does not exceed its cut-in speed has a step
    /// curve: full output from the cut-in speed upward, none below it.
    pub fn power_fraction(&self, wind_speed: f64) -> f64 {
        let span = self.rated_speed_ms - self.cut_in_ms;
        if span > 0.0 {
            ((wind_speed - self.cut_in_ms) / span).clamp(0.0, 1.0)
        } else if wind_speed >= self.cut_in_ms {
            1.0
        } else {
            0.0
        }
    }
}

/// Physical approximation used to label synthetic rows.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelModel {
    /// PV output from irradiance and temperature, attenuated by latitude.
    Solar,
    /// Linear power curve of a wind farm.
    Wind(WindFarm),
}

impl LabelModel {
    /// Energy source this model labels for.
    pub fn source(&self) -> EnergySource {
        match self {
            LabelModel::Solar => EnergySource::Solar,
            LabelModel::Wind(_) => EnergySource::Wind,
        }
    }
}

/// Bias and noise applied on top of the physical labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelNoise {
    /// Bias added to every label, as a fraction of `mean(|y|)`.
    pub bias_fraction: f64,
    /// Noise standard deviation, as a fraction of `std(y)`.
    pub noise_fraction: f64,
}

impl Default for LabelNoise {
    fn default() -> Self {
        Self {
            bias_fraction: 0.1,
            noise_fraction: 0.05,
        }
    }
}

/// Ephemeral `(X, y)` training pair produced for one training call.
#[derive(Debug, Clone)]
pub struct SyntheticTrainingSet {
    /// Standard-normal feature rows.
    pub features: Vec<FeatureRow>,
    /// Labels, one per feature row.
    pub labels: Vec<f64>,
    /// Bias that was added to every label.
    pub bias: f64,
    /// Standard deviation of the Gaussian noise that was added.
    pub noise_std: f64,
}

/// Generates labelled synthetic training sets for one energy source.
#[derive(Debug, Clone)]
pub struct SyntheticLabelGenerator {
    model: LabelModel,
    noise: LabelNoise,
}

impl SyntheticLabelGenerator {
    pub fn new(model: LabelModel, noise: LabelNoise) -> Self {
        Self { model, noise }
    }

    pub fn model(&self) -> &LabelModel {
        &self.model
    }

    /// Draws `rows` standard-normal feature rows and labels them.
    ///
    /// `latitude` (degrees) only affects the solar model.
    pub fn generate<R: Rng>(
        &self,
        rows: usize,
        latitude: f64,
        rng: &mut R,
    ) -> SyntheticTrainingSet {
        let features: Vec<FeatureRow> = (0..rows)
            .map(|_| {
                let mut row = [0.0; N_FEATURES];
                for value in row.iter_mut() {
                    *value = rng.sample(StandardNormal);
                }
                row
            })
            .collect();
        let mut labels = self.label(&features, latitude, rng);

        let bias = self.noise.bias_fraction * stats::mean(&abs_values(&labels));
        let noise_std = self.noise.noise_fraction * stats::population_std(&labels);
        for y in labels.iter_mut() {
            let noise = if noise_std > 0.0 {
                noise_std * rng.sample::<f64, _>(StandardNormal)
            } else {
                0.0
            };
            // Noise may push a label above zero; it is not re-clipped.
            *y += bias + noise;
        }

        SyntheticTrainingSet {
            features,
            labels,
            bias,
            noise_std,
        }
    }

    /// Noise-free physical labels for `features`.
    pub fn label<R: Rng>(
        &self,
        features: &[FeatureRow],
        latitude: f64,
        rng: &mut R,
    ) -> Vec<f64> {
        match &self.model {
            LabelModel::Solar => {
                let attenuation = latitude.abs().to_radians().cos();
                features
                    .iter()
                    .map(|row| {
                        let raw = row[SOLAR_IRRADIANCE]
                            * 0.2
                            * (1.0 - 0.005 * (row[TEMPERATURE] - 25.0))
                            * attenuation;
                        -raw.max(0.0)
                    })
                    .collect()
            }
            LabelModel::Wind(farm) => {
                let terrain = if farm.terrain_max > farm.terrain_min {
                    rng.random_range(farm.terrain_min..farm.terrain_max)
                } else {
                    farm.terrain_min
                };
                let scale = farm.capacity_mw() * terrain;
                features
                    .iter()
                    .map(|row| -scale * farm.power_fraction(row[WIND_SPEED]))
                    .collect()
            }
        }
    }
}

fn abs_values(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.abs()).collect()
}
