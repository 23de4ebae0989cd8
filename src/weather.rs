//! Seeded synthetic weather for demos and tests.

use std::f64::consts::PI;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

use crate::error::Result;
use crate::frame::{FeatureFrame, WeatherFeatureVector};

/// Hourly weather generator with daily and seasonal cycles plus Gaussian noise.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use energy_forecast::weather::WeatherSimulator;
///
/// let start = NaiveDate::from_ymd_opt(2024, 6, 21)
///     .unwrap()
///     .and_hms_opt(0, 0, 0)
///     .unwrap();
/// let mut sim = WeatherSimulator::new(25.0, 5.0, 800.0, 42);
/// let frame = sim.frame(start, 48).unwrap();
/// assert_eq!(frame.len(), 48);
/// ```
#[derive(Debug, Clone)]
pub struct WeatherSimulator {
    /// Mean ambient temperature (°C).
    pub base_temperature_c: f64,
    /// Mean wind speed (m/s).
    pub base_wind_speed_ms: f64,
    /// Clear-sky peak irradiance (W/m²).
    pub base_irradiance_wm2: f64,
    pub temperature_noise_std: f64,
    pub wind_noise_std: f64,
    pub irradiance_noise_std: f64,
    rng: StdRng,
}

impl Default for WeatherSimulator {
    fn default() -> Self {
        Self::new(25.0, 5.0, 800.0, 0)
    }
}

impl WeatherSimulator {
    /// Creates a simulator with the default noise levels.
    ///
    /// # Arguments
    ///
    /// * `base_temperature_c` - Mean ambient temperature
    /// * `base_wind_speed_ms` - Mean wind speed
    /// * `base_irradiance_wm2` - Peak irradiance at solar noon
    /// * `seed` - Random seed for reproducible noise
    pub fn new(
        base_temperature_c: f64,
        base_wind_speed_ms: f64,
        base_irradiance_wm2: f64,
        seed: u64,
    ) -> Self {
        Self {
            base_temperature_c,
            base_wind_speed_ms,
            base_irradiance_wm2,
            temperature_noise_std: 1.5,
            wind_noise_std: 1.5,
            irradiance_noise_std: 30.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Overrides the noise standard deviations.
    pub fn with_noise(mut self, temperature: f64, wind: f64, irradiance: f64) -> Self {
        self.temperature_noise_std = temperature;
        self.wind_noise_std = wind;
        self.irradiance_noise_std = irradiance;
        self
    }

    /// Simulates the weather for one hour.
    ///
    /// Noise is drawn in the order temperature, wind, irradiance. Wind and
    /// irradiance are clipped at zero.
    pub fn reading(&mut self, timestamp: NaiveDateTime) -> WeatherFeatureVector {
        let hour = f64::from(timestamp.hour());
        let doy = f64::from(timestamp.ordinal());
        let daily = (2.0 * PI * hour / 24.0).sin();

        let temperature = self.base_temperature_c
            + 5.0 * daily
            + 2.0 * (2.0 * PI * doy / 365.0).sin()
            + self.noise(self.temperature_noise_std);

        let wind = self.base_wind_speed_ms + 2.0 * daily + self.noise(self.wind_noise_std);

        let daylight = (2.0 * PI * (hour - 6.0) / 24.0).sin().max(0.0);
        let seasonal = 0.7 + 0.3 * (2.0 * PI * (doy - 172.0) / 365.0).sin();
        let irradiance = self.base_irradiance_wm2 * daylight * seasonal
            + self.noise(self.irradiance_noise_std);

        WeatherFeatureVector::from_reading(timestamp, temperature, wind, irradiance)
    }

    /// Simulates `hours` consecutive hourly readings starting at `start`.
    pub fn frame(&mut self, start: NaiveDateTime, hours: usize) -> Result<FeatureFrame> {
        let entries = (0..hours)
            .map(|h| {
                let ts = start + Duration::hours(h as i64);
                (ts, self.reading(ts))
            })
            .collect();
        FeatureFrame::new(entries)
    }

    fn noise(&mut self, std: f64) -> f64 {
        if std > 0.0 {
            std * self.rng.sample::<f64, _>(StandardNormal)
        } else {
            0.0
        }
    }
}
