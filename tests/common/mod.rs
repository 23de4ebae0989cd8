//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use energy_forecast::config::{EnsembleConfig, ForecastConfig};
use energy_forecast::frame::{FeatureFrame, WeatherFeatureVector};
use energy_forecast::weather::WeatherSimulator;

/// First forecast hour used across tests (2024-06-01 00:00).
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixture timestamp")
}

/// Small but complete configuration (3 members, 8 trees of depth 8).
///
/// Training rows stay at the default 1000.
pub fn test_config() -> ForecastConfig {
    ForecastConfig {
        ensemble: EnsembleConfig {
            size: 3,
            n_trees: 8,
            max_depth: Some(8),
            ..EnsembleConfig::default()
        },
        ..ForecastConfig::default()
    }
}

/// Frame of `hours` hourly rows with readings produced by `reading(hour_index)`.
///
/// `reading` returns `(temperature_c, wind_speed_ms, solar_irradiance_wm2)`.
pub fn frame_with(hours: usize, reading: impl Fn(usize) -> (f64, f64, f64)) -> FeatureFrame {
    let start = start();
    let entries = (0..hours)
        .map(|h| {
            let ts = start + Duration::hours(h as i64);
            let (t, w, i) = reading(h);
            (ts, WeatherFeatureVector::from_reading(ts, t, w, i))
        })
        .collect();
    FeatureFrame::new(entries).expect("fixture timestamps are increasing")
}

/// Simulated weather frame (25 °C, 5 m/s, 800 W/m²) with the given seed.
pub fn simulated_frame(hours: usize, seed: u64) -> FeatureFrame {
    WeatherSimulator::new(25.0, 5.0, 800.0, seed)
        .frame(start(), hours)
        .expect("fixture timestamps are increasing")
}
