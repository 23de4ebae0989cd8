//! Hourly weather feature vectors and the frames that carry them.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::error::{ForecastError, Result};

/// Number of model input features per timestep.
pub const N_FEATURES: usize = 6;

/// Column names in model input order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "hour",
    "day_of_year",
    "month",
    "temperature",
    "wind_speed",
    "solar_irradiance",
];

/// Column index of the ambient temperature feature.
pub const TEMPERATURE: usize = 3;
/// Column index of the wind speed feature.
pub const WIND_SPEED: usize = 4;
/// Column index of the solar irradiance feature.
pub const SOLAR_IRRADIANCE: usize = 5;

/// One model input row, in [`FEATURE_NAMES`] order.
pub type FeatureRow = [f64; N_FEATURES];

/// Weather conditions for a single hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherFeatureVector {
    /// Hour of day (0–23).
    pub hour: u32,
    /// Day of year (1–366).
    pub day_of_year: u32,
    /// Month (1–12).
    pub month: u32,
    /// Ambient temperature (°C).
    pub temperature_c: f64,
    /// Wind speed (m/s, non-negative).
    pub wind_speed_ms: f64,
    /// Global horizontal irradiance (W/m², non-negative).
    pub solar_irradiance_wm2: f64,
}

impl WeatherFeatureVector {
    /// Builds a feature vector whose calendar fields come from `timestamp`.
    ///
    /// Negative wind speed and irradiance readings are clamped to zero.
    /// Non-finite readings pass through unchanged so that the ensemble
    /// rejects them.
    pub fn from_reading(
        timestamp: NaiveDateTime,
        temperature_c: f64,
        wind_speed_ms: f64,
        solar_irradiance_wm2: f64,
    ) -> Self {
        Self {
            hour: timestamp.hour(),
            day_of_year: timestamp.ordinal(),
            month: timestamp.month(),
            temperature_c,
            wind_speed_ms: clamp_non_negative(wind_speed_ms),
            solar_irradiance_wm2: clamp_non_negative(solar_irradiance_wm2),
        }
    }

    /// Returns the vector as a model input row.
    pub fn to_row(&self) -> FeatureRow {
        [
            f64::from(self.hour),
            f64::from(self.day_of_year),
            f64::from(self.month),
            self.temperature_c,
            self.wind_speed_ms,
            self.solar_irradiance_wm2,
        ]
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { value }
}

/// Ordered, hourly sequence of timestamped weather feature vectors.
///
/// Timestamps are strictly increasing; this is checked on construction.
#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    timestamps: Vec<NaiveDateTime>,
    features: Vec<WeatherFeatureVector>,
}

impl FeatureFrame {
    /// Creates a frame from `(timestamp, features)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::UnorderedTimestamps`] if any timestamp does
    /// not strictly follow its predecessor.
    pub fn new(entries: Vec<(NaiveDateTime, WeatherFeatureVector)>) -> Result<Self> {
        for (index, pair) in entries.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(ForecastError::UnorderedTimestamps { index: index + 1 });
            }
        }
        let (timestamps, features) = entries.into_iter().unzip();
        Ok(Self {
            timestamps,
            features,
        })
    }

    /// Number of hourly entries.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if the frame holds no entries.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn features(&self) -> &[WeatherFeatureVector] {
        &self.features
    }

    /// Iterates `(timestamp, features)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDateTime, &WeatherFeatureVector)> {
        self.timestamps.iter().zip(self.features.iter())
    }

    /// Returns the frame as an N×6 model input matrix.
    pub fn feature_matrix(&self) -> Vec<FeatureRow> {
        self.features.iter().map(WeatherFeatureVector::to_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn calendar_fields_come_from_timestamp() {
        let v = WeatherFeatureVector::from_reading(ts(13), 21.5, 4.0, 600.0);
        assert_eq!(v.hour, 13);
        // 2024 is a leap year: Jan 31 + Feb 29 + 1
        assert_eq!(v.day_of_year, 61);
        assert_eq!(v.month, 3);
    }

    #[test]
    fn negative_readings_clamped() {
        let v = WeatherFeatureVector::from_reading(ts(0), -5.0, -1.0, -20.0);
        assert_eq!(v.temperature_c, -5.0);
        assert_eq!(v.wind_speed_ms, 0.0);
        assert_eq!(v.solar_irradiance_wm2, 0.0);
    }

    #[test]
    fn missing_readings_are_not_clamped() {
        let v = WeatherFeatureVector::from_reading(ts(0), 12.0, f64::NAN, f64::NAN);
        assert!(v.wind_speed_ms.is_nan());
        assert!(v.solar_irradiance_wm2.is_nan());
        let v = WeatherFeatureVector::from_reading(ts(0), 12.0, f64::NEG_INFINITY, 5.0);
        assert_eq!(v.wind_speed_ms, f64::NEG_INFINITY);
    }

    #[test]
    fn row_follows_feature_order() {
        let v = WeatherFeatureVector::from_reading(ts(6), 10.0, 3.0, 250.0);
        let row = v.to_row();
        assert_eq!(row[0], 6.0);
        assert_eq!(row[TEMPERATURE], 10.0);
        assert_eq!(row[WIND_SPEED], 3.0);
        assert_eq!(row[SOLAR_IRRADIANCE], 250.0);
    }

    #[test]
    fn frame_rejects_repeated_timestamp() {
        let v = WeatherFeatureVector::from_reading(ts(1), 10.0, 3.0, 0.0);
        let err = FeatureFrame::new(vec![(ts(1), v), (ts(2), v), (ts(2), v)]);
        assert!(matches!(
            err,
            Err(ForecastError::UnorderedTimestamps { index: 2 })
        ));
    }

    #[test]
    fn frame_matrix_matches_length() {
        let start = ts(0);
        let entries: Vec<_> = (0..5)
            .map(|h| {
                let t = start + Duration::hours(h);
                (t, WeatherFeatureVector::from_reading(t, 20.0, 5.0, 100.0))
            })
            .collect();
        let frame = FeatureFrame::new(entries).unwrap();
        assert_eq!(frame.len(), 5);
        assert_eq!(frame.feature_matrix().len(), 5);
        assert_eq!(frame.feature_matrix()[4][0], 4.0);
    }

    #[test]
    fn empty_frame_is_valid() {
        let frame = FeatureFrame::new(Vec::new()).unwrap();
        assert!(frame.is_empty());
    }
}
