//! Error types for the forecasting pipeline.

use thiserror::Error;

use crate::forecast::labels::EnergySource;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors surfaced by the forecasting core.
///
/// All variants are detected synchronously and never retried internally.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// A configuration value violates its constraint.
    #[error("config error: {field}: {message}")]
    Config {
        /// Dotted field path (e.g. `"ensemble.size"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },

    /// Model training or prediction was rejected for one energy source.
    #[error("training error ({energy}): {message}")]
    Training {
        energy: EnergySource,
        message: String,
    },

    /// The feature frame handed to the pipeline has no rows.
    #[error("cannot forecast an empty feature frame")]
    EmptyForecast,

    /// Frame timestamps are not strictly increasing.
    #[error("timestamp at index {index} does not follow its predecessor")]
    UnorderedTimestamps { index: usize },

    /// Writing forecast output failed at the file or stream level.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV record could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The report could not be serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForecastError {
    pub(crate) fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn training(energy: EnergySource, message: impl Into<String>) -> Self {
        Self::Training {
            energy,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_field() {
        let err = ForecastError::config("ensemble.size", "must be >= 1");
        assert_eq!(err.to_string(), "config error: ensemble.size: must be >= 1");
    }

    #[test]
    fn training_error_names_source() {
        let err = ForecastError::training(EnergySource::Wind, "no rows");
        assert_eq!(err.to_string(), "training error (wind): no rows");
    }

    #[test]
    fn io_error_keeps_its_source() {
        use std::error::Error as _;

        let err = ForecastError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        ));
        assert!(matches!(err, ForecastError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: read-only volume");
        let source = err.source().expect("io error is chained");
        assert_eq!(source.to_string(), "read-only volume");
    }

    #[test]
    fn empty_forecast_message() {
        assert_eq!(
            ForecastError::EmptyForecast.to_string(),
            "cannot forecast an empty feature frame"
        );
    }
}
