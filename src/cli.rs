//! Command-line arguments for the forecast binary.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;

use crate::config::ForecastConfig;
use crate::error::Result;

/// Preset used when neither `--scenario` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "default";

#[derive(Parser, Debug)]
#[command(name = "energy-forecast")]
#[command(about = "Forecast solar and wind generation from simulated hourly weather")]
pub struct Args {
    /// Load forecast configuration from a TOML file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Built-in configuration preset (default, fast, utility_scale)
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the member base seed and label seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Site latitude in degrees
    #[arg(long, default_value_t = 51.5, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Forecast horizon in days
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=30))]
    pub days: u32,

    /// First forecast hour (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS); current hour if omitted
    #[arg(long, value_parser = parse_start)]
    pub start: Option<NaiveDateTime>,

    /// Mean simulated temperature (°C)
    #[arg(long, default_value_t = 25.0, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Mean simulated wind speed (m/s)
    #[arg(long = "wind-speed", default_value_t = 5.0)]
    pub wind_speed: f64,

    /// Peak simulated solar irradiance (W/m²)
    #[arg(long, default_value_t = 800.0)]
    pub irradiance: f64,

    /// Write the forecast as CSV
    #[arg(long = "csv-out")]
    pub csv_out: Option<PathBuf>,

    /// Write the full forecast report as JSON
    #[arg(long = "json-out")]
    pub json_out: Option<PathBuf>,

    /// Log pipeline stages at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolves the configuration from `--scenario` or `--preset`, then
    /// applies `--seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`](crate::error::ForecastError::Config)
    /// for an unreadable scenario file or an unknown preset.
    pub fn load_config(&self) -> Result<ForecastConfig> {
        let config = match (&self.scenario, &self.preset) {
            (Some(path), _) => ForecastConfig::from_toml_file(path)?,
            (None, Some(name)) => ForecastConfig::from_preset(name)?,
            (None, None) => ForecastConfig::from_preset(DEFAULT_PRESET)?,
        };
        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }

    /// Number of hourly steps to forecast.
    pub fn hours(&self) -> usize {
        self.days as usize * 24
    }
}

/// Parses a start timestamp; a bare date means midnight.
pub fn parse_start(s: &str) -> std::result::Result<NaiveDateTime, String> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid start \"{s}\", expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"))
}
