//! Short-horizon solar and wind generation forecasting.
//!
//! Hourly weather feature vectors go in; point estimates with confidence
//! intervals come out, one per hour, for solar, wind and their total.
//! Generation is reported as a non-positive number.

pub mod cli;
pub mod config;
pub mod error;
pub mod forecast;
pub mod frame;
pub mod io;
pub mod report;
pub mod stats;
pub mod telemetry;
pub mod weather;
