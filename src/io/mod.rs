//! Forecast output writers.

pub mod export;
