//! Post-hoc summary statistics over a finished forecast.

use std::fmt;

use serde::Serialize;

use crate::forecast::ForecastReport;
use crate::stats;

/// Mean solar and wind point estimates for one hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyProfile {
    pub hour: u32,
    pub solar_mw: f64,
    pub wind_mw: f64,
    /// Number of forecast steps falling on this hour.
    pub samples: usize,
}

/// Scalar indicators derived from a [`ForecastReport`].
///
/// Point estimates keep the non-positive generation sign; energy totals
/// are reported as magnitudes.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSummary {
    pub hours: usize,
    pub solar_mean_mw: f64,
    pub solar_std_mw: f64,
    pub wind_mean_mw: f64,
    pub wind_std_mw: f64,
    pub total_mean_mw: f64,
    pub total_std_mw: f64,
    /// Largest total generation magnitude over the horizon (MW).
    pub peak_total_mw: f64,
    /// Solar energy over hourly steps (MWh, magnitude).
    pub solar_energy_mwh: f64,
    /// Wind energy over hourly steps (MWh, magnitude).
    pub wind_energy_mwh: f64,
    /// Hour-of-day means for the hours present in the forecast, ascending.
    pub hourly_profile: Vec<HourlyProfile>,
}

impl ForecastSummary {
    /// Computes the summary from a complete report.
    pub fn from_report(report: &ForecastReport) -> Self {
        let solar = &report.solar.series.point;
        let wind = &report.wind.series.point;
        let total = &report.total.point;

        let mut buckets = [(0.0_f64, 0.0_f64, 0_usize); 24];
        for (i, weather) in report.weather.iter().enumerate() {
            let bucket = &mut buckets[(weather.hour % 24) as usize];
            bucket.0 += solar[i];
            bucket.1 += wind[i];
            bucket.2 += 1;
        }
        let hourly_profile = buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.2 > 0)
            .map(|(hour, &(s, w, n))| HourlyProfile {
                hour: hour as u32,
                solar_mw: s / n as f64,
                wind_mw: w / n as f64,
                samples: n,
            })
            .collect();

        Self {
            hours: report.len(),
            solar_mean_mw: stats::mean(solar),
            solar_std_mw: stats::population_std(solar),
            wind_mean_mw: stats::mean(wind),
            wind_std_mw: stats::population_std(wind),
            total_mean_mw: stats::mean(total),
            total_std_mw: stats::population_std(total),
            peak_total_mw: total.iter().fold(0.0, |peak: f64, p| peak.max(-p)),
            solar_energy_mwh: solar.iter().map(|p| p.abs()).sum(),
            wind_energy_mwh: wind.iter().map(|p| p.abs()).sum(),
            hourly_profile,
        }
    }

    /// Solar share of the combined energy, in percent.
    pub fn solar_share_pct(&self) -> f64 {
        let combined = self.solar_energy_mwh + self.wind_energy_mwh;
        if combined > 0.0 {
            100.0 * self.solar_energy_mwh / combined
        } else {
            0.0
        }
    }
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Forecast Summary ({} h) ---", self.hours)?;
        writeln!(
            f,
            "Solar:        mean {:.3} MW, std {:.3} MW",
            self.solar_mean_mw, self.solar_std_mw
        )?;
        writeln!(
            f,
            "Wind:         mean {:.3} MW, std {:.3} MW",
            self.wind_mean_mw, self.wind_std_mw
        )?;
        writeln!(
            f,
            "Total:        mean {:.3} MW, std {:.3} MW",
            self.total_mean_mw, self.total_std_mw
        )?;
        writeln!(f, "Peak output:  {:.3} MW", self.peak_total_mw)?;
        write!(
            f,
            "Energy mix:   solar {:.2} MWh, wind {:.2} MWh ({:.1}% solar)",
            self.solar_energy_mwh,
            self.wind_energy_mwh,
            self.solar_share_pct()
        )
    }
}
