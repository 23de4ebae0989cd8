//! CSV and JSON export for forecast reports.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::forecast::{ForecastReport, ForecastSeries};

/// Column header for CSV forecast export.
const HEADER: &str = "timestamp,hour,day_of_year,month,temperature_c,wind_speed_ms,\
                       solar_irradiance_wm2,solar_mw,solar_lower_mw,solar_upper_mw,\
                       wind_mw,wind_lower_mw,wind_upper_mw,total_mw,total_lower_mw,total_upper_mw";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Exports a forecast report to a CSV file at the given path.
///
/// Writes a header row followed by one row per timestamp. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns [`ForecastError::Io`](crate::error::ForecastError::Io) if the
/// file cannot be created, or the errors of [`write_csv`].
pub fn export_csv(report: &ForecastReport, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(report, io::BufWriter::new(file))
}

/// Writes a forecast report as CSV to any writer.
///
/// # Errors
///
/// Returns [`ForecastError::Csv`](crate::error::ForecastError::Csv) if a
/// record cannot be written and
/// [`ForecastError::Io`](crate::error::ForecastError::Io) if flushing fails.
pub fn write_csv(report: &ForecastReport, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for (i, (ts, w)) in report.timestamps.iter().zip(&report.weather).enumerate() {
        let mut record = vec![
            ts.format(TIMESTAMP_FORMAT).to_string(),
            w.hour.to_string(),
            w.day_of_year.to_string(),
            w.month.to_string(),
            format!("{:.2}", w.temperature_c),
            format!("{:.2}", w.wind_speed_ms),
            format!("{:.2}", w.solar_irradiance_wm2),
        ];
        for series in [&report.solar.series, &report.wind.series, &report.total] {
            push_bounds(&mut record, series, i);
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn push_bounds(record: &mut Vec<String>, series: &ForecastSeries, i: usize) {
    record.push(format!("{:.4}", series.point[i]));
    record.push(format!("{:.4}", series.lower[i]));
    record.push(format!("{:.4}", series.upper[i]));
}

/// Exports a forecast report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ForecastError::Io`](crate::error::ForecastError::Io) if the
/// file cannot be created, or the errors of [`write_json`].
pub fn export_json(report: &ForecastReport, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_json(report, io::BufWriter::new(file))
}

/// Writes a forecast report as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns [`ForecastError::Json`](crate::error::ForecastError::Json) if
/// serialization fails and
/// [`ForecastError::Io`](crate::error::ForecastError::Io) if writing fails.
pub fn write_json(report: &ForecastReport, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{EnergySource, SourceForecast};
    use crate::frame::WeatherFeatureVector;
    use chrono::{Duration, NaiveDate};

    fn series(n: usize, offset: f64) -> ForecastSeries {
        let point: Vec<f64> = (0..n).map(|i| -(i as f64) - offset).collect();
        ForecastSeries {
            lower: point.iter().map(|p| p - 0.5).collect(),
            upper: point.iter().map(|p| (p + 0.5).min(0.0)).collect(),
            point,
        }
    }

    fn source(source: EnergySource, n: usize) -> SourceForecast {
        let s = series(n, 0.25);
        SourceForecast {
            source,
            raw: s.point.clone(),
            smoothed: s.point.clone(),
            series: s,
            half_width: 0.5,
            label_bias: 0.1,
            label_noise_std: 0.05,
        }
    }

    fn make_report(n: usize) -> ForecastReport {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let timestamps: Vec<_> = (0..n).map(|h| start + Duration::hours(h as i64)).collect();
        let weather = timestamps
            .iter()
            .map(|&ts| WeatherFeatureVector::from_reading(ts, 24.0, 5.5, 400.0))
            .collect();
        ForecastReport {
            latitude: 48.1,
            timestamps,
            weather,
            solar: source(EnergySource::Solar, n),
            wind: source(EnergySource::Wind, n),
            total: series(n, 0.5),
        }
    }

    #[test]
    fn header_lists_all_columns() {
        let mut buf = Vec::new();
        write_csv(&make_report(1), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let first_line = output.lines().next().unwrap_or("");
        assert_eq!(first_line.split(',').count(), 16);
        assert!(first_line.starts_with("timestamp,hour,day_of_year"));
        assert!(first_line.ends_with("total_lower_mw,total_upper_mw"));
    }

    #[test]
    fn row_count_matches_horizon() {
        let mut buf = Vec::new();
        write_csv(&make_report(24), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 24 data rows
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn deterministic_output() {
        let report = make_report(5);
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&report, &mut buf1).unwrap();
        write_csv(&report, &mut buf2).unwrap();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn rows_parse_back() {
        let mut buf = Vec::new();
        write_csv(&make_report(3), &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.unwrap();
            assert_eq!(rec.len(), 16);
            assert!(rec[0].starts_with("2024-07-01T0"));
            for i in 4..16 {
                assert!(rec[i].parse::<f64>().is_ok(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }

    #[test]
    fn json_contains_sources_and_timestamps() {
        let mut buf = Vec::new();
        write_json(&make_report(2), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["timestamps"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["solar"]["source"], "solar");
        assert_eq!(value["wind"]["series"]["point"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["timestamps"][0], "2024-07-01T00:00:00");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        use crate::error::ForecastError;
        use std::error::Error as _;

        let path = std::env::temp_dir()
            .join("energy-forecast-missing-dir")
            .join("forecast.csv");
        let err = export_csv(&make_report(2), &path).unwrap_err();
        assert!(matches!(err, ForecastError::Io(_)), "{err:?}");
        assert!(err.source().is_some());
    }
}
