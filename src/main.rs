//! Forecast entry point: simulate weather, run the pipeline, report.

use std::process;

use chrono::{Local, NaiveDateTime, Timelike};
use clap::Parser;
use tracing::info;

use energy_forecast::cli::Args;
use energy_forecast::error::Result;
use energy_forecast::forecast::ForecastPipeline;
use energy_forecast::io::export::{export_csv, export_json};
use energy_forecast::report::ForecastSummary;
use energy_forecast::telemetry::init_tracing;
use energy_forecast::weather::WeatherSimulator;

/// Seed offset for the weather simulator to avoid correlation with label draws.
const WEATHER_SEED_OFFSET: u64 = 57;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.load_config()?;
    let start = args.start.unwrap_or_else(current_hour);

    let mut weather = WeatherSimulator::new(
        args.temperature,
        args.wind_speed,
        args.irradiance,
        config.labels.seed.wrapping_add(WEATHER_SEED_OFFSET),
    );
    let frame = weather.frame(start, args.hours())?;
    info!(%start, hours = frame.len(), latitude = args.latitude, "simulated weather");

    let report = ForecastPipeline::new(config).run(&frame, args.latitude)?;
    println!("{}", ForecastSummary::from_report(&report));

    if let Some(path) = &args.csv_out {
        export_csv(&report, path)?;
        info!(path = %path.display(), "wrote CSV forecast");
    }
    if let Some(path) = &args.json_out {
        export_json(&report, path)?;
        info!(path = %path.display(), "wrote JSON forecast");
    }
    Ok(())
}

fn current_hour() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.date().and_hms_opt(now.hour(), 0, 0).unwrap_or(now)
}
