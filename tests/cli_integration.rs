//! Runs the binary against the bundled scenario files.

use std::path::Path;
use std::process::Command;

use energy_forecast::config::ForecastConfig;

#[test]
fn bundled_scenarios_parse_and_validate() {
    for path in [
        "scenarios/quick.toml",
        "scenarios/utility_scale.toml",
        "scenarios/unclamped.toml",
    ] {
        let config = ForecastConfig::from_toml_file(Path::new(path))
            .unwrap_or_else(|e| panic!("{path}: {e}"));
        let errors = config.validate();
        assert!(errors.is_empty(), "{path}: {errors:?}");
    }
}

#[test]
fn quick_scenario_prints_summary_and_writes_csv() {
    let csv_path = std::env::temp_dir().join(format!("energy-forecast-{}.csv", std::process::id()));
    let output = Command::new(env!("CARGO_BIN_EXE_energy-forecast"))
        .args(["--scenario", "scenarios/quick.toml"])
        .args(["--days", "1", "--start", "2024-06-01", "--latitude", "-33.9"])
        .arg("--csv-out")
        .arg(&csv_path)
        .output()
        .expect("energy-forecast process should run");

    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Forecast Summary (24 h)"), "{stdout}");
    assert!(stdout.contains("Energy mix"), "{stdout}");

    let csv = std::fs::read_to_string(&csv_path).expect("CSV written");
    let _ = std::fs::remove_file(&csv_path);
    assert_eq!(csv.lines().count(), 25);
    assert!(csv.lines().nth(1).is_some_and(|l| l.starts_with("2024-06-01T00:00:00")));
}

#[test]
fn unknown_preset_exits_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_energy-forecast"))
        .args(["--preset", "does_not_exist"])
        .output()
        .expect("energy-forecast process should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "{stderr}");
}
