//! Integration tests for the travel-advisor CLI

use std::io::Write;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_travel-advisor"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn default_config() -> String {
    format!("{}/config/default.toml", env!("CARGO_MANIFEST_DIR"))
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Recommends when to travel"));
    assert!(stdout.contains("recommend"));
    assert!(stdout.contains("demo"));
}

/// Test that the CLI requires a subcommand
#[test]
fn test_cli_without_subcommand_fails() {
    let output = run(&[]);
    assert!(!output.status.success());
}

/// Test the demo text report
#[test]
fn test_demo_text_report() {
    let config = default_config();
    let output = run(&["--config", &config, "demo", "--start", "2026-03-01"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Best window: Mar 04 - Mar 10"));
    assert!(stdout.contains("Alternatives:"));
    assert!(stdout.contains("Rejected windows:"));
    assert!(stdout.contains("Storm periods (Mar 19-Mar 22)"));
}

/// Test the demo JSON output is stable across runs
#[test]
fn test_demo_json_is_deterministic() {
    let config = default_config();
    let args = [
        "--config",
        config.as_str(),
        "demo",
        "--start",
        "2026-03-01",
        "--format",
        "json",
    ];
    let first = run(&args);
    let second = run(&args);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert_eq!(json["best"]["start"], "2026-03-04");
    assert_eq!(json["alternatives"].as_array().unwrap().len(), 3);
    assert!(json["why_not"].as_str().unwrap().contains("Storm periods"));
}

/// Test recommend with a scenario file and an anchor override
#[test]
fn test_recommend_with_anchor() {
    let config = default_config();

    // build a scenario file from the library's sample fixture
    let scenario = travel_advisor::Scenario::sample(
        chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    )
    .unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&scenario).unwrap()).unwrap();
    let path = file.path().to_string_lossy().to_string();

    let output = run(&[
        "--config",
        &config,
        "recommend",
        "--input",
        &path,
        "--anchor",
        "2026-03-10",
        "--format",
        "json",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // starts are limited to Mar 06-Mar 14; the earliest storm-free one wins
    assert_eq!(json["best"]["start"], "2026-03-06");
}

/// Test that a missing scenario file fails with a friendly message
#[test]
fn test_recommend_missing_file() {
    let output = run(&["recommend", "--input", "/no/such/scenario.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File operation failed"));
}

/// Test that a horizon shorter than the trip is reported
#[test]
fn test_recommend_short_horizon() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "profile": {{
                "preferred_temperature": {{"min": 72, "max": 85}},
                "budget": {{"min": 150, "max": 300}},
                "trip_length_days": 7
            }},
            "weather_days": [
                {{"date": "2026-03-01", "temp_min": 70, "temp_max": 80, "precipitation": 0.0, "wind_gust": 10}},
                {{"date": "2026-03-02", "temp_min": 70, "temp_max": 80, "precipitation": 0.0, "wind_gust": 10}},
                {{"date": "2026-03-03", "temp_min": 70, "temp_max": 80, "precipitation": 0.0, "wind_gust": 10}}
            ]
        }}"#
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let output = run(&["recommend", "--input", &path]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too short for a 7 day trip"));
}

/// Test that an invalid configuration file is reported
#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[ranking.weights]\nweather = 0.9\nflight = 0.9\nhotel = 0.9").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let output = run(&["--config", &path, "demo", "--start", "2026-03-01"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"));
    assert!(stderr.contains("ranking.weights"));
}
