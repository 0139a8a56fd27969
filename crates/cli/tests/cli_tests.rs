// End-to-end tests for the fuelprint binary.
//
// Each test copies the recon fixtures into a temp dir so configured outputs
// never land in the source tree.
//
// Run with: cargo test -p fuelprint-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fuelprint() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fuelprint"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("FUELPRINT_LOG");
    cmd
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../recon/tests/fixtures")
}

/// Temp dir holding factors.csv, fuel_log.csv and `config` as fleet.recon.toml.
fn workspace(config: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["factors.csv", "fuel_log.csv"] {
        std::fs::copy(fixtures_dir().join(name), dir.path().join(name)).unwrap();
    }
    std::fs::write(dir.path().join("fleet.recon.toml"), config).unwrap();
    dir
}

fn fleet_config() -> String {
    std::fs::read_to_string(fixtures_dir().join("fleet.recon.toml")).unwrap()
}

fn config_path(dir: &Path) -> String {
    dir.join("fleet.recon.toml").to_str().unwrap().to_string()
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

// ===========================================================================
// run
// ===========================================================================

#[test]
fn run_json_is_single_report() {
    let dir = workspace(&fleet_config());
    let output = fuelprint()
        .args(["run", &config_path(dir.path()), "--json"])
        .output()
        .expect("fuelprint run --json");
    assert_exit(&output, 0);

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["meta"]["config_name"], "Fleet Q1");
    assert_eq!(val["rows"].as_array().unwrap().len(), 6);
    assert_eq!(val["rows"][0]["matched_product"], "Diesel Fuel");
    assert!(val["rows"][5]["total_co2_emission"].is_null());
    assert_eq!(val["summary"]["computed"], 5);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("6 records"), "stderr: {stderr}");
}

#[test]
fn run_without_json_keeps_stdout_empty() {
    let dir = workspace(&fleet_config());
    let output = fuelprint()
        .args(["run", &config_path(dir.path())])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    assert!(output.stdout.is_empty());
}

#[test]
fn run_strict_reports_incomplete() {
    let dir = workspace(&fleet_config());
    let output = fuelprint()
        .args(["run", &config_path(dir.path()), "--strict"])
        .output()
        .unwrap();
    assert_exit(&output, 62);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: 1 of 6 record(s) have no total"), "stderr: {stderr}");
}

#[test]
fn run_writes_configured_and_requested_outputs() {
    let config = format!(
        "{}\n[output]\njson = \"out/report.json\"\ncsv = \"emissions.csv\"\n",
        fleet_config()
    );
    let dir = workspace(&config);
    std::fs::create_dir(dir.path().join("out")).unwrap();
    let extra = dir.path().join("extra.xlsx");

    let output = fuelprint()
        .args(["run", &config_path(dir.path()), "--output", extra.to_str().unwrap()])
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let json = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    let val: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(val["summary"]["total_records"], 6);

    let csv = std::fs::read_to_string(dir.path().join("emissions.csv")).unwrap();
    assert!(csv.starts_with("source,matched_product,quantity,unit"));
    assert_eq!(csv.lines().count(), 7);

    assert!(extra.exists());
}

#[test]
fn run_rejects_unknown_output_extension() {
    let dir = workspace(&fleet_config());
    let bad = dir.path().join("report.txt");
    let output = fuelprint()
        .args(["run", &config_path(dir.path()), "--output", bad.to_str().unwrap()])
        .output()
        .unwrap();
    assert_exit(&output, 61);
    assert!(!bad.exists());
}

#[test]
fn run_missing_column_has_hint() {
    let config = format!("{}\n[input.columns]\nquantity = \"litres\"\n", fleet_config());
    let dir = workspace(&config);
    let output = fuelprint()
        .args(["run", &config_path(dir.path())])
        .output()
        .unwrap();
    assert_exit(&output, 61);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing column 'litres'"), "stderr: {stderr}");
    assert!(stderr.contains("hint:"));
}

#[test]
fn run_verbose_logs_warnings() {
    let dir = workspace(&fleet_config());
    let output = fuelprint()
        .args(["run", &config_path(dir.path()), "-v"])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warn: "), "stderr: {stderr}");
}

// ===========================================================================
// validate
// ===========================================================================

#[test]
fn validate_ok() {
    let dir = workspace(&fleet_config());
    let output = fuelprint()
        .args(["validate", &config_path(dir.path())])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    assert!(String::from_utf8_lossy(&output.stderr).contains("valid: 'Fleet Q1'"));
}

#[test]
fn validate_bad_threshold() {
    let config = format!("{}\n[matching]\nlow_score_threshold = 150.0\n", fleet_config());
    let dir = workspace(&config);
    let output = fuelprint()
        .args(["validate", &config_path(dir.path())])
        .output()
        .unwrap();
    assert_exit(&output, 60);
    assert!(String::from_utf8_lossy(&output.stderr).contains("low_score_threshold"));
}

#[test]
fn validate_missing_file() {
    let output = fuelprint()
        .args(["validate", "does/not/exist.recon.toml"])
        .output()
        .unwrap();
    assert_exit(&output, 61);
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read config"));
}

// ===========================================================================
// convert
// ===========================================================================

#[test]
fn convert_liters_of_diesel() {
    let output = fuelprint()
        .args(["convert", "--quantity", "100", "--from", "liter", "--to", "kg"])
        .args(["--source", "Diesel Fuel Type A"])
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let (qty, unit) = stdout.trim().split_once(' ').unwrap();
    assert!((qty.parse::<f64>().unwrap() - 83.2).abs() < 1e-9);
    assert_eq!(unit, "kg");
    assert!(String::from_utf8_lossy(&output.stderr).contains("using density 0.832 for diesel fuel"));
}

#[test]
fn convert_json_shape() {
    let output = fuelprint()
        .args(["convert", "--quantity", "2", "--from", "kg", "--to", "kwh"])
        .args(["--source", "propane", "--json"])
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["normalized_unit"], "kwh");
    assert_eq!(val["outcome"]["kind"], "converted");
    assert_eq!(val["outcome"]["property"], "heating_value");
    assert!((val["normalized_quantity"].as_f64().unwrap() - 27.6).abs() < 1e-9);
}

#[test]
fn convert_unknown_fuel_exits_63() {
    let output = fuelprint()
        .args(["convert", "--quantity", "5", "--from", "liter", "--to", "kg"])
        .args(["--source", "Mystery Fuel"])
        .output()
        .unwrap();
    assert_exit(&output, 63);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5 liter");
    assert!(String::from_utf8_lossy(&output.stderr).contains("No density found"));
}

#[test]
fn convert_unit_mismatch_exits_63() {
    let output = fuelprint()
        .args(["convert", "--quantity", "3", "--from", "ton", "--to", "kg"])
        .args(["--source", "coal"])
        .output()
        .unwrap();
    assert_exit(&output, 63);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unit mismatch"));
}

// ===========================================================================
// match
// ===========================================================================

#[test]
fn match_prints_best_product() {
    let output = fuelprint()
        .args(["match", "Diesel Fuel Type A", "--reference", "../recon/tests/fixtures/factors.csv"])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Diesel Fuel");
}

#[test]
fn match_json_normalized() {
    let output = fuelprint()
        .args(["match", "natural-gas", "--reference", "../recon/tests/fixtures/factors.csv"])
        .args(["--normalize", "--json"])
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["matched_product"], "Natural Gas");
    assert_eq!(val["score"], 100.0);
    assert_eq!(val["unit"], "kwh");
    assert_eq!(val["row"], 2);
}

#[test]
fn match_empty_reference_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("empty.csv");
    std::fs::write(&csv, "product,emission_factor,unit\n").unwrap();
    let output = fuelprint()
        .args(["match", "diesel", "--reference", csv.to_str().unwrap()])
        .output()
        .unwrap();
    assert_exit(&output, 61);
}

// ===========================================================================
// fuels
// ===========================================================================

#[test]
fn fuels_json_keeps_declaration_order() {
    let output = fuelprint().args(["fuels", "--json"]).output().unwrap();
    assert_exit(&output, 0);

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let density = val["density"].as_array().unwrap();
    assert_eq!(density[0]["name"], "diesel fuel");
    assert_eq!(density[0]["value"], 0.832);
    let heating = val["heating_value"].as_array().unwrap();
    let coal = heating.iter().position(|e| e["name"] == "coal").unwrap();
    let brown = heating.iter().position(|e| e["name"] == "brown coal").unwrap();
    assert!(coal < brown);
}

#[test]
fn fuels_text_lists_both_tables() {
    let output = fuelprint().arg("fuels").output().unwrap();
    assert_exit(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("density (kg/liter)"));
    assert!(stdout.contains("heating value (kWh/kg)"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = fuelprint().arg("frobnicate").output().unwrap();
    assert_exit(&output, 2);
}
