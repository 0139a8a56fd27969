//! `fuelprint run` / `fuelprint validate`: config-driven emission runs.

use std::path::{Path, PathBuf};

use fuelprint_recon::supply::load_csv_input;
use fuelprint_recon::{EmissionReport, ReconConfig, ReconError};

use crate::exit_codes::{EXIT_RECON_INCOMPLETE, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_RUNTIME};
use crate::CliError;

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn read_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;

    ReconConfig::from_toml(&config_str)
        .map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_csv_input(&config, base_dir).map_err(runtime_err)?;
    let report = fuelprint_recon::run(&config, &input).map_err(runtime_err)?;

    write_configured_outputs(&config, base_dir, &report)?;

    if let Some(ref path) = output_file {
        fuelprint_io::write_report(&report, path)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let json_str = fuelprint_io::json::to_string(&report)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, e))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "{}: {} records, {} with totals ({} converted, {} lookup failures, {} unit mismatches, {} calculation errors)",
        report.meta.config_name,
        s.total_records,
        s.computed,
        s.converted,
        s.lookup_failures,
        s.unit_mismatches,
        s.calculation_failures,
    );
    eprintln!("total CO2: {:.3}", s.total_co2_emission);
    if s.low_confidence > 0 {
        eprintln!("low-confidence matches: {}", s.low_confidence);
    }

    if strict && s.failed > 0 {
        return Err(recon_err(
            EXIT_RECON_INCOMPLETE,
            format!("{} of {} record(s) have no total", s.failed, s.total_records),
        )
        .with_hint("see the note column for the calculation error on each row"));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let fuels = config.fuels.density.len() + config.fuels.heating_value.len();
    eprintln!(
        "valid: '{}' ({} -> {}), {} custom fuel entr{}",
        config.name,
        config.input.file,
        config.reference.file,
        fuels,
        if fuels == 1 { "y" } else { "ies" },
    );
    Ok(())
}

fn runtime_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::EmptyReferenceTable => Some("the reference CSV has a header but no rows"),
        ReconError::MissingColumn { .. } => {
            Some("map the CSV header names under [reference.columns] or [input.columns]")
        }
        _ => None,
    };
    let cli_err = recon_err(EXIT_RECON_RUNTIME, err.to_string());
    match hint {
        Some(hint) => cli_err.with_hint(hint),
        None => cli_err,
    }
}

/// Write every path named under `[output]`, relative to the config directory.
fn write_configured_outputs(
    config: &ReconConfig,
    base_dir: &Path,
    report: &EmissionReport,
) -> Result<(), CliError> {
    let out = &config.output;
    if let Some(ref file) = out.json {
        write_output(base_dir, file, |p| fuelprint_io::json::export(report, p))?;
    }
    if let Some(ref file) = out.csv {
        write_output(base_dir, file, |p| fuelprint_io::csv::export(&report.rows, p))?;
    }
    if let Some(ref file) = out.xlsx {
        write_output(base_dir, file, |p| fuelprint_io::xlsx::export(&report.rows, p))?;
    }
    Ok(())
}

fn write_output(
    base_dir: &Path,
    file: &str,
    write: impl FnOnce(&Path) -> Result<(), String>,
) -> Result<(), CliError> {
    let path = base_dir.join(file);
    write(&path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot write {}: {e}", path.display()))
    })?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
