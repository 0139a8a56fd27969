// FuelPrint CLI - match fuel consumption to emission factors and total the CO2

mod exit_codes;
mod logging;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use fuelprint_recon::config::ReferenceColumns;
use fuelprint_recon::matcher::best_match_with;
use fuelprint_recon::properties::{FuelEntry, FuelProperty, PropertyTables};
use fuelprint_recon::supply::{CsvReferenceTable, ReferenceSupplier};
use fuelprint_recon::{ConversionOutcome, MatchOptions};

use exit_codes::{EXIT_CONVERT_NO_RULE, EXIT_ERROR, EXIT_RECON_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "fuelprint")]
#[command(about = "Match fuel consumption records to emission factors and total the CO2")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v warn, -vv info, -vvv debug). Overrides FUELPRINT_LOG.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an emission calculation from a TOML config file
    #[command(after_help = "\
Examples:
  fuelprint run fleet.recon.toml
  fuelprint run fleet.recon.toml --json
  fuelprint run fleet.recon.toml --output emissions.xlsx
  fuelprint run fleet.recon.toml --strict")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Also write the report here (.json, .csv or .xlsx)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when any record ends up without a total
        #[arg(long)]
        strict: bool,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  fuelprint validate fleet.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Convert a quantity between liter, kg and kWh for a fuel description
    #[command(after_help = "\
Examples:
  fuelprint convert --quantity 100 --from liter --to kg --source 'Diesel Fuel Type A'
  fuelprint convert --quantity 50 --from kg --to kwh --source propane --json")]
    Convert {
        #[arg(long)]
        quantity: f64,

        /// Unit of the quantity
        #[arg(long)]
        from: String,

        /// Unit to convert to
        #[arg(long)]
        to: String,

        /// Free-text fuel description used for the property lookup
        #[arg(long)]
        source: String,

        #[arg(long)]
        json: bool,
    },

    /// Find the closest product name in a reference CSV
    #[command(after_help = "\
Examples:
  fuelprint match 'Diesel Fuel Type A' --reference factors.csv
  fuelprint match 'natural-gas' --reference factors.csv --normalize --json")]
    Match {
        /// Text to look up
        query: String,

        /// Reference CSV with product, emission_factor and unit columns
        #[arg(long)]
        reference: PathBuf,

        /// Header of the product name column
        #[arg(long, default_value = "product")]
        name_column: String,

        /// Header of the emission factor column
        #[arg(long, default_value = "emission_factor")]
        factor_column: String,

        /// Header of the unit column
        #[arg(long, default_value = "unit")]
        unit_column: String,

        /// Lowercase and strip punctuation before scoring
        #[arg(long)]
        normalize: bool,

        #[arg(long)]
        json: bool,
    },

    /// List the built-in density and heating value tables
    Fuels {
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  fuelprint-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, strict } => recon::cmd_run(config, json, output, strict),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Convert { quantity, from, to, source, json } => {
            cmd_convert(quantity, from, to, source, json)
        }
        Commands::Match {
            query,
            reference,
            name_column,
            factor_column,
            unit_column,
            normalize,
            json,
        } => {
            let columns = ReferenceColumns {
                name: name_column,
                emission_factor: factor_column,
                unit: unit_column,
            };
            cmd_match(query, reference, columns, normalize, json)
        }
        Commands::Fuels { json } => cmd_fuels(json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::other(format!("JSON serialization error: {e}")))
}

// ============================================================================
// convert
// ============================================================================

fn cmd_convert(
    quantity: f64,
    from: String,
    to: String,
    source: String,
    json: bool,
) -> Result<(), CliError> {
    if !quantity.is_finite() {
        return Err(CliError::args(format!("--quantity must be a finite number, got {quantity}")));
    }

    let result = fuelprint_recon::convert(quantity, &from, &to, &source);

    if json {
        println!("{}", to_json(&result)?);
    } else {
        println!("{} {}", result.normalized_quantity, result.normalized_unit);
        if !result.note.is_empty() {
            eprintln!("{}", result.note);
        }
    }

    match result.outcome {
        ConversionOutcome::Identity | ConversionOutcome::Converted { .. } => Ok(()),
        ConversionOutcome::LookupFailure { property } => Err(CliError {
            code: EXIT_CONVERT_NO_RULE,
            message: String::new(),
            hint: Some(format!(
                "no built-in {property} entry matches '{source}'; `fuelprint fuels` lists them"
            )),
        }),
        ConversionOutcome::UnitMismatch => Err(CliError {
            code: EXIT_CONVERT_NO_RULE,
            message: String::new(),
            hint: Some("supported conversions: liter -> kg, kwh -> kg, kg -> kwh".into()),
        }),
    }
}

// ============================================================================
// match
// ============================================================================

#[derive(Serialize)]
struct MatchOutput<'a> {
    query: &'a str,
    matched_product: &'a str,
    score: f64,
    emission_factor: f64,
    unit: &'a str,
    row: usize,
}

fn cmd_match(
    query: String,
    reference: PathBuf,
    columns: ReferenceColumns,
    normalize: bool,
    json: bool,
) -> Result<(), CliError> {
    let runtime = |e: fuelprint_recon::ReconError| CliError {
        code: EXIT_RECON_RUNTIME,
        message: e.to_string(),
        hint: None,
    };

    let entries = CsvReferenceTable::from_path(&reference, columns)
        .and_then(|table| table.reference_entries())
        .map_err(runtime)?;
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let m = best_match_with(&query, &names, MatchOptions { normalize }).map_err(runtime)?;
    let entry = &entries[m.index];

    if json {
        let out = MatchOutput {
            query: &query,
            matched_product: &entry.name,
            score: m.score,
            emission_factor: entry.emission_factor,
            unit: &entry.unit,
            row: m.index,
        };
        println!("{}", to_json(&out)?);
    } else {
        println!("{}", entry.name);
        eprintln!(
            "score {:.1}, factor {} per {}",
            m.score, entry.emission_factor, entry.unit
        );
    }
    Ok(())
}

// ============================================================================
// fuels
// ============================================================================

fn cmd_fuels(json: bool) -> Result<(), CliError> {
    let tables = PropertyTables::builtin();
    let properties = [FuelProperty::Density, FuelProperty::HeatingValue];

    if json {
        #[derive(Serialize)]
        struct FuelTables {
            density: Vec<FuelEntry>,
            heating_value: Vec<FuelEntry>,
        }
        let entries = |property: FuelProperty| -> Vec<FuelEntry> {
            tables
                .entries(property)
                .iter()
                .map(|(name, value)| FuelEntry { name: name.clone(), value: *value })
                .collect()
        };
        let out = FuelTables {
            density: entries(FuelProperty::Density),
            heating_value: entries(FuelProperty::HeatingValue),
        };
        println!("{}", to_json(&out)?);
        return Ok(());
    }

    for (i, property) in properties.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} ({})", property, property.unit());
        for (name, value) in tables.entries(property) {
            println!("  {name:<24} {value}");
        }
    }
    Ok(())
}
