// JSON export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use fuelprint_recon::model::EmissionReport;

/// Pretty-printed report: `meta`, `summary`, `rows`.
pub fn export(report: &EmissionReport, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| e.to_string())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn to_string(report: &EmissionReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| format!("JSON serialization error: {e}"))
}
