// Result writers

pub mod csv;
pub mod json;
pub mod xlsx;

use std::path::Path;

use fuelprint_recon::model::{EmissionReport, ResultRecord};

/// Column order shared by the tabular writers.
pub const COLUMNS: [&str; 11] = [
    "source",
    "matched_product",
    "quantity",
    "unit",
    "emission_factor",
    "emission_factor_unit",
    "total_co2_emission",
    "note",
    "match_score",
    "normalized_quantity",
    "normalized_unit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    Xlsx,
}

impl OutputFormat {
    /// Pick a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }
}

/// Write a report in the format implied by `path`'s extension.
pub fn write_report(report: &EmissionReport, path: &Path) -> Result<(), String> {
    match OutputFormat::from_path(path) {
        Some(OutputFormat::Csv) => csv::export(&report.rows, path),
        Some(OutputFormat::Json) => json::export(report, path),
        Some(OutputFormat::Xlsx) => xlsx::export(&report.rows, path),
        None => Err(format!(
            "unsupported output format: {} (expected .csv, .json or .xlsx)",
            path.display()
        )),
    }
}

/// Display form of a row's fields, in [`COLUMNS`] order. Absent totals are empty.
pub(crate) fn row_fields(row: &ResultRecord) -> [String; 11] {
    [
        row.source.clone(),
        row.matched_product.clone(),
        row.quantity.to_string(),
        row.unit.clone(),
        row.emission_factor.to_string(),
        row.emission_factor_unit.clone(),
        row.total_co2_emission.map(|t| t.to_string()).unwrap_or_default(),
        row.note.clone(),
        row.match_score.to_string(),
        row.normalized_quantity.to_string(),
        row.normalized_unit.clone(),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.CSV")), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_path(Path::new("a/b.json")), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_path(Path::new("r.xlsx")), Some(OutputFormat::Xlsx));
        assert_eq!(OutputFormat::from_path(Path::new("r.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn absent_total_is_blank() {
        let rows = test_rows::sample();
        assert_eq!(row_fields(&rows[2])[6], "");
        assert_eq!(row_fields(&rows[1])[6], (1000.0f64 * 0.184).to_string());
    }
}
