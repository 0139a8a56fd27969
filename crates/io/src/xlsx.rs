// Excel export

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use fuelprint_recon::model::ResultRecord;

use crate::COLUMNS;

pub const SHEET_NAME: &str = "Emissions";

/// One header row, then one row per result. Numbers are written as numbers;
/// absent totals and non-finite numbers are left blank.
pub fn export(rows: &[ResultRecord], path: &Path) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| format!("Failed to create sheet '{SHEET_NAME}': {e}"))?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, &header)
            .map_err(|e| format!("Failed to write header: {e}"))?;
    }

    for (i, row) in rows.iter().enumerate() {
        // rust_xlsxwriter uses 0-based row/col as u32/u16
        let r = (i + 1) as u32;
        let cells = [
            Cell::Text(&row.source),
            Cell::Text(&row.matched_product),
            Cell::Number(Some(row.quantity)),
            Cell::Text(&row.unit),
            Cell::Number(Some(row.emission_factor)),
            Cell::Text(&row.emission_factor_unit),
            Cell::Number(row.total_co2_emission),
            Cell::Text(&row.note),
            Cell::Number(Some(row.match_score)),
            Cell::Number(Some(row.normalized_quantity)),
            Cell::Text(&row.normalized_unit),
        ];

        for (col, cell) in cells.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet
                        .write_string(r, c, *s)
                        .map_err(|e| format!("Failed to write row {r}: {e}"))?;
                }
                Cell::Number(Some(n)) if n.is_finite() => {
                    worksheet
                        .write_number(r, c, *n)
                        .map_err(|e| format!("Failed to write row {r}: {e}"))?;
                }
                Cell::Number(_) => {}
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {e}"))?;
    Ok(())
}

enum Cell<'a> {
    Text(&'a str),
    Number(Option<f64>),
}
