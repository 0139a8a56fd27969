// CSV export

use std::io::Write;
use std::path::Path;

use fuelprint_recon::model::ResultRecord;

use crate::{row_fields, COLUMNS};

pub fn export(rows: &[ResultRecord], path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| e.to_string())?;
    export_to(rows, file)
}

/// Header row, then one record per result row.
pub fn export_to<W: Write>(rows: &[ResultRecord], out: W) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);

    writer.write_record(COLUMNS).map_err(|e| e.to_string())?;
    for row in rows {
        writer.write_record(row_fields(row)).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}
