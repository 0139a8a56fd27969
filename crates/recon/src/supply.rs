//! Data suppliers for the reference table and the input records.
//!
//! The engine only sees `Vec<ReferenceEntry>` / `Vec<InputRecord>`; where they
//! come from is behind [`ReferenceSupplier`] and [`RecordSupplier`]. In-memory
//! vectors and CSV text are provided here.
//!
//! CSV rows are never dropped. A missing cell reads as an empty string, and a
//! missing or unparseable number reads as NaN (logged), which the engine later
//! reports as a calculation error on that row. A header without a mapped
//! column is a structural error.

use std::path::Path;

use crate::config::{InputColumns, ReconConfig, ReferenceColumns};
use crate::error::ReconError;
use crate::model::{EmissionInput, InputRecord, ReferenceEntry};

pub trait ReferenceSupplier {
    fn reference_entries(&self) -> Result<Vec<ReferenceEntry>, ReconError>;
}

pub trait RecordSupplier {
    fn input_records(&self) -> Result<Vec<InputRecord>, ReconError>;
}

impl ReferenceSupplier for Vec<ReferenceEntry> {
    fn reference_entries(&self) -> Result<Vec<ReferenceEntry>, ReconError> {
        Ok(self.clone())
    }
}

impl RecordSupplier for Vec<InputRecord> {
    fn input_records(&self) -> Result<Vec<InputRecord>, ReconError> {
        Ok(self.clone())
    }
}

/// Pull both collections from their suppliers.
pub fn load_input(
    references: &dyn ReferenceSupplier,
    records: &dyn RecordSupplier,
) -> Result<EmissionInput, ReconError> {
    Ok(EmissionInput {
        references: references.reference_entries()?,
        records: records.input_records()?,
    })
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Reference table held as CSV text.
#[derive(Debug, Clone)]
pub struct CsvReferenceTable {
    data: String,
    columns: ReferenceColumns,
}

impl CsvReferenceTable {
    pub fn new(data: impl Into<String>, columns: ReferenceColumns) -> Self {
        Self {
            data: data.into(),
            columns,
        }
    }

    pub fn from_path(path: &Path, columns: ReferenceColumns) -> Result<Self, ReconError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        Ok(Self::new(data, columns))
    }
}

impl ReferenceSupplier for CsvReferenceTable {
    fn reference_entries(&self) -> Result<Vec<ReferenceEntry>, ReconError> {
        const TABLE: &str = "reference";
        let mut reader = reader(&self.data);
        let headers = reader.headers()?.clone();

        let col = &self.columns;
        let name_idx = column_index(&headers, TABLE, &col.name)?;
        let factor_idx = column_index(&headers, TABLE, &col.emission_factor)?;
        let unit_idx = column_index(&headers, TABLE, &col.unit)?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = line_of(&record);
            let factor = parse_number(record.get(factor_idx), TABLE, &col.emission_factor, line);
            entries.push(ReferenceEntry::new(
                record.get(name_idx).unwrap_or(""),
                factor,
                record.get(unit_idx).unwrap_or(""),
            ));
        }

        log::debug!("loaded {} reference entries", entries.len());
        Ok(entries)
    }
}

/// Input records held as CSV text.
#[derive(Debug, Clone)]
pub struct CsvInputRecords {
    data: String,
    columns: InputColumns,
}

impl CsvInputRecords {
    pub fn new(data: impl Into<String>, columns: InputColumns) -> Self {
        Self {
            data: data.into(),
            columns,
        }
    }

    pub fn from_path(path: &Path, columns: InputColumns) -> Result<Self, ReconError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
        Ok(Self::new(data, columns))
    }
}

impl RecordSupplier for CsvInputRecords {
    fn input_records(&self) -> Result<Vec<InputRecord>, ReconError> {
        const TABLE: &str = "input";
        let mut reader = reader(&self.data);
        let headers = reader.headers()?.clone();

        let col = &self.columns;
        let source_idx = column_index(&headers, TABLE, &col.source)?;
        let quantity_idx = column_index(&headers, TABLE, &col.quantity)?;
        let unit_idx = column_index(&headers, TABLE, &col.unit)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = line_of(&record);
            records.push(InputRecord {
                source: record.get(source_idx).unwrap_or("").to_string(),
                quantity: parse_number(record.get(quantity_idx), TABLE, &col.quantity, line),
                unit: record.get(unit_idx).unwrap_or("").to_string(),
            });
        }

        log::debug!("loaded {} input records", records.len());
        Ok(records)
    }
}

/// Load both CSV files named in `config`, resolving paths against `base_dir`.
pub fn load_csv_input(config: &ReconConfig, base_dir: &Path) -> Result<EmissionInput, ReconError> {
    let references = CsvReferenceTable::from_path(
        &base_dir.join(&config.reference.file),
        config.reference.columns.clone(),
    )?;
    let records = CsvInputRecords::from_path(
        &base_dir.join(&config.input.file),
        config.input.columns.clone(),
    )?;
    load_input(&references, &records)
}

fn reader(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data.as_bytes())
}

fn column_index(headers: &csv::StringRecord, table: &str, name: &str) -> Result<usize, ReconError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ReconError::MissingColumn {
            table: table.into(),
            column: name.into(),
        })
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_number(raw: Option<&str>, table: &str, column: &str, line: u64) -> f64 {
    let raw = raw.unwrap_or("").trim();
    match raw.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("{table} line {line}: column '{column}' is not a number: '{raw}'");
            f64::NAN
        }
    }
}
