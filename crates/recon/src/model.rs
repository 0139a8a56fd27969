use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units::{normalize_unit, ConversionOutcome};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the emission-factor reference table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReferenceEntry {
    pub name: String,
    pub emission_factor: f64,
    /// Lowercased, trimmed.
    pub unit: String,
}

impl ReferenceEntry {
    pub fn new(name: impl Into<String>, emission_factor: f64, unit: &str) -> Self {
        Self {
            name: name.into(),
            emission_factor,
            unit: normalize_unit(unit),
        }
    }
}

/// One consumption record to be priced in CO2.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputRecord {
    pub source: String,
    pub quantity: f64,
    pub unit: String,
}

impl InputRecord {
    pub fn new(source: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Fully annotated result for one input record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub source: String,
    pub matched_product: String,
    pub quantity: f64,
    /// Input unit, lowercased and trimmed.
    pub unit: String,
    pub emission_factor: f64,
    pub emission_factor_unit: String,
    /// `None` when the multiplication could not produce a finite number.
    pub total_co2_emission: Option<f64>,
    pub note: String,
    pub match_score: f64,
    pub normalized_quantity: f64,
    pub normalized_unit: String,
    pub conversion: ConversionOutcome,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub low_confidence: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub calculation_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionSummary {
    pub total_records: usize,
    pub computed: usize,
    pub failed: usize,
    pub identity: usize,
    pub converted: usize,
    pub lookup_failures: usize,
    pub unit_mismatches: usize,
    pub calculation_failures: usize,
    pub low_confidence: usize,
    pub total_co2_emission: f64,
    pub mean_match_score: Option<f64>,
    /// Summed emissions per matched reference product.
    pub by_product: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub reference_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmissionReport {
    pub meta: ReportMeta,
    pub summary: EmissionSummary,
    pub rows: Vec<ResultRecord>,
}

/// Pre-loaded reference table and input records for one run.
#[derive(Debug, Clone, Default)]
pub struct EmissionInput {
    pub references: Vec<ReferenceEntry>,
    pub records: Vec<InputRecord>,
}
