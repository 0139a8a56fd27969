use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::matcher::{CandidatePool, MatchOptions};
use crate::model::{
    EmissionInput, EmissionReport, InputRecord, ReferenceEntry, ReportMeta, ResultRecord,
};
use crate::properties::PropertyTables;
use crate::units::{convert_with, normalize_unit, ConversionOutcome};

/// Knobs for a batch. `Default` gives the plain behavior: case-sensitive
/// matching, built-in property tables, no confidence threshold.
#[derive(Debug, Clone, Default)]
pub struct CalcOptions {
    pub matching: MatchOptions,
    pub tables: PropertyTables,
    pub low_score_threshold: Option<f64>,
}

impl CalcOptions {
    pub fn from_config(config: &ReconConfig) -> Self {
        Self {
            matching: config.matching.options(),
            tables: config.fuels.tables(),
            low_score_threshold: config.matching.low_score_threshold,
        }
    }
}

/// Run a config against pre-loaded data. Returns rows + summary.
pub fn run(config: &ReconConfig, input: &EmissionInput) -> Result<EmissionReport, ReconError> {
    let options = CalcOptions::from_config(config);
    let rows = compute_with(&input.records, &input.references, &options)?;
    let summary = compute_summary(&rows);

    log::info!(
        "{}: {} records, {} computed, {} failed, {:.3} kg CO2 total",
        config.name,
        summary.total_records,
        summary.computed,
        summary.failed,
        summary.total_co2_emission,
    );

    Ok(EmissionReport {
        meta: ReportMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            reference_entries: input.references.len(),
        },
        summary,
        rows,
    })
}

/// One result per input record, in input order.
///
/// Fails only when `references` is empty. Every per-record problem (no
/// coefficient, no conversion rule, non-finite numbers) ends up in that
/// record's `note` instead.
pub fn compute(
    inputs: &[InputRecord],
    references: &[ReferenceEntry],
) -> Result<Vec<ResultRecord>, ReconError> {
    compute_with(inputs, references, &CalcOptions::default())
}

pub fn compute_with(
    inputs: &[InputRecord],
    references: &[ReferenceEntry],
    options: &CalcOptions,
) -> Result<Vec<ResultRecord>, ReconError> {
    if references.is_empty() {
        return Err(ReconError::EmptyReferenceTable);
    }

    let names: Vec<&str> = references.iter().map(|r| r.name.as_str()).collect();
    let pool = CandidatePool::new(&names, options.matching);

    inputs
        .iter()
        .map(|record| compute_one(record, references, &pool, options))
        .collect()
}

fn compute_one(
    record: &InputRecord,
    references: &[ReferenceEntry],
    pool: &CandidatePool,
    options: &CalcOptions,
) -> Result<ResultRecord, ReconError> {
    let matched = pool.best_match(&record.source)?;
    let entry = &references[matched.index];
    let unit = normalize_unit(&record.unit);
    let emission_unit = normalize_unit(&entry.unit);

    log::debug!(
        "'{}' -> '{}' (score {:.1})",
        record.source,
        entry.name,
        matched.score
    );

    let conversion = convert_with(
        &options.tables,
        record.quantity,
        &unit,
        &emission_unit,
        &record.source,
    );

    match &conversion.outcome {
        ConversionOutcome::LookupFailure { .. } | ConversionOutcome::UnitMismatch => {
            log::warn!("{}", conversion.note);
        }
        ConversionOutcome::Converted { .. } => log::debug!("{}", conversion.note),
        ConversionOutcome::Identity => {}
    }

    let mut note = conversion.note;

    let (total_co2_emission, calculation_failed) =
        match multiply(conversion.normalized_quantity, entry.emission_factor) {
            Ok(total) => (Some(total), false),
            Err(detail) => {
                log::warn!("'{}': calculation error: {detail}", record.source);
                append_note(&mut note, &format!("Calculation error: {detail}"));
                (None, true)
            }
        };

    let low_confidence = match options.low_score_threshold {
        Some(threshold) if matched.score < threshold => {
            append_note(
                &mut note,
                &format!(
                    "Low match confidence: score {:.1} below threshold {threshold}.",
                    matched.score
                ),
            );
            true
        }
        _ => false,
    };

    Ok(ResultRecord {
        source: record.source.clone(),
        matched_product: entry.name.clone(),
        quantity: record.quantity,
        unit,
        emission_factor: entry.emission_factor,
        emission_factor_unit: emission_unit,
        total_co2_emission,
        note,
        match_score: matched.score,
        normalized_quantity: conversion.normalized_quantity,
        normalized_unit: conversion.normalized_unit,
        conversion: conversion.outcome,
        low_confidence,
        calculation_failed,
    })
}

fn multiply(quantity: f64, factor: f64) -> Result<f64, String> {
    if !quantity.is_finite() {
        return Err(format!("quantity {quantity} is not a finite number"));
    }
    if !factor.is_finite() {
        return Err(format!("emission factor {factor} is not a finite number"));
    }
    let total = quantity * factor;
    if !total.is_finite() {
        return Err(format!("{quantity} x {factor} overflows"));
    }
    Ok(total)
}

/// Space-separated append; no leading space on an empty note.
fn append_note(note: &mut String, part: &str) {
    if !note.is_empty() {
        note.push(' ');
    }
    note.push_str(part);
}
