use std::collections::BTreeMap;

use crate::model::{EmissionSummary, ResultRecord};
use crate::units::ConversionOutcome;

/// Compute summary statistics from result rows.
pub fn compute_summary(rows: &[ResultRecord]) -> EmissionSummary {
    let mut by_product: BTreeMap<String, f64> = BTreeMap::new();
    let mut computed = 0;
    let mut identity = 0;
    let mut converted = 0;
    let mut lookup_failures = 0;
    let mut unit_mismatches = 0;
    let mut calculation_failures = 0;
    let mut low_confidence = 0;
    let mut total_co2_emission = 0.0;
    let mut score_sum = 0.0;

    for r in rows {
        match r.conversion {
            ConversionOutcome::Identity => identity += 1,
            ConversionOutcome::Converted { .. } => converted += 1,
            ConversionOutcome::LookupFailure { .. } => lookup_failures += 1,
            ConversionOutcome::UnitMismatch => unit_mismatches += 1,
        }

        if let Some(total) = r.total_co2_emission {
            computed += 1;
            total_co2_emission += total;
            *by_product.entry(r.matched_product.clone()).or_insert(0.0) += total;
        }
        if r.calculation_failed {
            calculation_failures += 1;
        }
        if r.low_confidence {
            low_confidence += 1;
        }
        score_sum += r.match_score;
    }

    EmissionSummary {
        total_records: rows.len(),
        computed,
        failed: rows.len() - computed,
        identity,
        converted,
        lookup_failures,
        unit_mismatches,
        calculation_failures,
        low_confidence,
        total_co2_emission,
        mean_match_score: if rows.is_empty() {
            None
        } else {
            Some(score_sum / rows.len() as f64)
        },
        by_product,
    }
}
