//! Unit reconciliation between an input quantity and an emission factor's unit.
//!
//! Only the combustion-fuel graph is supported:
//!
//! | input  | target | rule                      |
//! |--------|--------|---------------------------|
//! | X      | X      | pass through              |
//! | liter  | kg     | multiply by density       |
//! | kwh    | kg     | divide by heating value   |
//! | kg     | kwh    | multiply by heating value |
//!
//! Anything else passes through with a mismatch note. A missing coefficient is
//! reported in the note, never raised.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::properties::{FuelProperty, PropertyTables};

static BUILTIN_TABLES: Lazy<PropertyTables> = Lazy::new(PropertyTables::builtin);

/// How a quantity was (or was not) normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Units already agree.
    Identity,
    Converted {
        property: FuelProperty,
        coefficient: f64,
        fuel: String,
    },
    /// A rule exists for the unit pair but no coefficient matched the description.
    LookupFailure { property: FuelProperty },
    /// No rule for the unit pair.
    UnitMismatch,
}

impl ConversionOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub normalized_quantity: f64,
    pub normalized_unit: String,
    /// Empty when units already agree.
    pub note: String,
    pub outcome: ConversionOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Multiply(FuelProperty),
    Divide(FuelProperty),
}

impl Rule {
    fn property(self) -> FuelProperty {
        match self {
            Self::Multiply(p) | Self::Divide(p) => p,
        }
    }

    fn apply(self, quantity: f64, coefficient: f64) -> f64 {
        match self {
            Self::Multiply(_) => quantity * coefficient,
            Self::Divide(_) => quantity / coefficient,
        }
    }
}

fn rule_for(input_unit: &str, target_unit: &str) -> Option<Rule> {
    match (input_unit, target_unit) {
        ("liter", "kg") => Some(Rule::Multiply(FuelProperty::Density)),
        ("kwh", "kg") => Some(Rule::Divide(FuelProperty::HeatingValue)),
        ("kg", "kwh") => Some(Rule::Multiply(FuelProperty::HeatingValue)),
        _ => None,
    }
}

/// Lowercase + trim. Units are compared in this form.
pub fn normalize_unit(unit: &str) -> String {
    unit.trim().to_lowercase()
}

/// Unit as written in notes.
fn display_unit(unit: &str) -> &str {
    match unit {
        "kwh" => "kWh",
        other => other,
    }
}

/// Convert with the built-in property tables.
pub fn convert(quantity: f64, input_unit: &str, target_unit: &str, source: &str) -> ConversionResult {
    convert_with(&BUILTIN_TABLES, quantity, input_unit, target_unit, source)
}

/// Convert `quantity` from `input_unit` to `target_unit`, identifying the fuel
/// from the free-text `source`.
pub fn convert_with(
    tables: &PropertyTables,
    quantity: f64,
    input_unit: &str,
    target_unit: &str,
    source: &str,
) -> ConversionResult {
    let input_unit = normalize_unit(input_unit);
    let target_unit = normalize_unit(target_unit);

    if input_unit == target_unit {
        return ConversionResult {
            normalized_quantity: quantity,
            normalized_unit: input_unit,
            note: String::new(),
            outcome: ConversionOutcome::Identity,
        };
    }

    let Some(rule) = rule_for(&input_unit, &target_unit) else {
        let note = format!(
            "Unit mismatch: input '{input_unit}' vs emission factor '{target_unit}'. No conversion rule applied."
        );
        return ConversionResult {
            normalized_quantity: quantity,
            normalized_unit: input_unit,
            note,
            outcome: ConversionOutcome::UnitMismatch,
        };
    };

    let property = rule.property();
    let from = display_unit(&input_unit);
    let to = display_unit(&target_unit);

    match tables.resolve(property, source) {
        Some((coefficient, fuel)) => {
            let converted = rule.apply(quantity, coefficient);
            let coefficient_text = match property {
                FuelProperty::Density => format!("{coefficient}"),
                FuelProperty::HeatingValue => format!("{coefficient} {}", property.unit()),
            };
            let note = format!(
                "Converted {quantity} {from} to {converted:.3} {to} using {property} {coefficient_text} for {fuel}."
            );
            ConversionResult {
                normalized_quantity: converted,
                normalized_unit: target_unit,
                note,
                outcome: ConversionOutcome::Converted {
                    property,
                    coefficient,
                    fuel: fuel.to_string(),
                },
            }
        }
        None => ConversionResult {
            normalized_quantity: quantity,
            note: format!("No {property} found for conversion from {from} to {to} for '{source}'."),
            normalized_unit: input_unit,
            outcome: ConversionOutcome::LookupFailure { property },
        },
    }
}
