use serde::Deserialize;

use crate::error::ReconError;
use crate::matcher::MatchOptions;
use crate::properties::{FuelEntry, PropertyTables};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub reference: ReferenceTableConfig,
    pub input: InputTableConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub fuels: FuelsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceTableConfig {
    pub file: String,
    #[serde(default)]
    pub columns: ReferenceColumns,
}

/// Column names in the reference CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    pub name: String,
    pub emission_factor: String,
    pub unit: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            name: "product".into(),
            emission_factor: "emission_factor".into(),
            unit: "unit".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputTableConfig {
    pub file: String,
    #[serde(default)]
    pub columns: InputColumns,
}

/// Column names in the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputColumns {
    pub source: String,
    pub quantity: String,
    pub unit: String,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            source: "source".into(),
            quantity: "quantity".into(),
            unit: "unit".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching + fuels + output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub normalize: bool,
    /// Scores below this get a low-confidence note. Rows are never dropped.
    #[serde(default)]
    pub low_score_threshold: Option<f64>,
}

impl MatchingConfig {
    pub fn options(&self) -> MatchOptions {
        MatchOptions {
            normalize: self.normalize,
        }
    }
}

/// Site-specific property entries, consulted before the built-in tables.
/// Arrays of tables keep declaration order, which lookup depends on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuelsConfig {
    #[serde(default)]
    pub density: Vec<FuelEntry>,
    #[serde(default)]
    pub heating_value: Vec<FuelEntry>,
}

impl FuelsConfig {
    pub fn tables(&self) -> PropertyTables {
        PropertyTables::with_extra(&self.density, &self.heating_value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub xlsx: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.reference.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("reference.file must not be empty".into()));
        }
        if self.input.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("input.file must not be empty".into()));
        }

        if let Some(t) = self.matching.low_score_threshold {
            if !(0.0..=100.0).contains(&t) {
                return Err(ReconError::ConfigValidation(format!(
                    "matching.low_score_threshold must be within 0..=100, got {t}"
                )));
            }
        }

        for (table, entries) in [
            ("density", &self.fuels.density),
            ("heating_value", &self.fuels.heating_value),
        ] {
            for entry in entries {
                if entry.name.trim().is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "fuels.{table}: entry name must not be empty"
                    )));
                }
                if !entry.value.is_finite() || entry.value <= 0.0 {
                    return Err(ReconError::ConfigValidation(format!(
                        "fuels.{table}: '{}' must have a positive value, got {}",
                        entry.name, entry.value
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
