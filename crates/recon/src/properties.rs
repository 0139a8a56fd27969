//! Fuel property tables and the substring resolver over them.
//!
//! Tables are ordered `(canonical name, coefficient)` slices. Lookup lowercases
//! and trims the description, then returns the first entry whose name occurs
//! anywhere in it. Declaration order is the tie-break, so reordering a table
//! changes results.
//!
//! There is no word-boundary check: "sub-bituminous coal" resolves to the
//! earlier `coal` entry, and short keys such as `lpg` can hit inside unrelated
//! words.

use serde::{Deserialize, Serialize};

/// Densities for common liquid fuels, kg/liter.
pub const DENSITY: &[(&str, f64)] = &[
    ("diesel fuel", 0.832),
    ("petrol", 0.74),
    ("kerosene", 0.81),
    ("jet fuel", 0.8),
    ("heating oil", 0.85),
    ("biodiesel", 0.88),
    ("ethanol", 0.789),
    ("aviation gasoline", 0.72),
    ("marine diesel", 0.86),
    ("heavy fuel oil", 0.96),
    ("waste oil", 0.92),
    ("shale oil", 0.85),
    ("naphtha", 0.7),
    ("methanol", 0.792),
    ("lpg", 0.54),
    ("propane", 0.493),
    ("butane", 0.573),
];

/// Heating values for common fuels, kWh/kg.
pub const HEATING_VALUE: &[(&str, f64)] = &[
    ("diesel fuel", 11.8),
    ("petrol", 12.0),
    ("kerosene", 11.8),
    ("jet fuel", 11.9),
    ("heating oil", 11.8),
    ("biodiesel", 9.2),
    ("ethanol", 7.5),
    ("aviation gasoline", 12.0),
    ("marine diesel", 11.8),
    ("heavy fuel oil", 11.6),
    ("waste oil", 11.0),
    ("shale oil", 9.5),
    ("naphtha", 11.3),
    ("methanol", 5.5),
    ("lpg", 13.8),
    ("natural gas", 13.1),
    ("propane", 13.8),
    ("butane", 13.7),
    ("wood", 4.2),
    ("charcoal", 7.5),
    ("coal", 7.0),
    ("anthracite", 8.0),
    ("lignite", 3.5),
    ("peat", 3.8),
    ("biomass", 4.0),
    ("municipal waste", 2.5),
    ("bagasse", 2.2),
    ("animal fat", 9.5),
    ("tallow", 9.5),
    ("refinery gas", 13.1),
    ("town gas", 5.0),
    ("sewage gas", 5.5),
    ("landfill gas", 5.0),
    ("black liquor", 2.5),
    ("sludge gas", 5.0),
    ("petroleum coke", 8.2),
    ("sub-bituminous coal", 6.0),
    ("brown coal", 3.5),
    ("oil shale", 7.0),
    ("syngas", 4.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelProperty {
    Density,
    HeatingValue,
}

impl FuelProperty {
    /// Unit the coefficient is expressed in.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Density => "kg/liter",
            Self::HeatingValue => "kWh/kg",
        }
    }
}

impl std::fmt::Display for FuelProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Density => write!(f, "density"),
            Self::HeatingValue => write!(f, "heating value"),
        }
    }
}

/// A site-specific table entry declared in config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FuelEntry {
    pub name: String,
    pub value: f64,
}

fn lookup<'a, K: AsRef<str>>(table: &'a [(K, f64)], text: &str) -> Option<(f64, &'a str)> {
    let key = text.trim().to_lowercase();
    table
        .iter()
        .find(|(fuel, _)| key.contains(fuel.as_ref()))
        .map(|(fuel, value)| (*value, fuel.as_ref()))
}

/// Density (kg/liter) and the canonical fuel it was resolved from.
pub fn resolve_density(text: &str) -> Option<(f64, &'static str)> {
    lookup(DENSITY, text)
}

/// Heating value (kWh/kg) and the canonical fuel it was resolved from.
pub fn resolve_heating_value(text: &str) -> Option<(f64, &'static str)> {
    lookup(HEATING_VALUE, text)
}

/// Both property tables, built-ins optionally preceded by config entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTables {
    density: Vec<(String, f64)>,
    heating_value: Vec<(String, f64)>,
}

impl Default for PropertyTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PropertyTables {
    pub fn builtin() -> Self {
        Self::with_extra(&[], &[])
    }

    /// Extra entries are placed ahead of the built-ins, so they win under
    /// first-match lookup. Names are lowercased and trimmed to match how
    /// descriptions are normalized.
    pub fn with_extra(density: &[FuelEntry], heating_value: &[FuelEntry]) -> Self {
        fn build(extra: &[FuelEntry], builtin: &[(&str, f64)]) -> Vec<(String, f64)> {
            extra
                .iter()
                .map(|e| (e.name.trim().to_lowercase(), e.value))
                .chain(builtin.iter().map(|(name, value)| (name.to_string(), *value)))
                .collect()
        }

        Self {
            density: build(density, DENSITY),
            heating_value: build(heating_value, HEATING_VALUE),
        }
    }

    pub fn entries(&self, property: FuelProperty) -> &[(String, f64)] {
        match property {
            FuelProperty::Density => &self.density,
            FuelProperty::HeatingValue => &self.heating_value,
        }
    }

    pub fn resolve(&self, property: FuelProperty, text: &str) -> Option<(f64, &str)> {
        lookup(self.entries(property), text)
    }
}
