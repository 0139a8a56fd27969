//! `fuelprint-recon`: match fuel consumption records to emission factors.
//!
//! Pure engine crate: receives pre-loaded records and a reference table,
//! returns one annotated result per record. CSV suppliers live in [`supply`];
//! writing results is left to the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod properties;
pub mod supply;
pub mod units;

pub use config::ReconConfig;
pub use engine::{compute, compute_with, run, CalcOptions};
pub use error::ReconError;
pub use matcher::{best_match, MatchOptions, MatchResult};
pub use model::{EmissionInput, EmissionReport, InputRecord, ReferenceEntry, ResultRecord};
pub use properties::{resolve_density, resolve_heating_value, PropertyTables};
pub use units::{convert, ConversionOutcome, ConversionResult};
