//! CLI exit codes.
//!
//! Scripts branch on these, so treat them as a stable contract.
//!
//! | Code | Constant                    | Raised by                                 |
//! |------|-----------------------------|-------------------------------------------|
//! | 0    | `EXIT_SUCCESS`              | any command that completed                |
//! | 1    | `EXIT_ERROR`                | unclassified failure                      |
//! | 2    | `EXIT_USAGE`                | bad arguments (clap also exits with 2)    |
//! | 60   | `EXIT_RECON_INVALID_CONFIG` | `run`, `validate`: config parse/validate  |
//! | 61   | `EXIT_RECON_RUNTIME`        | `run`, `match`: IO, CSV, missing columns  |
//! | 62   | `EXIT_RECON_INCOMPLETE`     | `run --strict`: a row has no total        |
//! | 63   | `EXIT_CONVERT_NO_RULE`      | `convert`: lookup failure or mismatch     |
//!
//! New codes go in the 60-69 block and into the table above.

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Unclassified failure. Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Bad arguments or an unsupported option value.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Emission runs (60-69)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 60;

/// Config was valid but the run could not complete: unreadable files,
/// missing CSV columns, an empty reference table, or a failed write.
pub const EXIT_RECON_RUNTIME: u8 = 61;

/// Run completed but at least one row has no total (`--strict` only).
pub const EXIT_RECON_INCOMPLETE: u8 = 62;

/// `convert` could not apply a rule: no property entry for the fuel, or no
/// rule for the unit pair. The unconverted quantity is still printed.
pub const EXIT_CONVERT_NO_RULE: u8 = 63;
