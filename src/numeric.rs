//! Locale-tolerant numeric parsing and null-sentinel handling
//!
//! Every parser in the crate (LAS data lines, CSV tables, pasted perforation
//! tables) goes through [`parse_decimal`], so a value such as `1500,5` is read
//! the same way everywhere.

/// Canonical "no data" marker for well-log readings.
///
/// The loaders rewrite whatever `NULL` value a file declares to this value.
pub const NULL_VALUE: f64 = -999.25;

/// Absolute tolerance when comparing a reading against a null marker.
const NULL_TOLERANCE: f64 = 1e-6;

/// Parse a numeric cell, accepting a decimal comma in place of a decimal point.
///
/// Surrounding whitespace and quotes are ignored. Returns `None` for empty or
/// non-numeric text. Thousands separators are not supported: `1,500.5` is
/// rejected rather than guessed at.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_matches('"').trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(',') && trimmed.contains('.') {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// True when `value` is the canonical null sentinel or not a finite number.
pub fn is_null(value: f64) -> bool {
    !value.is_finite() || (value - NULL_VALUE).abs() < NULL_TOLERANCE
}

/// Rewrite a file-specific null marker to [`NULL_VALUE`].
///
/// NaN and infinities are normalized as well, so downstream code only ever
/// has to recognise one sentinel.
pub fn normalize_null(value: f64, declared_null: f64) -> f64 {
    if !value.is_finite() || (value - declared_null).abs() < NULL_TOLERANCE {
        NULL_VALUE
    } else {
        value
    }
}
