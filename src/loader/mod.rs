//! Well-log loading and curve normalization
//!
//! Reads a LAS 2.0 file or a delimited depth table into a [`WellLog`] with the
//! canonical `DEPTH` / `CBL` / `CCL` schema. This is the only place that knows
//! about mnemonic variants and file-specific null markers:
//!
//! - aliases are resolved once through [`CurveAliases`]
//! - the declared null value is rewritten to [`NULL_VALUE`]
//! - rows without a depth are dropped, duplicated depths keep the first row
//!
//! A log without any CBL-equivalent curve is rejected.

mod csv;
mod las;
pub mod mnemonics;

pub use self::csv::read_csv;
pub use self::las::{parse_las, read_las};
pub use mnemonics::{ColumnMap, CurveAliases};

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::LoaderConfig;
use crate::numeric::{is_null, normalize_null, NULL_VALUE};
use crate::types::{Curve, CurveInfo, DepthSample, WellLog};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Malformed log at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Unsupported log format: {0}")]
    Unsupported(String),

    #[error("No {0} curve found (available: {1})")]
    MissingCurve(Curve, String),

    #[error("Log contains no depth samples")]
    Empty,
}

// ============================================================================
// Entry Point
// ============================================================================

/// Load a well log, choosing the reader from the file extension.
///
/// `.las` files go through the LAS reader; anything else is read as a
/// delimited table with a header row.
pub fn load_log(path: &Path, config: &LoaderConfig) -> Result<WellLog, LoadError> {
    let is_las = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("las"));

    let log = if is_las {
        read_las(path, config)?
    } else {
        read_csv(path, config)?
    };

    let (top, bottom) = log.depth_range().unwrap_or((0.0, 0.0));
    info!(
        well = %log.well_name,
        source = %log.source,
        samples = log.samples.len(),
        curves = log.curves.len(),
        ccl = log.has_curve(Curve::Ccl),
        "Loaded well log ({:.2}-{:.2})",
        top,
        bottom
    );
    Ok(log)
}

/// Decode raw file bytes: UTF-8 when valid, otherwise Windows-1252/Latin-1.
///
/// LAS files from older acquisition systems are frequently written in a
/// Windows code page; the byte-to-char fallback keeps accented well names legible.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
    Ok(decode_text(&bytes))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

// ============================================================================
// Table Assembly
// ============================================================================

/// A parsed table before canonical mapping.
pub(crate) struct RawTable {
    pub well_name: String,
    pub source: String,
    /// (mnemonic, unit, description) per column
    pub headers: Vec<(String, String, String)>,
    /// Row-major values, one `Vec` per depth step
    pub rows: Vec<Vec<f64>>,
    /// Null marker declared by the file
    pub declared_null: f64,
}

/// Map a raw table onto the canonical schema.
pub(crate) fn assemble(table: RawTable, config: &LoaderConfig) -> Result<WellLog, LoadError> {
    let aliases = CurveAliases::with_extras(&config.cbl_aliases, &config.ccl_aliases);
    let mnemonics: Vec<String> = table.headers.iter().map(|h| h.0.clone()).collect();
    let map = aliases.resolve(&mnemonics);

    let Some(cbl_col) = map.cbl else {
        return Err(LoadError::MissingCurve(Curve::Cbl, mnemonics.join(", ")));
    };
    if cbl_col == map.depth {
        return Err(LoadError::MissingCurve(Curve::Depth, mnemonics.join(", ")));
    }

    let curves: Vec<CurveInfo> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, (mnemonic, unit, description))| CurveInfo {
            mnemonic: mnemonic.clone(),
            unit: unit.clone(),
            description: description.clone(),
            canonical: canonical_for(idx, &map),
        })
        .collect();

    let mut samples = Vec::with_capacity(table.rows.len());
    let mut extra_curves: BTreeMap<String, Vec<f64>> = curves
        .iter()
        .filter(|c| c.canonical.is_none())
        .map(|c| (c.mnemonic.clone(), Vec::with_capacity(table.rows.len())))
        .collect();

    let mut seen_depths: HashSet<u64> = HashSet::with_capacity(table.rows.len());
    let mut null_depth_rows = 0usize;
    let mut duplicate_rows = 0usize;

    for row in &table.rows {
        let value = |idx: usize| {
            row.get(idx)
                .map_or(NULL_VALUE, |v| normalize_null(*v, table.declared_null))
        };

        let depth = value(map.depth);
        if is_null(depth) {
            null_depth_rows += 1;
            continue;
        }
        if !seen_depths.insert(depth.to_bits()) {
            duplicate_rows += 1;
            continue;
        }

        let ccl = map.ccl.map_or(NULL_VALUE, value);
        samples.push(DepthSample::new(depth, value(cbl_col), ccl));

        for (idx, curve) in curves.iter().enumerate() {
            if curve.canonical.is_none() {
                if let Some(column) = extra_curves.get_mut(&curve.mnemonic) {
                    column.push(value(idx));
                }
            }
        }
    }

    if null_depth_rows > 0 {
        warn!(rows = null_depth_rows, source = %table.source, "Dropped rows without a depth value");
    }
    if duplicate_rows > 0 {
        warn!(rows = duplicate_rows, source = %table.source, "Dropped rows with a repeated depth");
    }
    if samples.is_empty() {
        return Err(LoadError::Empty);
    }
    if map.ccl.is_none() {
        warn!(source = %table.source, "No CCL curve found; collar detection will be unavailable");
    }

    let well_name = if table.well_name.trim().is_empty() {
        file_stem(Path::new(&table.source))
    } else {
        table.well_name.trim().to_string()
    };

    Ok(WellLog {
        well_name,
        source: table.source,
        curves,
        samples,
        extra_curves,
    })
}

fn canonical_for(idx: usize, map: &ColumnMap) -> Option<Curve> {
    if idx == map.depth {
        Some(Curve::Depth)
    } else if Some(idx) == map.cbl {
        Some(Curve::Cbl)
    } else if Some(idx) == map.ccl {
        Some(Curve::Ccl)
    } else {
        None
    }
}
