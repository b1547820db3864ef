//! Depth samples and the loaded well log

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::numeric::{is_null, NULL_VALUE};

/// Canonical curves consumed by the analysis core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Curve {
    Depth,
    Cbl,
    Ccl,
}

impl Curve {
    /// Canonical mnemonic used in reports and CSV headers.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Depth => "DEPTH",
            Self::Cbl => "CBL",
            Self::Ccl => "CCL",
        }
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One depth-indexed reading of the canonical curves.
///
/// Missing readings hold [`NULL_VALUE`]. A log without a CCL curve carries the
/// null marker in every `ccl` field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthSample {
    /// Measured depth (log units, usually metres)
    pub depth: f64,
    /// Cement bond log amplitude (mV)
    pub cbl: f64,
    /// Casing collar locator reading
    pub ccl: f64,
}

impl DepthSample {
    pub fn new(depth: f64, cbl: f64, ccl: f64) -> Self {
        Self { depth, cbl, ccl }
    }

    /// Sample with a CBL reading only.
    pub fn cbl_only(depth: f64, cbl: f64) -> Self {
        Self::new(depth, cbl, NULL_VALUE)
    }

    pub fn has_cbl(&self) -> bool {
        !is_null(self.cbl)
    }

    pub fn has_ccl(&self) -> bool {
        !is_null(self.ccl)
    }
}

/// Curve header information as declared by the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveInfo {
    /// Mnemonic as written in the file
    pub mnemonic: String,
    /// Unit string (may be empty)
    pub unit: String,
    /// Free-text description
    pub description: String,
    /// Canonical curve this column was mapped onto, if any
    pub canonical: Option<Curve>,
}

/// A loaded well log: canonical samples plus the untouched extra curves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellLog {
    /// Well name from the file header (or the file stem)
    pub well_name: String,
    /// Source path or description
    pub source: String,
    /// Declared curves in file order
    pub curves: Vec<CurveInfo>,
    /// Canonical samples in file order
    pub samples: Vec<DepthSample>,
    /// Non-canonical curves keyed by mnemonic, aligned with `samples`
    pub extra_curves: BTreeMap<String, Vec<f64>>,
}

impl WellLog {
    /// Whether a canonical curve was mapped at load time.
    pub fn has_curve(&self, curve: Curve) -> bool {
        self.curves.iter().any(|c| c.canonical == Some(curve))
    }

    /// Shallowest and deepest sample depth, or `None` for an empty log.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        depth_range(&self.samples)
    }
}

/// Shallowest and deepest depth in a sample slice, independent of ordering.
pub fn depth_range(samples: &[DepthSample]) -> Option<(f64, f64)> {
    samples.iter().fold(None, |acc, s| match acc {
        None => Some((s.depth, s.depth)),
        Some((lo, hi)) => Some((lo.min(s.depth), hi.max(s.depth))),
    })
}

/// Copy of `samples` sorted by ascending depth.
pub fn sorted_by_depth(samples: &[DepthSample]) -> Vec<DepthSample> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    sorted
}
