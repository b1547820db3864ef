//! Casing collar and cut-proposal types

use serde::{Deserialize, Serialize};

use super::Curve;

/// Spacing validity of a detected collar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollarValidity {
    /// First collar of a chain, or spaced within tolerance of the previous one
    Valid,
    /// Spacing to the previous collar outside `[spacing - tol, spacing + tol]`
    Invalid,
}

/// A de-duplicated collar hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collar {
    /// Sequential label `C.1`, `C.2`, ... in ascending depth
    pub label: String,
    pub depth: f64,
    /// CCL reading that triggered the detection
    pub ccl: f64,
    pub validity: CollarValidity,
}

impl Collar {
    pub fn is_valid(&self) -> bool {
        self.validity == CollarValidity::Valid
    }
}

/// A sensor no-data marker found in one of the canonical curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentinelAnomaly {
    pub depth: f64,
    pub curve: Curve,
}

/// Adaptive CCL thresholds derived from the whole curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollarThresholds {
    /// `gain × (max − mean)`; readings above it are collar candidates
    pub upper: f64,
    /// `gain × (min − mean)`; reported for display only
    pub lower: f64,
    pub gain_fraction: f64,
}

/// Result of a collar scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollarScan {
    /// Retained collars in ascending depth, valid and invalid
    pub collars: Vec<Collar>,
    /// Sentinel readings, independent of collar validity
    pub anomalies: Vec<SentinelAnomaly>,
}

impl CollarScan {
    pub fn valid_collars(&self) -> impl Iterator<Item = &Collar> {
        self.collars.iter().filter(|c| c.is_valid())
    }
}

/// Pipe response category used only for cut proposals, by CBL as a
/// percentage of the maximum observed CBL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipeResponse {
    /// >= 90 %
    #[serde(rename = "LIBRE")]
    Free,
    /// [60, 90) %
    #[serde(rename = "AGARRE")]
    Stuck,
    /// [25, 60) %
    #[serde(rename = "CUPLA")]
    Collar,
    /// < 25 %
    #[serde(rename = "CUERPO")]
    Body,
}

/// One evaluated collar window for a cut decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutCandidate {
    pub collar_label: String,
    pub collar_depth: f64,
    /// Exclusive upper end of the lookback window
    pub range_top: f64,
    /// Inclusive lower end (the collar depth)
    pub range_base: f64,
    pub sample_count: usize,
    pub free_percentage: f64,
    pub stuck_percentage: f64,
    /// `free_percentage > stuck_percentage`
    pub qualifies: bool,
}

/// The recommended cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedCut {
    pub collar_label: String,
    pub collar_depth: f64,
    pub cut_depth: f64,
}

/// All candidate windows plus the selected cut, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutEvaluation {
    /// Candidates in deepest-first order
    pub candidates: Vec<CutCandidate>,
    pub proposal: Option<ProposedCut>,
}
