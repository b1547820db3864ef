//! Top-of-cement assessment

use serde::{Deserialize, Serialize};

use super::{DepthWindow, IntervalVerdict};

/// Calculated top of cement over the `[theoretical TOC, deepest sample]` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocAssessment {
    /// User-supplied theoretical TOC
    pub theoretical_toc: f64,
    /// Range the estimate was drawn from
    pub analysed_range: Option<DepthWindow>,
    /// Mean depth of the deepest qualifying bad readings
    pub calculated_toc: Option<f64>,
    /// Number of readings averaged into `calculated_toc`
    pub candidate_count: usize,
    /// Quality breakdown over the analysed range
    pub range_verdict: Option<IntervalVerdict>,
}
