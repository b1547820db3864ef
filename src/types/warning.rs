//! Non-fatal analysis findings

use serde::{Deserialize, Serialize};

use super::PerforationInterval;

/// Inconsistencies and empty results that are reported, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// The calculated TOC is shallower than the theoretical TOC
    TocAboveTheoretical { theoretical: f64, calculated: f64 },
    /// No bad reading above the noise floor below the theoretical TOC
    TocUndetermined { theoretical: f64 },
    /// A perforation window contained no samples
    EmptyInterval { interval: PerforationInterval, margin: f64 },
    /// The log has no usable CCL readings
    NoCclData,
    /// No collar reading exceeded the upper threshold
    NoCollarsDetected { upper_threshold: f64 },
    /// No collar window showed more free pipe than stuck pipe
    NoQualifyingCut,
    /// Sentinel readings were found in a canonical curve
    SentinelReadings { count: usize },
}

impl std::fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TocAboveTheoretical { theoretical, calculated } => write!(
                f,
                "calculated TOC {calculated:.2} is shallower than theoretical TOC {theoretical:.2}; check the inputs"
            ),
            Self::TocUndetermined { theoretical } => write!(
                f,
                "no bad-cement readings above the noise floor below {theoretical:.2}; TOC not determined"
            ),
            Self::EmptyInterval { interval, margin } => write!(
                f,
                "no samples in {:.2}-{:.2} (margin {margin:.2})",
                interval.top, interval.base
            ),
            Self::NoCclData => write!(f, "log has no usable CCL readings"),
            Self::NoCollarsDetected { upper_threshold } => {
                write!(f, "no CCL reading above {upper_threshold:.3}; no collars detected")
            }
            Self::NoQualifyingCut => write!(f, "no collar window qualifies for a cut"),
            Self::SentinelReadings { count } => write!(f, "{count} sentinel reading(s) found"),
        }
    }
}
