//! Cement quality and collar analysis
//!
//! Pure functions over an immutable `&[DepthSample]` snapshot. Every call
//! recomputes from scratch with the parameters it is given; nothing is cached
//! between invocations.
//!
//! ## Paths
//!
//! - **CBL**: [`classifier`] → [`toc`] and [`aggregation`] (per perforation)
//! - **CCL**: [`collars`] → [`cut`]
//!
//! Inconsistent inputs (a calculated TOC above the theoretical one, an empty
//! perforation window) are reported as [`AnalysisWarning`]s and logged; only
//! invalid parameters abort an analysis.

pub mod aggregation;
pub mod classifier;
pub mod collars;
pub mod cut;
pub mod toc;

pub use aggregation::{aggregate, aggregate_all, aggregate_window};
pub use classifier::{classify, classify_sample, quality_column};
pub use collars::{collar_thresholds, detect_collars, find_sentinels};
pub use cut::{categorize, evaluate_cuts, propose_cut};
pub use toc::{assess_toc, estimate_toc};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::types::{
    AnalysisWarning, CollarScan, CollarThresholds, Curve, CutEvaluation, DepthSample,
    IntervalVerdict, PerforationInterval, TocAssessment, WellLog,
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("No samples in window {top:.2}-{base:.2}")]
    EmptyWindow { top: f64, base: f64 },

    #[error("Invalid analysis parameter: {0}")]
    InvalidParameter(String),
}

// ============================================================================
// Parameters
// ============================================================================

/// Flat parameter set for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Free-pipe reference amplitude `R` (mV)
    pub reference_amplitude: f64,
    pub theoretical_toc: f64,
    /// Padding applied to both ends of each perforation interval
    pub margin: f64,
    pub toc_noise_floor: f64,
    pub toc_candidate_count: usize,
    pub gain_fraction: f64,
    pub collar_spacing: f64,
    pub collar_tolerance: f64,
    pub cut_lookback: f64,
    pub cut_safety_offset: f64,
}

impl AnalysisParams {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            reference_amplitude: config.cement.free_pipe_amplitude,
            theoretical_toc: config.cement.theoretical_toc,
            margin: config.cement.margin,
            toc_noise_floor: config.cement.toc_noise_floor,
            toc_candidate_count: config.cement.toc_candidate_count,
            gain_fraction: config.collars.gain_fraction,
            collar_spacing: config.collars.spacing,
            collar_tolerance: config.collars.tolerance,
            cut_lookback: config.cut.lookback,
            cut_safety_offset: config.cut.safety_offset,
        }
    }

    /// Reject parameters the analysis cannot run with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: String| Err(AnalysisError::InvalidParameter(msg));

        if !(self.reference_amplitude.is_finite() && self.reference_amplitude > 0.0) {
            return invalid(format!(
                "reference amplitude must be positive, got {}",
                self.reference_amplitude
            ));
        }
        if !self.theoretical_toc.is_finite() {
            return invalid("theoretical TOC must be finite".to_string());
        }
        if !(self.margin.is_finite() && self.margin > 0.0) {
            return invalid(format!("margin must be positive, got {}", self.margin));
        }
        if !(0.0..=1.0).contains(&self.gain_fraction) {
            return invalid(format!(
                "gain fraction must be within [0, 1], got {}",
                self.gain_fraction
            ));
        }
        if !(self.cut_lookback.is_finite() && self.cut_lookback > 0.0) {
            return invalid(format!("lookback must be positive, got {}", self.cut_lookback));
        }
        if !self.cut_safety_offset.is_finite() {
            return invalid("cut safety offset must be finite".to_string());
        }
        if !self.toc_noise_floor.is_finite() {
            return invalid("TOC noise floor must be finite".to_string());
        }
        if self.toc_candidate_count == 0 {
            return invalid("TOC candidate count must be > 0".to_string());
        }
        if !(self.collar_spacing.is_finite() && self.collar_spacing > 0.0) {
            return invalid(format!(
                "collar spacing must be positive, got {}",
                self.collar_spacing
            ));
        }
        if !(self.collar_tolerance.is_finite()
            && self.collar_tolerance >= 0.0
            && self.collar_tolerance < self.collar_spacing)
        {
            return invalid(format!(
                "collar tolerance must lie in [0, spacing), got {}",
                self.collar_tolerance
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

// ============================================================================
// Results
// ============================================================================

/// CBL-path results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CementAnalysis {
    pub toc: TocAssessment,
    /// Verdicts for the perforations with at least one sample in their window
    pub intervals: Vec<IntervalVerdict>,
    pub warnings: Vec<AnalysisWarning>,
}

/// CCL-path results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollarAnalysis {
    /// `None` when the log has no usable CCL reading
    pub thresholds: Option<CollarThresholds>,
    pub scan: CollarScan,
    pub cuts: CutEvaluation,
    pub warnings: Vec<AnalysisWarning>,
}

/// Both analysis paths over one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub cement: CementAnalysis,
    pub collars: CollarAnalysis,
}

impl AnalysisOutcome {
    /// All warnings from both paths, cement first.
    pub fn warnings(&self) -> impl Iterator<Item = &AnalysisWarning> {
        self.cement.warnings.iter().chain(self.collars.warnings.iter())
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run the CBL path: TOC assessment plus one verdict per perforation.
pub fn analyze_cement(
    samples: &[DepthSample],
    perforations: &[PerforationInterval],
    params: &AnalysisParams,
) -> Result<CementAnalysis, AnalysisError> {
    params.validate()?;

    let (toc, mut warnings) = assess_toc(
        samples,
        params.theoretical_toc,
        params.reference_amplitude,
        params.toc_noise_floor,
        params.toc_candidate_count,
    );

    let mut intervals = Vec::with_capacity(perforations.len());
    for (interval, result) in perforations.iter().zip(aggregate_all(
        samples,
        perforations,
        params.margin,
        params.reference_amplitude,
    )) {
        match result {
            Ok(verdict) => intervals.push(verdict),
            Err(AnalysisError::EmptyWindow { .. }) => {
                warnings.push(AnalysisWarning::EmptyInterval {
                    interval: *interval,
                    margin: params.margin,
                });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        toc = ?toc.calculated_toc,
        theoretical_toc = params.theoretical_toc,
        intervals = intervals.len(),
        "Cement analysis complete"
    );
    log_warnings(&warnings);

    Ok(CementAnalysis {
        toc,
        intervals,
        warnings,
    })
}

/// Run the CCL path: thresholds, collar scan and cut evaluation.
pub fn analyze_collars(log: &WellLog, params: &AnalysisParams) -> Result<CollarAnalysis, AnalysisError> {
    params.validate()?;

    let mut warnings = Vec::new();
    let has_ccl_curve = log.has_curve(Curve::Ccl);
    let thresholds = if has_ccl_curve {
        collar_thresholds(&log.samples, params.gain_fraction)
    } else {
        None
    };

    let scan = match thresholds {
        Some(t) => detect_collars(
            &log.samples,
            t.upper,
            params.collar_spacing,
            params.collar_tolerance,
        ),
        None => {
            warnings.push(AnalysisWarning::NoCclData);
            CollarScan {
                collars: Vec::new(),
                // A log without a CCL curve would flag every depth
                anomalies: find_sentinels(&log.samples)
                    .into_iter()
                    .filter(|a| has_ccl_curve || a.curve != Curve::Ccl)
                    .collect(),
            }
        }
    };

    if let Some(t) = thresholds {
        if scan.collars.is_empty() {
            warnings.push(AnalysisWarning::NoCollarsDetected {
                upper_threshold: t.upper,
            });
        }
    }
    if !scan.anomalies.is_empty() {
        warnings.push(AnalysisWarning::SentinelReadings {
            count: scan.anomalies.len(),
        });
    }

    let cuts = evaluate_cuts(
        &log.samples,
        &scan.collars,
        params.cut_lookback,
        params.cut_safety_offset,
    );
    if scan.valid_collars().next().is_some() && cuts.proposal.is_none() {
        warnings.push(AnalysisWarning::NoQualifyingCut);
    }

    info!(
        collars = scan.collars.len(),
        valid = scan.valid_collars().count(),
        anomalies = scan.anomalies.len(),
        cut = ?cuts.proposal.as_ref().map(|p| p.cut_depth),
        "Collar analysis complete"
    );
    log_warnings(&warnings);

    Ok(CollarAnalysis {
        thresholds,
        scan,
        cuts,
        warnings,
    })
}

/// Run both paths over a loaded log.
pub fn run(
    log: &WellLog,
    perforations: &[PerforationInterval],
    params: &AnalysisParams,
) -> Result<AnalysisOutcome, AnalysisError> {
    Ok(AnalysisOutcome {
        cement: analyze_cement(&log.samples, perforations, params)?,
        collars: analyze_collars(log, params)?,
    })
}

fn log_warnings(warnings: &[AnalysisWarning]) {
    for w in warnings {
        warn!("{}", w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NULL_VALUE;
    use crate::types::CurveInfo;
    use std::collections::BTreeMap;

    fn log_with(samples: Vec<DepthSample>, with_ccl: bool) -> WellLog {
        let mut curves = vec![
            CurveInfo {
                mnemonic: "DEPT".to_string(),
                unit: "M".to_string(),
                description: String::new(),
                canonical: Some(Curve::Depth),
            },
            CurveInfo {
                mnemonic: "CBL".to_string(),
                unit: "MV".to_string(),
                description: String::new(),
                canonical: Some(Curve::Cbl),
            },
        ];
        if with_ccl {
            curves.push(CurveInfo {
                mnemonic: "CCL".to_string(),
                unit: String::new(),
                description: String::new(),
                canonical: Some(Curve::Ccl),
            });
        }
        WellLog {
            well_name: "T-1".to_string(),
            source: "memory".to_string(),
            curves,
            samples,
            extra_curves: BTreeMap::new(),
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(AnalysisParams::default().validate().is_ok());

        let mut p = AnalysisParams::default();
        p.reference_amplitude = 0.0;
        assert!(matches!(p.validate(), Err(AnalysisError::InvalidParameter(_))));

        let mut p = AnalysisParams::default();
        p.gain_fraction = 1.5;
        assert!(p.validate().is_err());

        let mut p = AnalysisParams::default();
        p.margin = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_collar_and_toc_params_validated() {
        let mut p = AnalysisParams::default();
        p.collar_tolerance = f64::NAN;
        assert!(matches!(p.validate(), Err(AnalysisError::InvalidParameter(_))));

        let mut p = AnalysisParams::default();
        p.collar_tolerance = p.collar_spacing;
        assert!(p.validate().is_err());

        let mut p = AnalysisParams::default();
        p.collar_spacing = 0.0;
        assert!(p.validate().is_err());

        let mut p = AnalysisParams::default();
        p.toc_candidate_count = 0;
        assert!(p.validate().is_err());

        let log = log_with(vec![DepthSample::new(100.0, 10.0, 1.0)], true);
        let mut p = AnalysisParams::default();
        p.collar_tolerance = f64::NAN;
        assert!(analyze_collars(&log, &p).is_err());
    }

    #[test]
    fn test_empty_perforation_window_becomes_warning() {
        let samples = vec![DepthSample::cbl_only(1500.0, 60.0)];
        let perfs = vec![
            PerforationInterval::new(1498.0, 1502.0).expect("valid"),
            PerforationInterval::new(2000.0, 2010.0).expect("valid"),
        ];
        let mut params = AnalysisParams::default();
        params.theoretical_toc = 1400.0;
        let cement = analyze_cement(&samples, &perfs, &params).expect("valid params");
        assert_eq!(cement.intervals.len(), 1);
        assert!(cement
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::EmptyInterval { interval, .. } if interval.top == 2000.0)));
    }

    #[test]
    fn test_log_without_ccl_reports_no_ccl_data() {
        let samples = vec![
            DepthSample::cbl_only(100.0, 10.0),
            DepthSample::cbl_only(101.0, NULL_VALUE),
        ];
        let result = analyze_collars(&log_with(samples, false), &AnalysisParams::default())
            .expect("valid params");
        assert!(result.thresholds.is_none());
        assert!(result.scan.collars.is_empty());
        assert_eq!(result.scan.anomalies.len(), 1);
        assert_eq!(result.scan.anomalies[0].curve, Curve::Cbl);
        assert!(result.warnings.contains(&AnalysisWarning::NoCclData));
        assert!(result.cuts.proposal.is_none());
    }

    #[test]
    fn test_collar_path_end_to_end() {
        // Flat CCL with spikes at 100.0 and 109.6; free pipe above 109.6
        let mut samples: Vec<DepthSample> = (0..240)
            .map(|i| {
                let depth = 90.0 + f64::from(i) * 0.1;
                DepthSample::new(depth, 20.0, 0.0)
            })
            .collect();
        for s in &mut samples {
            if (s.depth - 100.0).abs() < 1e-6 || (s.depth - 109.6).abs() < 1e-6 {
                s.ccl = 10.0;
            }
            if s.depth > 105.6 && s.depth <= 109.6 + 1e-9 {
                s.cbl = 72.0;
            }
        }
        let result = analyze_collars(&log_with(samples, true), &AnalysisParams::default())
            .expect("valid params");
        assert_eq!(result.scan.collars.len(), 2);
        assert!(result.scan.collars.iter().all(|c| c.is_valid()));
        let proposal = result.cuts.proposal.expect("deepest collar qualifies");
        assert_eq!(proposal.collar_label, "C.2");
        assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
    }
}
