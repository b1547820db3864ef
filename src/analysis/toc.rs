//! Top-of-cement estimation
//!
//! The calculated TOC is the mean depth of the deepest bad-cement readings
//! between the theoretical TOC and the bottom of the log. Readings at or below
//! the noise floor are ignored so a near-zero amplitude never counts as bad.

use super::aggregation::aggregate_window;
use super::classifier::classify_sample;
use crate::config::defaults::{TOC_CANDIDATE_COUNT, TOC_NOISE_FLOOR};
use crate::types::{depth_range, AnalysisWarning, DepthSample, DepthWindow, QualityLabel, TocAssessment};

/// Estimate the TOC with the default noise floor (10) and candidate count (10).
///
/// Returns `None` when no bad reading above the noise floor lies in
/// `[theoretical_toc, max depth]`.
pub fn estimate_toc(
    samples: &[DepthSample],
    theoretical_toc: f64,
    reference_amplitude: f64,
) -> Option<f64> {
    toc_candidates(
        samples,
        theoretical_toc,
        reference_amplitude,
        TOC_NOISE_FLOOR,
        TOC_CANDIDATE_COUNT,
    )
    .map(|(toc, _)| toc)
}

/// Mean depth of up to `candidate_count` deepest qualifying readings, with the
/// number of readings used.
fn toc_candidates(
    samples: &[DepthSample],
    theoretical_toc: f64,
    reference_amplitude: f64,
    noise_floor: f64,
    candidate_count: usize,
) -> Option<(f64, usize)> {
    let (_, max_depth) = depth_range(samples)?;

    let mut depths: Vec<f64> = samples
        .iter()
        .filter(|s| s.depth >= theoretical_toc && s.depth <= max_depth)
        .filter(|s| s.cbl > noise_floor)
        .filter(|s| classify_sample(s, reference_amplitude) == QualityLabel::Bad)
        .map(|s| s.depth)
        .collect();

    if depths.is_empty() || candidate_count == 0 {
        return None;
    }

    depths.sort_by(|a, b| b.total_cmp(a));
    depths.truncate(candidate_count);
    let n = depths.len();
    Some((depths.iter().sum::<f64>() / n as f64, n))
}

/// Full TOC assessment: estimate, analysed range, range quality breakdown and
/// the warnings the result raises.
pub fn assess_toc(
    samples: &[DepthSample],
    theoretical_toc: f64,
    reference_amplitude: f64,
    noise_floor: f64,
    candidate_count: usize,
) -> (TocAssessment, Vec<AnalysisWarning>) {
    let mut warnings = Vec::new();

    let analysed_range = depth_range(samples)
        .filter(|&(_, max_depth)| max_depth >= theoretical_toc)
        .map(|(_, max_depth)| DepthWindow {
            top: theoretical_toc,
            base: max_depth,
        });

    let estimate = toc_candidates(
        samples,
        theoretical_toc,
        reference_amplitude,
        noise_floor,
        candidate_count,
    );

    match estimate {
        None => warnings.push(AnalysisWarning::TocUndetermined {
            theoretical: theoretical_toc,
        }),
        Some((calculated, _)) if calculated < theoretical_toc => {
            warnings.push(AnalysisWarning::TocAboveTheoretical {
                theoretical: theoretical_toc,
                calculated,
            });
        }
        Some(_) => {}
    }

    let range_verdict = analysed_range
        .and_then(|window| aggregate_window(samples, window, reference_amplitude).ok());

    let assessment = TocAssessment {
        theoretical_toc,
        analysed_range,
        calculated_toc: estimate.map(|(toc, _)| toc),
        candidate_count: estimate.map_or(0, |(_, n)| n),
        range_verdict,
    };
    (assessment, warnings)
}
