//! Pipe cut proposal
//!
//! For each valid collar, the CBL readings in the lookback window just above
//! it are categorised by amplitude relative to the loudest reading in the log.
//! A collar whose window shows more free pipe than stuck pipe can be cut; the
//! deepest such collar is chosen and the cut placed a safety offset above it.

use statrs::statistics::Statistics;
use tracing::debug;

use crate::config::defaults::{
    COLLAR_RESPONSE_PERCENT, CUT_SAFETY_OFFSET, FREE_PIPE_PERCENT, STUCK_PIPE_PERCENT,
};
use crate::types::{Collar, CutCandidate, CutEvaluation, DepthSample, PipeResponse, ProposedCut};

/// Categorise a CBL reading as a percentage of the maximum observed CBL.
pub fn categorize(cbl: f64, max_cbl: f64) -> PipeResponse {
    let pct = cbl / max_cbl * 100.0;
    if pct >= FREE_PIPE_PERCENT {
        PipeResponse::Free
    } else if pct >= STUCK_PIPE_PERCENT {
        PipeResponse::Stuck
    } else if pct >= COLLAR_RESPONSE_PERCENT {
        PipeResponse::Collar
    } else {
        PipeResponse::Body
    }
}

/// Evaluate the lookback window `(depth − lookback, depth]` of every valid
/// collar, deepest first, and select the deepest qualifying one.
///
/// Only samples between the shallowest and deepest collar (valid or not)
/// take part: the maximum CBL and every window come from that cased section,
/// so free pipe above it does not skew the categories. Invalid collars are
/// never candidates. Samples without a CBL reading are ignored.
pub fn evaluate_cuts(
    samples: &[DepthSample],
    collars: &[Collar],
    lookback: f64,
    safety_offset: f64,
) -> CutEvaluation {
    let Some((top, base)) = collar_span(collars) else {
        return CutEvaluation::default();
    };
    let cbl: Vec<&DepthSample> = samples
        .iter()
        .filter(|s| s.has_cbl() && s.depth >= top && s.depth <= base)
        .collect();
    let max_cbl = if cbl.is_empty() {
        0.0
    } else {
        Statistics::max(cbl.iter().map(|s| s.cbl))
    };
    if !cbl.is_empty() && max_cbl <= 0.0 {
        return CutEvaluation::default();
    }

    let mut valid: Vec<&Collar> = collars.iter().filter(|c| c.is_valid()).collect();
    valid.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let candidates: Vec<CutCandidate> = valid
        .into_iter()
        .map(|collar| {
            let range_top = collar.depth - lookback;
            let window: Vec<PipeResponse> = cbl
                .iter()
                .filter(|s| s.depth > range_top && s.depth <= collar.depth)
                .map(|s| categorize(s.cbl, max_cbl))
                .collect();

            let n = window.len();
            let share = |response: PipeResponse| {
                if n == 0 {
                    0.0
                } else {
                    window.iter().filter(|&&r| r == response).count() as f64 * 100.0 / n as f64
                }
            };
            let free_percentage = share(PipeResponse::Free);
            let stuck_percentage = share(PipeResponse::Stuck);

            CutCandidate {
                collar_label: collar.label.clone(),
                collar_depth: collar.depth,
                range_top,
                range_base: collar.depth,
                sample_count: n,
                free_percentage,
                stuck_percentage,
                qualifies: n > 0 && free_percentage > stuck_percentage,
            }
        })
        .collect();

    let proposal = candidates.iter().find(|c| c.qualifies).map(|c| ProposedCut {
        collar_label: c.collar_label.clone(),
        collar_depth: c.collar_depth,
        cut_depth: c.collar_depth - safety_offset,
    });

    debug!(
        candidates = candidates.len(),
        qualifying = candidates.iter().filter(|c| c.qualifies).count(),
        max_cbl,
        section_top = top,
        section_base = base,
        "Cut evaluation complete"
    );

    CutEvaluation {
        candidates,
        proposal,
    }
}

/// Shallowest and deepest collar depth.
fn collar_span(collars: &[Collar]) -> Option<(f64, f64)> {
    collars.iter().fold(None, |acc, c| match acc {
        None => Some((c.depth, c.depth)),
        Some((lo, hi)) => Some((lo.min(c.depth), hi.max(c.depth))),
    })
}

/// Proposed cut depth with the default safety offset (1.5), or `None` when no
/// valid collar qualifies.
pub fn propose_cut(samples: &[DepthSample], collars: &[Collar], lookback: f64) -> Option<f64> {
    evaluate_cuts(samples, collars, lookback, CUT_SAFETY_OFFSET)
        .proposal
        .map(|p| p.cut_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CollarValidity;

    fn collar(label: &str, depth: f64, validity: CollarValidity) -> Collar {
        Collar {
            label: label.to_string(),
            depth,
            ccl: 1.0,
            validity,
        }
    }

    fn cbl(depth: f64, value: f64) -> DepthSample {
        DepthSample::cbl_only(depth, value)
    }

    #[test]
    fn test_categorize_bands() {
        assert_eq!(categorize(95.0, 100.0), PipeResponse::Free);
        assert_eq!(categorize(90.0, 100.0), PipeResponse::Free);
        assert_eq!(categorize(60.0, 100.0), PipeResponse::Stuck);
        assert_eq!(categorize(25.0, 100.0), PipeResponse::Collar);
        assert_eq!(categorize(24.9, 100.0), PipeResponse::Body);
    }

    #[test]
    fn test_deepest_qualifying_collar_is_cut() {
        let samples = vec![
            // above the cased section, ignored
            cbl(97.0, 150.0),
            cbl(100.0, 10.0),
            // window of C.2 (106, 110]: free pipe
            cbl(107.0, 92.0),
            cbl(109.0, 91.0),
            // window of C.3 (116, 120]: stuck
            cbl(117.0, 70.0),
            cbl(119.0, 65.0),
        ];
        let collars = vec![
            collar("C.1", 100.0, CollarValidity::Valid),
            collar("C.2", 110.0, CollarValidity::Valid),
            collar("C.3", 120.0, CollarValidity::Valid),
        ];
        let eval = evaluate_cuts(&samples, &collars, 4.0, 1.5);
        let order: Vec<&str> = eval.candidates.iter().map(|c| c.collar_label.as_str()).collect();
        assert_eq!(order, vec!["C.3", "C.2", "C.1"]);
        assert!(!eval.candidates[0].qualifies);
        let proposal = eval.proposal.expect("C.2 qualifies");
        assert_eq!(proposal.collar_label, "C.2");
        assert!((proposal.cut_depth - 108.5).abs() < 1e-9);
        assert_eq!(propose_cut(&samples, &collars, 4.0), Some(108.5));
    }

    #[test]
    fn test_invalid_collars_are_skipped() {
        let samples = vec![cbl(100.0, 100.0), cbl(109.0, 100.0)];
        let collars = vec![
            collar("C.1", 100.0, CollarValidity::Valid),
            collar("C.2", 110.0, CollarValidity::Invalid),
        ];
        assert_eq!(propose_cut(&samples, &collars, 4.0), Some(98.5));
    }

    #[test]
    fn test_window_excludes_its_upper_end() {
        // The reading at 96.0 belongs to C.1 only
        let samples = vec![cbl(96.0, 100.0), cbl(98.0, 10.0), cbl(100.0, 10.0)];
        let collars = vec![
            collar("C.1", 96.0, CollarValidity::Valid),
            collar("C.2", 100.0, CollarValidity::Valid),
        ];
        let eval = evaluate_cuts(&samples, &collars, 4.0, 1.5);
        assert_eq!(eval.candidates[0].collar_label, "C.2");
        assert_eq!(eval.candidates[0].sample_count, 2);
        assert!(!eval.candidates[0].qualifies);
        assert_eq!(eval.proposal.map(|p| p.collar_label), Some("C.1".to_string()));
    }

    #[test]
    fn test_no_proposal_without_collars_or_signal() {
        let samples = vec![cbl(99.0, 100.0)];
        assert_eq!(propose_cut(&samples, &[], 4.0), None);

        let flat = vec![cbl(100.0, 0.0)];
        let collars = vec![collar("C.1", 100.0, CollarValidity::Valid)];
        assert_eq!(evaluate_cuts(&flat, &collars, 4.0, 1.5), CutEvaluation::default());
    }

    #[test]
    fn test_empty_window_does_not_qualify() {
        let samples = vec![cbl(50.0, 100.0)];
        let collars = vec![collar("C.1", 100.0, CollarValidity::Valid)];
        let eval = evaluate_cuts(&samples, &collars, 4.0, 1.5);
        assert_eq!(eval.candidates[0].sample_count, 0);
        assert!(!eval.candidates[0].qualifies);
    }

    #[test]
    fn test_free_pipe_above_collars_does_not_scale_categories() {
        let mut samples = vec![cbl(50.0, 100.0), cbl(100.0, 20.0)];
        samples.extend([106.0, 107.0, 108.0, 109.0].map(|d| cbl(d, 58.0)));
        let collars = vec![
            collar("C.1", 100.0, CollarValidity::Valid),
            collar("C.2", 109.6, CollarValidity::Valid),
        ];
        let eval = evaluate_cuts(&samples, &collars, 4.0, 1.5);
        assert!((eval.candidates[0].free_percentage - 100.0).abs() < 1e-9);
        let cut = propose_cut(&samples, &collars, 4.0).expect("C.2 qualifies");
        assert!((cut - 108.1).abs() < 1e-9, "cut = {cut}");
    }
}
