//! Casing collar detection from CCL spikes
//!
//! ## Algorithm
//!
//! 1. Thresholds from the whole curve: `upper = gain × (max − mean)`
//! 2. Samples sorted by ascending depth; every reading above `upper` is a candidate
//! 3. A candidate within `tolerance` of the previous candidate is the same
//!    collar seen twice and is dropped (the shallower one is kept)
//! 4. Spacing check: the first collar is valid; each later collar is valid
//!    when its distance from the previous collar lies in
//!    `[spacing − tolerance, spacing + tolerance]`. Out-of-spacing collars are
//!    kept, flagged invalid, and become the reference for the next one.
//! 5. Labels `C.1`, `C.2`, ... in ascending depth
//!
//! Sentinel readings in either canonical curve are reported separately as
//! anomalies; they never become collars.

use statrs::statistics::Statistics;
use tracing::debug;

use crate::types::{
    sorted_by_depth, Collar, CollarScan, CollarThresholds, CollarValidity, Curve, DepthSample,
    SentinelAnomaly,
};

/// Derive the collar thresholds from the valid CCL readings.
///
/// Returns `None` when the log holds no usable CCL reading.
pub fn collar_thresholds(samples: &[DepthSample], gain_fraction: f64) -> Option<CollarThresholds> {
    let ccl: Vec<f64> = samples.iter().filter(|s| s.has_ccl()).map(|s| s.ccl).collect();
    if ccl.is_empty() {
        return None;
    }

    let mean = Statistics::mean(ccl.iter());
    let max = Statistics::max(ccl.iter());
    let min = Statistics::min(ccl.iter());

    Some(CollarThresholds {
        upper: gain_fraction * (max - mean),
        lower: gain_fraction * (min - mean),
        gain_fraction,
    })
}

/// Sentinel readings of the CCL and CBL curves, in ascending depth.
pub fn find_sentinels(samples: &[DepthSample]) -> Vec<SentinelAnomaly> {
    let mut anomalies = Vec::new();
    for s in sorted_by_depth(samples) {
        if !s.has_ccl() {
            anomalies.push(SentinelAnomaly { depth: s.depth, curve: Curve::Ccl });
        }
        if !s.has_cbl() {
            anomalies.push(SentinelAnomaly { depth: s.depth, curve: Curve::Cbl });
        }
    }
    anomalies
}

/// Detect collars above `upper_threshold`.
///
/// Input order does not matter; the scan always runs shallow to deep.
pub fn detect_collars(
    samples: &[DepthSample],
    upper_threshold: f64,
    min_spacing: f64,
    tolerance: f64,
) -> CollarScan {
    let sorted = sorted_by_depth(samples);

    let mut retained: Vec<(f64, f64)> = Vec::new();
    let mut last_candidate: Option<f64> = None;
    let mut duplicates = 0usize;

    for s in sorted.iter().filter(|s| s.has_ccl() && s.ccl > upper_threshold) {
        let is_duplicate = last_candidate.is_some_and(|prev| s.depth - prev <= tolerance);
        last_candidate = Some(s.depth);
        if is_duplicate {
            duplicates += 1;
            continue;
        }
        retained.push((s.depth, s.ccl));
    }

    let spacing_range = (min_spacing - tolerance)..=(min_spacing + tolerance);
    let mut previous: Option<f64> = None;
    let collars: Vec<Collar> = retained
        .into_iter()
        .enumerate()
        .map(|(idx, (depth, ccl))| {
            let validity = match previous {
                Some(prev) if !spacing_range.contains(&(depth - prev)) => CollarValidity::Invalid,
                _ => CollarValidity::Valid,
            };
            previous = Some(depth);
            Collar {
                label: format!("C.{}", idx + 1),
                depth,
                ccl,
                validity,
            }
        })
        .collect();

    debug!(
        collars = collars.len(),
        duplicates,
        invalid = collars.iter().filter(|c| !c.is_valid()).count(),
        threshold = upper_threshold,
        "Collar scan complete"
    );

    CollarScan {
        collars,
        anomalies: find_sentinels(&sorted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NULL_VALUE;

    fn ccl(depth: f64, value: f64) -> DepthSample {
        DepthSample::new(depth, 20.0, value)
    }

    fn depths(scan: &CollarScan) -> Vec<f64> {
        scan.collars.iter().map(|c| c.depth).collect()
    }

    #[test]
    fn test_thresholds_from_curve() {
        let samples = vec![ccl(1.0, 0.0), ccl(2.0, 0.0), ccl(3.0, 3.0), ccl(4.0, NULL_VALUE)];
        let t = collar_thresholds(&samples, 0.5).expect("ccl present");
        assert!((t.upper - 1.0).abs() < 1e-12, "upper = {}", t.upper);
        assert!((t.lower + 0.5).abs() < 1e-12, "lower = {}", t.lower);
        assert!(collar_thresholds(&[ccl(1.0, NULL_VALUE)], 0.5).is_none());
    }

    #[test]
    fn test_adjacent_candidates_collapse_to_first() {
        let samples = vec![ccl(100.3, 5.0), ccl(100.0, 5.0), ccl(105.0, 0.0)];
        let scan = detect_collars(&samples, 1.0, 9.6, 1.0);
        assert_eq!(depths(&scan), vec![100.0]);
        assert_eq!(scan.collars[0].label, "C.1");
        assert!(scan.collars[0].is_valid());
    }

    #[test]
    fn test_spacing_validity_and_chain_restart() {
        let samples = vec![
            ccl(100.0, 5.0),
            ccl(109.6, 5.0),
            ccl(115.0, 5.0),
            ccl(124.8, 5.0),
            ccl(140.0, 5.0),
        ];
        let scan = detect_collars(&samples, 1.0, 9.6, 1.0);
        let validity: Vec<CollarValidity> = scan.collars.iter().map(|c| c.validity).collect();
        assert_eq!(
            validity,
            vec![
                CollarValidity::Valid,
                CollarValidity::Valid,
                CollarValidity::Invalid,
                CollarValidity::Valid,
                CollarValidity::Invalid,
            ]
        );
        let labels: Vec<&str> = scan.collars.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["C.1", "C.2", "C.3", "C.4", "C.5"]);
    }

    #[test]
    fn test_detection_is_idempotent_on_accepted_depths() {
        let samples = vec![
            ccl(100.0, 5.0),
            ccl(100.5, 6.0),
            ccl(101.2, 5.0),
            ccl(109.7, 5.0),
            ccl(119.3, 5.0),
            ccl(119.9, 5.0),
        ];
        let first = detect_collars(&samples, 1.0, 9.6, 1.0);
        let accepted: Vec<DepthSample> = first.collars.iter().map(|c| ccl(c.depth, c.ccl)).collect();
        let second = detect_collars(&accepted, 1.0, 9.6, 1.0);
        assert_eq!(depths(&first), depths(&second));
    }

    #[test]
    fn test_no_candidates() {
        let samples = vec![ccl(100.0, 0.1), ccl(101.0, 0.2)];
        let scan = detect_collars(&samples, 1.0, 9.6, 1.0);
        assert!(scan.collars.is_empty());
        assert!(scan.anomalies.is_empty());
    }

    #[test]
    fn test_sentinels_reported_independently() {
        let samples = vec![
            ccl(100.0, 5.0),
            ccl(101.0, NULL_VALUE),
            DepthSample::new(102.0, NULL_VALUE, 0.0),
        ];
        let scan = detect_collars(&samples, 1.0, 9.6, 1.0);
        assert_eq!(depths(&scan), vec![100.0]);
        assert_eq!(
            scan.anomalies,
            vec![
                SentinelAnomaly { depth: 101.0, curve: Curve::Ccl },
                SentinelAnomaly { depth: 102.0, curve: Curve::Cbl },
            ]
        );
    }
}
