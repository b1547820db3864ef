//! Cement quality classification
//!
//! A single total function decides the label of every CBL reading, so the
//! per-sample column, the interval verdicts and the TOC estimate can never
//! disagree about a sample.

use crate::config::defaults::{BAD_CEMENT_FRACTION, GOOD_CEMENT_FRACTION};
use crate::numeric::is_null;
use crate::types::{DepthSample, QualityLabel};

/// Classify one CBL amplitude against the free-pipe reference amplitude `R`.
///
/// | CBL                      | Label   |
/// |--------------------------|---------|
/// | `0`, null, non-finite    | NoData  |
/// | `< 0.1·R`                | Good    |
/// | `> 0.5·R`                | Bad     |
/// | `0.1·R ..= 0.5·R`        | Regular |
///
/// Negative readings fall on the `Good` branch.
pub fn classify(cbl: f64, reference_amplitude: f64) -> QualityLabel {
    if cbl == 0.0 || is_null(cbl) {
        return QualityLabel::NoData;
    }
    if cbl < GOOD_CEMENT_FRACTION * reference_amplitude {
        QualityLabel::Good
    } else if cbl > BAD_CEMENT_FRACTION * reference_amplitude {
        QualityLabel::Bad
    } else {
        QualityLabel::Regular
    }
}

pub fn classify_sample(sample: &DepthSample, reference_amplitude: f64) -> QualityLabel {
    classify(sample.cbl, reference_amplitude)
}

/// Per-sample label column, aligned with `samples`.
pub fn quality_column(samples: &[DepthSample], reference_amplitude: f64) -> Vec<QualityLabel> {
    samples
        .iter()
        .map(|s| classify_sample(s, reference_amplitude))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NULL_VALUE;

    const R: f64 = 72.0;

    #[test]
    fn test_reference_scenario() {
        let samples = vec![
            DepthSample::cbl_only(100.0, 5.0),
            DepthSample::cbl_only(101.0, 30.0),
            DepthSample::cbl_only(102.0, 80.0),
        ];
        assert_eq!(
            quality_column(&samples, R),
            vec![QualityLabel::Good, QualityLabel::Regular, QualityLabel::Bad]
        );
    }

    #[test]
    fn test_forty_millivolts_is_bad_at_reference_72() {
        // 0.5 × 72 = 36
        assert_eq!(classify(40.0, R), QualityLabel::Bad);
        assert_eq!(classify(36.0, R), QualityLabel::Regular);
    }

    #[test]
    fn test_threshold_boundaries_are_regular() {
        assert_eq!(classify(0.1 * R, R), QualityLabel::Regular);
        assert_eq!(classify(0.5 * R, R), QualityLabel::Regular);
        assert_eq!(classify(0.1 * R - 1e-9, R), QualityLabel::Good);
        assert_eq!(classify(0.5 * R + 1e-9, R), QualityLabel::Bad);
    }

    #[test]
    fn test_no_data_cases() {
        assert_eq!(classify(0.0, R), QualityLabel::NoData);
        assert_eq!(classify(NULL_VALUE, R), QualityLabel::NoData);
        assert_eq!(classify(f64::NAN, R), QualityLabel::NoData);
    }

    #[test]
    fn test_negative_reading_is_good() {
        assert_eq!(classify(-3.0, R), QualityLabel::Good);
    }

    #[test]
    fn test_every_reading_gets_exactly_one_label() {
        for i in -20..200 {
            let label = classify(f64::from(i) * 0.5, R);
            assert!(QualityLabel::ALL.contains(&label), "unexpected label {label}");
        }
    }
}
