//! Interval aggregation of per-sample quality labels

use std::collections::BTreeMap;

use super::classifier::classify_sample;
use super::AnalysisError;
use crate::types::{DepthSample, DepthWindow, IntervalVerdict, PerforationInterval, QualityLabel};

/// Aggregate quality over a perforation interval padded by `margin`.
///
/// The window `[top - margin, base + margin]` is inclusive. Intervals are
/// evaluated independently; overlapping windows are not merged.
pub fn aggregate(
    samples: &[DepthSample],
    interval: &PerforationInterval,
    margin: f64,
    reference_amplitude: f64,
) -> Result<IntervalVerdict, AnalysisError> {
    let mut verdict = aggregate_window(samples, interval.window(margin), reference_amplitude)?;
    verdict.interval = Some(*interval);
    Ok(verdict)
}

/// Aggregate quality over a raw inclusive depth window.
pub fn aggregate_window(
    samples: &[DepthSample],
    window: DepthWindow,
    reference_amplitude: f64,
) -> Result<IntervalVerdict, AnalysisError> {
    let mut counts: BTreeMap<QualityLabel, usize> =
        QualityLabel::ALL.iter().map(|&l| (l, 0)).collect();
    let mut total = 0usize;

    for sample in samples.iter().filter(|s| window.contains(s.depth)) {
        *counts
            .entry(classify_sample(sample, reference_amplitude))
            .or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return Err(AnalysisError::EmptyWindow {
            top: window.top,
            base: window.base,
        });
    }

    let percentages = counts
        .iter()
        .map(|(&label, &n)| (label, n as f64 * 100.0 / total as f64))
        .collect();

    Ok(IntervalVerdict {
        interval: None,
        window,
        sample_count: total,
        dominant_label: dominant_label(&counts),
        label_percentages: percentages,
        label_counts: counts,
    })
}

/// Run [`aggregate`] over every interval, keeping each result.
///
/// One empty window does not abort the others.
pub fn aggregate_all(
    samples: &[DepthSample],
    intervals: &[PerforationInterval],
    margin: f64,
    reference_amplitude: f64,
) -> Vec<Result<IntervalVerdict, AnalysisError>> {
    intervals
        .iter()
        .map(|interval| aggregate(samples, interval, margin, reference_amplitude))
        .collect()
}

/// Highest count wins; ties go to the label earliest in [`QualityLabel::ALL`].
fn dominant_label(counts: &BTreeMap<QualityLabel, usize>) -> QualityLabel {
    let mut best = QualityLabel::Good;
    let mut best_count = 0usize;
    for label in QualityLabel::ALL {
        let n = counts.get(&label).copied().unwrap_or(0);
        if n > best_count {
            best = label;
            best_count = n;
        }
    }
    best
}
