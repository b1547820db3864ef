//! Curve quality-control statistics
//!
//! Descriptive statistics per curve (count, missing, min, max, mean, std-dev),
//! a pairwise Pearson correlation matrix and the depth coverage of the log.
//! Used to sanity-check a log before trusting the cement and collar analyses.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::numeric::is_null;
use crate::types::{sorted_by_depth, Curve, WellLog};

/// Descriptive statistics of one curve. Statistics are `None` when the curve
/// has no valid reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveStats {
    pub mnemonic: String,
    /// Total readings, including missing ones
    pub count: usize,
    /// Null sentinel or non-finite readings
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` with fewer than two valid readings
    pub std_dev: Option<f64>,
}

impl CurveStats {
    pub fn from_values(mnemonic: &str, values: &[f64]) -> Self {
        let valid: Vec<f64> = values.iter().copied().filter(|v| !is_null(*v)).collect();
        let has_data = !valid.is_empty();

        Self {
            mnemonic: mnemonic.to_string(),
            count: values.len(),
            missing: values.len() - valid.len(),
            min: has_data.then(|| Statistics::min(valid.iter())),
            max: has_data.then(|| Statistics::max(valid.iter())),
            mean: has_data.then(|| Statistics::mean(valid.iter())),
            std_dev: (valid.len() > 1).then(|| Statistics::std_dev(valid.iter())),
        }
    }

    /// Share of missing readings, in percent.
    pub fn missing_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.missing as f64 * 100.0 / self.count as f64
        }
    }
}

/// Pairwise Pearson correlations between curves.
///
/// `values[i][j]` correlates `curves[i]` with `curves[j]` over the depths where
/// both readings are present; `None` with fewer than two such depths or when
/// either curve is constant there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub curves: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn from_curves(curves: &[(String, Vec<f64>)]) -> Self {
        let values = curves
            .iter()
            .map(|(_, x)| curves.iter().map(|(_, y)| pearson_skipping_nulls(x, y)).collect())
            .collect();
        Self {
            curves: curves.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    /// Correlation between two named curves.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.curves.iter().position(|c| c == a)?;
        let j = self.curves.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// r = Σ[(xi − x̄)(yi − ȳ)] / sqrt(Σ(xi − x̄)² × Σ(yi − ȳ)²), over index pairs
/// where neither value is null.
fn pearson_skipping_nulls(x: &[f64], y: &[f64]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !is_null(**a) && !is_null(**b))
        .map(|(a, b)| (*a, *b))
        .unzip();
    if xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(&ys).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = xs.iter().map(|a| a * a).sum();
    let sum_y2: f64 = ys.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x.powi(2)) * (n * sum_y2 - sum_y.powi(2))).sqrt();
    if denominator <= f64::EPSILON || !denominator.is_finite() {
        None
    } else {
        Some((numerator / denominator).clamp(-1.0, 1.0))
    }
}

/// Depth coverage and per-curve statistics of a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub well_name: String,
    pub sample_count: usize,
    pub top_depth: Option<f64>,
    pub bottom_depth: Option<f64>,
    /// Median spacing between consecutive depths
    pub depth_step: Option<f64>,
    /// Canonical curves first (`CBL`, `CCL` if present), then extra curves
    pub curves: Vec<CurveStats>,
    /// Correlations between the same curves, in the same order
    pub correlations: CorrelationMatrix,
}

/// Summarise every curve of a loaded log.
pub fn summarize(log: &WellLog) -> LogSummary {
    let sorted = sorted_by_depth(&log.samples);
    let range = log.depth_range();

    let mut steps: Vec<f64> = sorted.windows(2).map(|w| w[1].depth - w[0].depth).collect();
    steps.sort_by(f64::total_cmp);
    let depth_step = steps.get(steps.len() / 2).copied();

    let mut columns: Vec<(String, Vec<f64>)> = vec![(
        Curve::Cbl.mnemonic().to_string(),
        log.samples.iter().map(|s| s.cbl).collect(),
    )];
    if log.has_curve(Curve::Ccl) {
        columns.push((
            Curve::Ccl.mnemonic().to_string(),
            log.samples.iter().map(|s| s.ccl).collect(),
        ));
    }
    columns.extend(
        log.extra_curves
            .iter()
            .map(|(mnemonic, values)| (mnemonic.clone(), values.clone())),
    );

    let curves = columns
        .iter()
        .map(|(mnemonic, values)| CurveStats::from_values(mnemonic, values))
        .collect();
    let correlations = CorrelationMatrix::from_curves(&columns);

    LogSummary {
        well_name: log.well_name.clone(),
        sample_count: log.samples.len(),
        top_depth: range.map(|r| r.0),
        bottom_depth: range.map(|r| r.1),
        depth_step,
        curves,
        correlations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NULL_VALUE;
    use crate::types::{CurveInfo, DepthSample};
    use std::collections::BTreeMap;

    #[test]
    fn test_curve_stats_skip_missing() {
        let stats = CurveStats::from_values("CBL", &[2.0, 4.0, NULL_VALUE, 6.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(6.0));
        assert_eq!(stats.mean, Some(4.0));
        let sd = stats.std_dev.expect("three readings");
        assert!((sd - 2.0).abs() < 1e-12, "std_dev = {sd}");
        assert!((stats.missing_percentage() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_curve_stats_all_missing() {
        let stats = CurveStats::from_values("CCL", &[NULL_VALUE, f64::NAN]);
        assert_eq!(stats.missing, 2);
        assert!(stats.mean.is_none());
        assert!(stats.std_dev.is_none());
    }

    #[test]
    fn test_summarize_log() {
        let mut extra = BTreeMap::new();
        extra.insert("GR".to_string(), vec![50.0, 60.0, 70.0]);
        let log = WellLog {
            well_name: "QC-1".to_string(),
            source: "memory".to_string(),
            curves: vec![CurveInfo {
                mnemonic: "CBL".to_string(),
                unit: String::new(),
                description: String::new(),
                canonical: Some(Curve::Cbl),
            }],
            samples: vec![
                DepthSample::cbl_only(101.0, 10.0),
                DepthSample::cbl_only(100.0, 20.0),
                DepthSample::cbl_only(100.5, 30.0),
            ],
            extra_curves: extra,
        };

        let summary = summarize(&log);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.top_depth, Some(100.0));
        assert_eq!(summary.bottom_depth, Some(101.0));
        assert_eq!(summary.depth_step, Some(0.5));
        let names: Vec<&str> = summary.curves.iter().map(|c| c.mnemonic.as_str()).collect();
        assert_eq!(names, vec!["CBL", "GR"]);
        assert_eq!(summary.correlations.curves, vec!["CBL".to_string(), "GR".to_string()]);
        // Extra curves stay aligned with the samples in file order
        let r = summary.correlations.get("GR", "CBL").expect("enough pairs");
        assert!((r - 1.0).abs() < 1e-12, "r = {r}");
    }

    #[test]
    fn test_correlation_skips_null_pairs() {
        let curves = vec![
            ("A".to_string(), vec![1.0, 2.0, 3.0, NULL_VALUE, 5.0]),
            ("B".to_string(), vec![2.0, 4.0, 6.0, 100.0, f64::NAN]),
            ("C".to_string(), vec![7.0, 7.0, 7.0, 7.0, 7.0]),
        ];
        let m = CorrelationMatrix::from_curves(&curves);
        let r = m.get("A", "B").expect("three complete pairs");
        assert!((r - 1.0).abs() < 1e-12, "r = {r}");
        assert_eq!(m.get("A", "B"), m.get("B", "A"));
        assert_eq!(m.get("A", "C"), None);
        assert_eq!(m.get("A", "missing"), None);
    }
}
