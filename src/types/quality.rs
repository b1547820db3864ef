//! Cement quality labels and interval verdicts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cement quality derived from one CBL reading.
///
/// Variant order is the tie-break precedence for dominant-label selection:
/// `Good > Regular > Bad > NoData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityLabel {
    Good,
    Regular,
    Bad,
    NoData,
}

impl QualityLabel {
    /// All labels in precedence order.
    pub const ALL: [Self; 4] = [Self::Good, Self::Regular, Self::Bad, Self::NoData];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Regular => "Regular",
            Self::Bad => "Bad",
            Self::NoData => "NoData",
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-supplied perforation interval. Always `top <= base`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerforationInterval {
    pub top: f64,
    pub base: f64,
}

impl PerforationInterval {
    /// Build an interval, returning `None` when `top > base` or either bound is not finite.
    pub fn new(top: f64, base: f64) -> Option<Self> {
        (top.is_finite() && base.is_finite() && top <= base).then_some(Self { top, base })
    }

    /// Analysis window padded by `margin` on both sides.
    pub fn window(&self, margin: f64) -> DepthWindow {
        DepthWindow {
            top: self.top - margin,
            base: self.base + margin,
        }
    }
}

/// Inclusive depth range `[top, base]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthWindow {
    pub top: f64,
    pub base: f64,
}

impl DepthWindow {
    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.top && depth <= self.base
    }
}

/// Aggregated quality over one analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalVerdict {
    /// Perforation interval this verdict belongs to (absent for raw windows)
    pub interval: Option<PerforationInterval>,
    /// Depth window the samples were drawn from
    pub window: DepthWindow,
    /// Number of samples inside the window
    pub sample_count: usize,
    /// Most frequent label, ties broken by label precedence
    pub dominant_label: QualityLabel,
    /// Percentage per label; every label is present, absent ones at 0
    pub label_percentages: BTreeMap<QualityLabel, f64>,
    /// Raw count per label; every label is present
    pub label_counts: BTreeMap<QualityLabel, usize>,
}

impl IntervalVerdict {
    /// Percentage held by the dominant label.
    pub fn dominant_percentage(&self) -> f64 {
        self.percentage(self.dominant_label)
    }

    pub fn percentage(&self, label: QualityLabel) -> f64 {
        self.label_percentages.get(&label).copied().unwrap_or(0.0)
    }
}
