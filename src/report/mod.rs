//! Cement evaluation report
//!
//! The machine-readable artifact of one analysis run: log summary, TOC
//! assessment, perforation verdicts, collar scan, cut evaluation, warnings
//! and conclusion text. Serialized as pretty JSON and signed with an MD5
//! digest of its key figures.

pub mod narrative;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::analysis::{classify_sample, AnalysisOutcome, AnalysisParams, CementAnalysis, CollarAnalysis};
use crate::config::AnalysisConfig;
use crate::quality_control::{summarize, LogSummary};
use crate::types::{AnalysisWarning, QualityLabel, WellLog};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report to {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
}

/// Identity of the analysed well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellIdentity {
    pub name: String,
    pub field: String,
    pub source: String,
}

/// One row of the per-sample quality column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub depth: f64,
    pub cbl: f64,
    pub ccl: f64,
    pub quality: QualityLabel,
}

/// Full report of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub well: WellIdentity,
    pub parameters: AnalysisParams,
    pub log_summary: LogSummary,
    pub cement: CementAnalysis,
    pub collars: CollarAnalysis,
    pub warnings: Vec<AnalysisWarning>,
    pub conclusions: Vec<String>,
    /// Per-sample labels; only present when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub samples: Option<Vec<SampleRow>>,
    /// `MD5-<hex>` digest of the report's key figures
    pub signature: String,
}

impl AnalysisReport {
    /// Assemble a report from a finished analysis.
    pub fn build(
        log: &WellLog,
        config: &AnalysisConfig,
        params: &AnalysisParams,
        outcome: AnalysisOutcome,
        include_samples: bool,
    ) -> Self {
        let generated_at = Utc::now();
        let warnings: Vec<AnalysisWarning> = outcome.warnings().cloned().collect();
        let conclusions = conclusions(&outcome.cement);

        let samples = include_samples.then(|| {
            log.samples
                .iter()
                .map(|s| SampleRow {
                    depth: s.depth,
                    cbl: s.cbl,
                    ccl: s.ccl,
                    quality: classify_sample(s, params.reference_amplitude),
                })
                .collect()
        });

        let well = WellIdentity {
            name: if config.well.name.is_empty() {
                log.well_name.clone()
            } else {
                config.well.name.clone()
            },
            field: config.well.field.clone(),
            source: log.source.clone(),
        };

        let signature = signature(&well.name, &generated_at, &outcome);

        Self {
            generated_at,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            well,
            parameters: *params,
            log_summary: summarize(log),
            cement: outcome.cement,
            collars: outcome.collars,
            warnings,
            conclusions,
            samples,
            signature,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ReportError::Io(path.to_path_buf(), e))?;
        info!(
            path = %path.display(),
            well = %self.well.name,
            signature = %self.signature,
            "Report written"
        );
        Ok(())
    }
}

/// Conclusion paragraphs: the analysed TOC range first, then the perforations.
fn conclusions(cement: &CementAnalysis) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(ref verdict) = cement.toc.range_verdict {
        out.push(narrative::conclusion(
            verdict.dominant_label,
            Some(verdict.dominant_percentage()),
            cement.toc.calculated_toc,
        ));
    }
    if let Some(text) = narrative::interval_conclusion(&cement.intervals) {
        out.push(text);
    }
    out
}

fn signature(well: &str, generated_at: &DateTime<Utc>, outcome: &AnalysisOutcome) -> String {
    let toc = outcome
        .cement
        .toc
        .calculated_toc
        .map_or_else(|| "none".to_string(), |t| format!("{t:.2}"));
    let cut = outcome
        .collars
        .cuts
        .proposal
        .as_ref()
        .map_or_else(|| "none".to_string(), |p| format!("{:.2}", p.cut_depth));
    let content = format!(
        "{}:{}:{}:{}:{}:{}",
        well,
        generated_at.to_rfc3339(),
        toc,
        outcome.cement.intervals.len(),
        outcome.collars.scan.collars.len(),
        cut
    );
    format!("MD5-{:x}", md5::compute(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run;
    use crate::types::{Curve, CurveInfo, DepthSample, PerforationInterval};
    use std::collections::BTreeMap;

    fn sample_log() -> WellLog {
        let samples = (0..40)
            .map(|i| {
                let depth = 1490.0 + f64::from(i);
                let cbl = if i < 20 { 60.0 } else { 4.0 };
                DepthSample::new(depth, cbl, 0.0)
            })
            .collect();
        WellLog {
            well_name: "REP-1".to_string(),
            source: "rep.las".to_string(),
            curves: vec![
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
            ],
            samples,
            extra_curves: BTreeMap::new(),
        }
    }

    #[test]
    fn test_build_report() {
        let log = sample_log();
        let config = AnalysisConfig::default();
        let params = AnalysisParams::from_config(&config);
        let perfs = vec![PerforationInterval::new(1500.0, 1505.0).expect("valid")];
        let outcome = run(&log, &perfs, &params).expect("valid params");

        let report = AnalysisReport::build(&log, &config, &params, outcome, true);
        assert_eq!(report.well.name, "REP-1");
        assert!(report.signature.starts_with("MD5-"));
        assert_eq!(report.signature.len(), 4 + 32);
        assert_eq!(report.samples.as_ref().map(Vec::len), Some(40));
        assert_eq!(report.conclusions.len(), 2);
        assert!(report.warnings.contains(&AnalysisWarning::NoCclData));

        let json = report.to_json().expect("serializes");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed["well"]["name"], "REP-1");
        assert!(parsed["cement"]["intervals"][0]["label_percentages"]["Bad"].is_number());
    }

    #[test]
    fn test_config_well_name_overrides_log() {
        let log = sample_log();
        let mut config = AnalysisConfig::default();
        config.well.name = "Override-7".to_string();
        let params = AnalysisParams::from_config(&config);
        let outcome = run(&log, &[], &params).expect("valid params");
        let report = AnalysisReport::build(&log, &config, &params, outcome, false);
        assert_eq!(report.well.name, "Override-7");
        assert!(report.samples.is_none());
        let json = report.to_json().expect("serializes");
        assert!(!json.contains("\"samples\""));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let log = sample_log();
        let config = AnalysisConfig::default();
        let params = AnalysisParams::from_config(&config);
        let outcome = run(&log, &[], &params).expect("valid params");
        AnalysisReport::build(&log, &config, &params, outcome, false)
            .write_to(&path)
            .expect("writes");
        let written = std::fs::read_to_string(&path).expect("readable");
        assert!(written.contains("\"signature\""));
    }
}
