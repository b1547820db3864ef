//! CBL/CCL well-log analyzer
//!
//! Cement-bond-log (CBL) and casing-collar-log (CCL) evaluation for cased
//! wellbores.
//!
//! ## Architecture
//!
//! - **Loader**: LAS 2.0 / delimited tables → canonical `DEPTH`/`CBL`/`CCL` samples
//! - **Analysis**: per-sample cement quality, top-of-cement estimate,
//!   perforation-interval verdicts, collar detection and cut proposal
//! - **Quality control**: descriptive statistics per curve
//! - **Report**: JSON artifact with conclusions and a signature
//!
//! All analysis functions are pure over an immutable sample slice and take
//! their parameters explicitly.

pub mod analysis;
pub mod config;
pub mod loader;
pub mod numeric;
pub mod perforations;
pub mod quality_control;
pub mod report;
pub mod types;

// Re-export configuration
pub use config::{AnalysisConfig, ConfigError};

// Re-export commonly used types
pub use types::{
    AnalysisWarning, Collar, CollarScan, CollarValidity, Curve, CutEvaluation, DepthSample,
    DepthWindow, IntervalVerdict, PerforationInterval, ProposedCut, QualityLabel,
    SentinelAnomaly, TocAssessment, WellLog,
};

// Re-export the analysis entry points
pub use analysis::{
    aggregate, classify, detect_collars, estimate_toc, propose_cut, run, AnalysisError,
    AnalysisOutcome, AnalysisParams,
};

pub use loader::{load_log, LoadError};
pub use numeric::{parse_decimal, NULL_VALUE};
pub use perforations::{parse_perforation_table, PerforationError};
pub use report::{AnalysisReport, ReportError};
