//! Analysis Configuration Module
//!
//! Provides the analysis parameters loaded from a TOML file, so every
//! threshold and window length is operator-tunable.
//!
//! ## Loading Order
//!
//! 1. `CBL_ANALYZER_CONFIG` environment variable (path to TOML file)
//! 2. `cbl_analyzer.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The config is a plain value passed explicitly into the analysis, never a
//! global:
//!
//! ```ignore
//! let config = AnalysisConfig::load();
//! let params = AnalysisParams::from_config(&config);
//! let report = analysis::run(&log, &perforations, &params);
//! ```

mod analysis_config;
pub mod defaults;
pub mod validation;

pub use analysis_config::*;
