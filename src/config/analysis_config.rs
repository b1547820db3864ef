//! Analysis Configuration - every analysis constant as an operator-tunable TOML value
//!
//! Each struct implements `Default` with the standard field values, so a
//! missing config file gives the same results as the documented constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one analysis session.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$CBL_ANALYZER_CONFIG` env var
/// 2. `./cbl_analyzer.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Well identification (reports only)
    #[serde(default)]
    pub well: WellInfo,

    /// Cement quality and TOC parameters
    #[serde(default)]
    pub cement: CementConfig,

    /// Collar detection parameters
    #[serde(default)]
    pub collars: CollarConfig,

    /// Cut proposal parameters
    #[serde(default)]
    pub cut: CutConfig,

    /// Loader behaviour
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order:
    /// 1. `$CBL_ANALYZER_CONFIG` environment variable
    /// 2. `./cbl_analyzer.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analysis config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analysis config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No config file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys only produce warnings; they never reject a config.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the effective config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate the configuration for internal consistency.
    ///
    /// Checks:
    /// - free-pipe amplitude, margin, spacing and lookback must be > 0
    /// - gain fraction must lie in [0, 1]
    /// - the collar tolerance must be smaller than the collar spacing
    /// - every value must be finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let c = &self.cement;
        Self::check_positive(c.free_pipe_amplitude, "cement.free_pipe_amplitude", &mut errors);
        Self::check_positive(c.margin, "cement.margin", &mut errors);
        Self::check_finite(c.theoretical_toc, "cement.theoretical_toc", &mut errors);
        Self::check_finite(c.toc_noise_floor, "cement.toc_noise_floor", &mut errors);
        if c.toc_candidate_count == 0 {
            errors.push("cement.toc_candidate_count must be > 0".to_string());
        }

        let k = &self.collars;
        if !(0.0..=1.0).contains(&k.gain_fraction) {
            errors.push(format!(
                "collars.gain_fraction = {} must lie in [0, 1]",
                k.gain_fraction
            ));
        }
        Self::check_positive(k.spacing, "collars.spacing", &mut errors);
        if !k.tolerance.is_finite() || k.tolerance < 0.0 {
            errors.push(format!("collars.tolerance = {} must be >= 0", k.tolerance));
        } else if k.tolerance >= k.spacing {
            errors.push(format!(
                "collars.tolerance ({:.2}) must be less than collars.spacing ({:.2})",
                k.tolerance, k.spacing
            ));
        }

        Self::check_positive(self.cut.lookback, "cut.lookback", &mut errors);
        Self::check_finite(self.cut.safety_offset, "cut.safety_offset", &mut errors);
        Self::check_finite(self.loader.default_null, "loader.default_null", &mut errors);

        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so check finiteness first
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name} = {value} must be a finite number > 0"));
        }
    }

    fn check_finite(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() {
            errors.push(format!("{name} = {value} must be a finite number"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Well Info
// ============================================================================

/// Identification metadata - not used for logic, but appears in logs and reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellInfo {
    /// Well name; overrides the name found in the log header when set
    #[serde(default)]
    pub name: String,

    /// Field name
    #[serde(default)]
    pub field: String,
}

// ============================================================================
// Cement
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CementConfig {
    /// Free-pipe reference amplitude (mV)
    pub free_pipe_amplitude: f64,
    /// Theoretical top of cement
    pub theoretical_toc: f64,
    /// Padding around perforation intervals
    pub margin: f64,
    /// Bad readings at or below this amplitude are ignored for TOC picks
    pub toc_noise_floor: f64,
    /// Deepest bad readings averaged into the calculated TOC
    pub toc_candidate_count: usize,
}

impl Default for CementConfig {
    fn default() -> Self {
        Self {
            free_pipe_amplitude: defaults::FREE_PIPE_AMPLITUDE,
            theoretical_toc: defaults::THEORETICAL_TOC,
            margin: defaults::PERFORATION_MARGIN,
            toc_noise_floor: defaults::TOC_NOISE_FLOOR,
            toc_candidate_count: defaults::TOC_CANDIDATE_COUNT,
        }
    }
}

// ============================================================================
// Collars
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollarConfig {
    /// Fraction of `max(CCL) - mean(CCL)` used as the upper threshold
    pub gain_fraction: f64,
    /// Nominal joint length
    pub spacing: f64,
    /// Spacing and duplicate tolerance
    pub tolerance: f64,
}

impl Default for CollarConfig {
    fn default() -> Self {
        Self {
            gain_fraction: defaults::CCL_GAIN_FRACTION,
            spacing: defaults::COLLAR_SPACING,
            tolerance: defaults::COLLAR_TOLERANCE,
        }
    }
}

// ============================================================================
// Cut
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutConfig {
    /// Window length above each collar
    pub lookback: f64,
    /// Distance above the selected collar for the cut
    pub safety_offset: f64,
}

impl Default for CutConfig {
    fn default() -> Self {
        Self {
            lookback: defaults::CUT_LOOKBACK,
            safety_offset: defaults::CUT_SAFETY_OFFSET,
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Null marker assumed when the file declares none
    pub default_null: f64,
    /// Extra mnemonics mapped onto CBL, tried after the built-in aliases
    pub cbl_aliases: Vec<String>,
    /// Extra mnemonics mapped onto CCL, tried after the built-in aliases
    pub ccl_aliases: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_null: defaults::LAS_DEFAULT_NULL,
            cbl_aliases: Vec::new(),
            ccl_aliases: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
