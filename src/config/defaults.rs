//! System-wide default constants.
//!
//! Centralises the analysis constants. Grouped by subsystem for easy discovery.

// ============================================================================
// Configuration discovery
// ============================================================================

/// Environment variable holding the path to the analysis config file.
pub const CONFIG_ENV_VAR: &str = "CBL_ANALYZER_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "cbl_analyzer.toml";

// ============================================================================
// Cement quality
// ============================================================================

/// Free-pipe reference amplitude (mV) used when none is configured.
pub const FREE_PIPE_AMPLITUDE: f64 = 72.0;

/// Readings below this fraction of the free-pipe amplitude are good cement.
pub const GOOD_CEMENT_FRACTION: f64 = 0.1;

/// Readings above this fraction of the free-pipe amplitude are bad cement.
pub const BAD_CEMENT_FRACTION: f64 = 0.5;

/// Theoretical top of cement used when none is configured.
pub const THEORETICAL_TOC: f64 = 1500.0;

/// Padding added above and below each perforation interval.
pub const PERFORATION_MARGIN: f64 = 5.0;

/// Bad readings at or below this amplitude are treated as sensor noise for TOC picks.
pub const TOC_NOISE_FLOOR: f64 = 10.0;

/// Number of deepest bad readings averaged into the calculated TOC.
pub const TOC_CANDIDATE_COUNT: usize = 10;

// ============================================================================
// Collars
// ============================================================================

/// Fraction of `max(CCL) - mean(CCL)` used as the collar threshold.
pub const CCL_GAIN_FRACTION: f64 = 0.15;

/// Nominal joint length between collars.
pub const COLLAR_SPACING: f64 = 9.6;

/// Tolerance on collar spacing and on duplicate detections.
pub const COLLAR_TOLERANCE: f64 = 1.0;

// ============================================================================
// Cut proposals
// ============================================================================

/// Length of the window above each collar inspected for a cut.
pub const CUT_LOOKBACK: f64 = 4.0;

/// Distance above the selected collar at which the cut is placed.
pub const CUT_SAFETY_OFFSET: f64 = 1.5;

/// CBL percentage of the maximum at or above which pipe is free.
pub const FREE_PIPE_PERCENT: f64 = 90.0;

/// CBL percentage of the maximum at or above which pipe is stuck (below free).
pub const STUCK_PIPE_PERCENT: f64 = 60.0;

/// CBL percentage of the maximum at or above which the response is a collar.
pub const COLLAR_RESPONSE_PERCENT: f64 = 25.0;

// ============================================================================
// Loader
// ============================================================================

/// Null marker assumed when a LAS file does not declare one.
pub const LAS_DEFAULT_NULL: f64 = -999.25;
