//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::AnalysisConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for AnalysisConfig.
///
/// Any new field added to AnalysisConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [well]
        "well",
        "well.name",
        "well.field",
        // [cement]
        "cement",
        "cement.free_pipe_amplitude",
        "cement.theoretical_toc",
        "cement.margin",
        "cement.toc_noise_floor",
        "cement.toc_candidate_count",
        // [collars]
        "collars",
        "collars.gain_fraction",
        "collars.spacing",
        "collars.tolerance",
        // [cut]
        "cut",
        "cut.lookback",
        "cut.safety_offset",
        // [loader]
        "loader",
        "loader.default_null",
        "loader.cbl_aliases",
        "loader.ccl_aliases",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| {
            let suggestion = suggest_correction(&key, &known);
            ValidationWarning {
                message: format!("Unknown config key '{key}'"),
                field: key,
                suggestion,
            }
        })
        .collect()
}

// ============================================================================
// Plausibility Range Validation
// ============================================================================

/// Validate plausibility ranges on a parsed AnalysisConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent an analysis; warnings are suspicious but not fatal.
pub fn validate_ranges(config: &AnalysisConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let c = &config.cement;

    if c.theoretical_toc < 0.0 {
        errors.push(format!(
            "cement.theoretical_toc = {:.2} cannot be negative",
            c.theoretical_toc
        ));
    }

    // Free-pipe amplitude: CBL tools read roughly 20-150 mV in free pipe
    if c.free_pipe_amplitude > 0.0 && !(20.0..=150.0).contains(&c.free_pipe_amplitude) {
        warnings.push(ValidationWarning {
            field: "cement.free_pipe_amplitude".to_string(),
            message: format!(
                "free_pipe_amplitude = {:.1} mV is outside the typical range (20-150 mV)",
                c.free_pipe_amplitude
            ),
            suggestion: None,
        });
    }

    if c.margin > 50.0 {
        warnings.push(ValidationWarning {
            field: "cement.margin".to_string(),
            message: format!(
                "margin = {:.1} is unusually wide; perforation windows will overlap heavily",
                c.margin
            ),
            suggestion: None,
        });
    }

    let k = &config.collars;
    if k.gain_fraction == 0.0 {
        warnings.push(ValidationWarning {
            field: "collars.gain_fraction".to_string(),
            message: "gain_fraction = 0 flags every reading above the CCL mean as a collar"
                .to_string(),
            suggestion: None,
        });
    }

    // Casing joints run roughly 6-14 m (range 2 and range 3 pipe)
    if k.spacing > 0.0 && !(6.0..=14.0).contains(&k.spacing) {
        warnings.push(ValidationWarning {
            field: "collars.spacing".to_string(),
            message: format!(
                "spacing = {:.2} is outside the typical joint length (6-14)",
                k.spacing
            ),
            suggestion: None,
        });
    }

    if config.cut.safety_offset < 0.0 {
        errors.push(format!(
            "cut.safety_offset = {:.2} cannot be negative (cut would fall below the collar)",
            config.cut.safety_offset
        ));
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
