//! Config Validation Tests
//!
//! Typo detection, range validation and TOML roundtrips for the analysis
//! config, exercised independently from the analyses.

use cbl_analyzer::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use cbl_analyzer::config::{AnalysisConfig, ConfigError};
use cbl_analyzer::AnalysisParams;

// ============================================================================
// Typo Detection Tests
// ============================================================================

#[test]
fn typo_in_cement_section_warns_with_suggestion() {
    let toml_str = r#"
[cement]
free_pipe_amplitud = 72.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("free_pipe_amplitud"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("cement.free_pipe_amplitude"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn typo_in_well_section_warns() {
    let toml_str = r#"
[well]
naem = "CB-101"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    // "naem" is distance 2 from "name"
    assert_eq!(warnings[0].suggestion.as_deref(), Some("well.name"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[well]
name = "CB-101"
field = "Cerro Dragón"

[cement]
free_pipe_amplitude = 68.0
theoretical_toc = 1450.0
margin = 10.0
toc_noise_floor = 10.0
toc_candidate_count = 10

[collars]
gain_fraction = 0.2
spacing = 9.6
tolerance = 1.0

[cut]
lookback = 4.0
safety_offset = 1.5

[loader]
default_null = -999.25
cbl_aliases = ["AMPL"]
ccl_aliases = []
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Valid config should produce 0 warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
    let config = AnalysisConfig::from_toml_str(toml_str).expect("valid config parses");
    assert_eq!(config.well.name, "CB-101");
    assert_eq!(config.loader.cbl_aliases, vec!["AMPL".to_string()]);
}

#[test]
fn multiple_typos_all_warned() {
    let toml_str = r#"
[collars]
spaceing = 9.6

[cut]
lookbak = 4.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 2, "Expected 2 warnings for 2 typos, got {}", warnings.len());
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn known_keys_set_is_complete() {
    let config = AnalysisConfig::default();
    let toml_str = config.to_toml().expect("Default config should serialize");
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Default config serialization should produce 0 unknown-key warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let known = known_config_keys();
    let s = suggest_correction("zzz_completely_invalid_xyz_12345", &known);
    assert!(s.is_none(), "Garbage string should not match anything");
}

// ============================================================================
// Range Validation Tests
// ============================================================================

#[test]
fn all_defaults_pass_validation() {
    let config = AnalysisConfig::default();
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty(), "Default config should have 0 range errors: {:?}", errors);
    assert!(
        warnings.is_empty(),
        "Default config should have 0 range warnings: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
    assert!(config.validate().is_ok(), "Default config must always pass full validation");
}

#[test]
fn zero_amplitude_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.cement.free_pipe_amplitude = 0.0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("free_pipe_amplitude")), "{errors:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn gain_above_one_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.collars.gain_fraction = 1.2;
    assert!(config.validate().is_err());
}

#[test]
fn negative_safety_offset_is_rejected() {
    let mut config = AnalysisConfig::default();
    config.cut.safety_offset = -1.0;
    let (errors, _) = validate_ranges(&config);
    assert!(errors.iter().any(|e| e.contains("safety_offset")));
    assert!(config.validate().is_err());
}

#[test]
fn unusual_amplitude_is_only_a_warning() {
    let mut config = AnalysisConfig::default();
    config.cement.free_pipe_amplitude = 300.0;
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.iter().any(|w| w.field == "cement.free_pipe_amplitude"));
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = AnalysisConfig::from_toml_str("[cement\nmargin = 5").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)), "got {err}");
}

#[test]
fn load_from_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cbl_analyzer.toml");
    std::fs::write(&path, "[cement]\nmargin = -5.0\n").expect("write config");
    let err = AnalysisConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got {err}");

    std::fs::write(&path, "[cement]\nmargin = 15.0\n").expect("write config");
    let config = AnalysisConfig::load_from_file(&path).expect("valid config");
    assert!((config.cement.margin - 15.0).abs() < f64::EPSILON);
    assert!((config.cement.free_pipe_amplitude - 72.0).abs() < f64::EPSILON);
}

// ============================================================================
// Config Roundtrip Tests
// ============================================================================

#[test]
fn config_roundtrip_preserves_values() {
    let mut original = AnalysisConfig::default();
    original.well.name = "Roundtrip-Test".to_string();
    original.cement.theoretical_toc = 2100.5;
    original.collars.spacing = 12.0;

    let toml_str = original.to_toml().expect("Serialization should work");
    let roundtripped = AnalysisConfig::from_toml_str(&toml_str).expect("Deserialization should work");
    assert_eq!(roundtripped, original);
}

#[test]
fn params_follow_config() {
    let mut config = AnalysisConfig::default();
    config.cement.free_pipe_amplitude = 65.0;
    config.cut.lookback = 3.0;
    let params = AnalysisParams::from_config(&config);
    assert!((params.reference_amplitude - 65.0).abs() < f64::EPSILON);
    assert!((params.cut_lookback - 3.0).abs() < f64::EPSILON);
    assert!((params.cut_safety_offset - 1.5).abs() < f64::EPSILON);
}
