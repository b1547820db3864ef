//! LAS 2.0 reader
//!
//! Supports the unwrapped ASCII form: `~V`, `~W`, `~C` and `~A` sections are
//! interpreted, `~P`, `~O` and unknown sections are skipped. Header lines have
//! the form `MNEM.UNIT  VALUE : DESCRIPTION`.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::{assemble, read_file, LoadError, RawTable};
use crate::config::LoaderConfig;
use crate::numeric::parse_decimal;
use crate::types::WellLog;

/// A `MNEM.UNIT VALUE : DESCRIPTION` header line.
#[derive(Debug, Clone, PartialEq)]
struct HeaderLine {
    mnemonic: String,
    unit: String,
    value: String,
    description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Version,
    Well,
    Curves,
    Data,
    Other,
}

impl Section {
    fn from_marker(line: &str) -> Self {
        match line
            .trim_start_matches('~')
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
        {
            Some('V') => Self::Version,
            Some('W') => Self::Well,
            Some('C') => Self::Curves,
            Some('A') => Self::Data,
            _ => Self::Other,
        }
    }
}

#[allow(clippy::expect_used)]
fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<mnem>[^.\s]+)\s*\.(?P<unit>\S*)(?P<rest>.*)$")
            .expect("static LAS header pattern")
    })
}

fn parse_header_line(line: &str) -> Option<HeaderLine> {
    let caps = header_regex().captures(line)?;
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    let (value, description) = match rest.rfind(':') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    Some(HeaderLine {
        mnemonic: caps["mnem"].trim().to_uppercase(),
        unit: caps["unit"].trim().to_string(),
        value: value.trim().to_string(),
        description: description.trim().to_string(),
    })
}

/// Read and parse a LAS file from disk.
pub fn read_las(path: &Path, config: &LoaderConfig) -> Result<WellLog, LoadError> {
    let text = read_file(path)?;
    parse_las(&text, &path.display().to_string(), config)
}

/// Parse LAS 2.0 text.
///
/// `source` is recorded on the returned log; its file stem names the well when
/// the header carries no `WELL` entry.
pub fn parse_las(text: &str, source: &str, config: &LoaderConfig) -> Result<WellLog, LoadError> {
    let mut section = Section::Other;
    let mut saw_data_section = false;
    let mut well_name = String::new();
    let mut declared_null = config.default_null;
    let mut headers: Vec<(String, String, String)> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('~') {
            section = Section::from_marker(line);
            if section == Section::Data {
                if headers.is_empty() {
                    return Err(LoadError::Malformed {
                        line: line_no,
                        message: "~A section before any curve definition".to_string(),
                    });
                }
                saw_data_section = true;
            }
            continue;
        }

        match section {
            Section::Version => {
                if let Some(h) = parse_header_line(line) {
                    check_version_line(&h)?;
                }
            }
            Section::Well => {
                if let Some(h) = parse_header_line(line) {
                    match h.mnemonic.as_str() {
                        "NULL" => {
                            declared_null =
                                parse_decimal(&h.value).ok_or_else(|| LoadError::Malformed {
                                    line: line_no,
                                    message: format!("invalid NULL value '{}'", h.value),
                                })?;
                        }
                        // Some writers put the name in the description slot
                        "WELL" => {
                            well_name = if h.value.is_empty() {
                                h.description
                            } else {
                                h.value
                            };
                        }
                        _ => {}
                    }
                }
            }
            Section::Curves => {
                let h = parse_header_line(line).ok_or_else(|| LoadError::Malformed {
                    line: line_no,
                    message: format!("unreadable curve definition '{line}'"),
                })?;
                headers.push((h.mnemonic, h.unit, h.description));
            }
            Section::Data => {
                let row = parse_data_line(line, line_no)?;
                if row.len() != headers.len() {
                    return Err(LoadError::Malformed {
                        line: line_no,
                        message: format!(
                            "expected {} values, found {}",
                            headers.len(),
                            row.len()
                        ),
                    });
                }
                rows.push(row);
            }
            Section::Other => {}
        }
    }

    if !saw_data_section {
        return Err(LoadError::Unsupported("no ~A data section".to_string()));
    }

    debug!(
        source,
        curves = headers.len(),
        rows = rows.len(),
        null = declared_null,
        "Parsed LAS sections"
    );

    assemble(
        RawTable {
            well_name,
            source: source.to_string(),
            headers,
            rows,
            declared_null,
        },
        config,
    )
}

fn check_version_line(h: &HeaderLine) -> Result<(), LoadError> {
    match h.mnemonic.as_str() {
        "WRAP" if h.value.eq_ignore_ascii_case("YES") => Err(LoadError::Unsupported(
            "wrapped LAS data (WRAP. YES)".to_string(),
        )),
        "VERS" => match parse_decimal(&h.value) {
            Some(v) if v >= 3.0 => Err(LoadError::Unsupported(format!("LAS version {}", h.value))),
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

fn parse_data_line(line: &str, line_no: usize) -> Result<Vec<f64>, LoadError> {
    line.split_whitespace()
        .map(|token| {
            parse_decimal(token).ok_or_else(|| LoadError::Malformed {
                line: line_no,
                message: format!("non-numeric value '{token}'"),
            })
        })
        .collect()
}
