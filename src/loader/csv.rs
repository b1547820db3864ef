//! Delimited depth-table reader
//!
//! Expected format: one header row of curve mnemonics followed by one row per
//! depth step. The delimiter is taken from the header row (`;`, tab, then `,`),
//! so European exports with decimal commas and `;` separators read unchanged.
//! Empty, `NaN` and `null` cells become the null sentinel.

use std::path::Path;
use tracing::debug;

use super::{assemble, read_file, LoadError, RawTable};
use crate::config::LoaderConfig;
use crate::numeric::{parse_decimal, NULL_VALUE};
use crate::types::WellLog;

/// Read and parse a delimited depth table from disk.
///
/// The well name is the file stem; the caller may override it from config.
pub fn read_csv(path: &Path, config: &LoaderConfig) -> Result<WellLog, LoadError> {
    let text = read_file(path)?;
    parse_csv(&text, &path.display().to_string(), config)
}

pub(crate) fn parse_csv(
    text: &str,
    source: &str,
    config: &LoaderConfig,
) -> Result<WellLog, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'));

    let (_, header_line) = lines.next().ok_or(LoadError::Empty)?;
    let delimiter = detect_delimiter(header_line);
    let headers: Vec<(String, String, String)> = split_fields(header_line, delimiter)
        .into_iter()
        .map(|name| (name.trim().to_uppercase(), String::new(), String::new()))
        .collect();

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let fields = split_fields(line, delimiter);
        if fields.len() != headers.len() {
            return Err(LoadError::Malformed {
                line: line_no,
                message: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    fields.len()
                ),
            });
        }
        let row = fields
            .iter()
            .map(|field| parse_cell(field, line_no))
            .collect::<Result<Vec<f64>, LoadError>>()?;
        rows.push(row);
    }

    debug!(
        source,
        columns = headers.len(),
        rows = rows.len(),
        delimiter = %delimiter.escape_default(),
        "Parsed delimited table"
    );

    assemble(
        RawTable {
            well_name: String::new(),
            source: source.to_string(),
            headers,
            rows,
            declared_null: config.default_null,
        },
        config,
    )
}

/// Pick the delimiter from the header row.
fn detect_delimiter(header: &str) -> char {
    if header.contains(';') {
        ';'
    } else if header.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Split a line on `delimiter`, honouring double-quoted fields.
///
/// Inside quotes the delimiter is literal and `""` is an escaped quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

fn parse_cell(field: &str, line_no: usize) -> Result<f64, LoadError> {
    let s = field.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") || s == "-"
    {
        return Ok(NULL_VALUE);
    }
    parse_decimal(s).ok_or_else(|| LoadError::Malformed {
        line: line_no,
        message: format!("non-numeric value '{s}'"),
    })
}
