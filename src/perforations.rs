//! Perforation table parsing
//!
//! Operators paste perforation intervals from a spreadsheet: two columns
//! (top, base), one interval per line, optionally preceded by a header row.
//! Accepted delimiters, tried in order: tab, `;`, whitespace, `,`. A comma is
//! only a column delimiter when it yields exactly two fields and the second is
//! not a short digit run, since `1500,5` is a decimal comma.

use thiserror::Error;

use crate::numeric::parse_decimal;
use crate::types::PerforationInterval;

#[derive(Debug, Error, PartialEq)]
pub enum PerforationError {
    #[error("Perforation table is empty")]
    Empty,

    #[error("Line {line}: expected 2 columns (top, base), found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("Line {line}: '{value}' is not a number")]
    NotNumeric { line: usize, value: String },

    #[error("Line {line}: top {top} is deeper than base {base}")]
    Inverted { line: usize, top: f64, base: f64 },
}

/// Parse a pasted two-column perforation table.
///
/// A first row of non-numeric text cells is taken as a header and skipped.
/// Later non-numeric rows are errors.
pub fn parse_perforation_table(text: &str) -> Result<Vec<PerforationInterval>, PerforationError> {
    let mut intervals = Vec::new();
    let mut first_row = true;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let cells = split_row(line);
        let is_header = first_row
            && cells.iter().all(|c| parse_decimal(c).is_none())
            && cells.iter().any(|c| c.chars().any(char::is_alphabetic));
        first_row = false;
        if is_header {
            continue;
        }

        if cells.len() != 2 {
            return Err(PerforationError::ColumnCount {
                line: line_no,
                found: cells.len(),
            });
        }

        let top = parse_cell(&cells[0], line_no)?;
        let base = parse_cell(&cells[1], line_no)?;
        let interval = PerforationInterval::new(top, base).ok_or(PerforationError::Inverted {
            line: line_no,
            top,
            base,
        })?;
        intervals.push(interval);
    }

    if intervals.is_empty() {
        return Err(PerforationError::Empty);
    }
    Ok(intervals)
}

fn split_row(line: &str) -> Vec<String> {
    let cells: Vec<String> = if line.contains('\t') {
        line.split('\t').map(str::to_string).collect()
    } else if line.contains(';') {
        line.split(';').map(str::to_string).collect()
    } else if line.split_whitespace().count() > 1 {
        line.split_whitespace().map(str::to_string).collect()
    } else {
        let by_comma: Vec<String> = line.split(',').map(str::to_string).collect();
        if by_comma.len() == 2 && !is_decimal_fraction(&by_comma[0], &by_comma[1]) {
            by_comma
        } else {
            vec![line.to_string()]
        }
    };
    cells
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// `1500,5` reads as one value: the part after the comma is a bare digit run
/// shorter than the integer part, so it cannot be a base depth.
fn is_decimal_fraction(integer: &str, fraction: &str) -> bool {
    let (integer, fraction) = (integer.trim(), fraction.trim());
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    digits(integer) && digits(fraction) && fraction.len() < integer.len()
}

fn parse_cell(cell: &str, line: usize) -> Result<f64, PerforationError> {
    parse_decimal(cell).ok_or_else(|| PerforationError::NotNumeric {
        line,
        value: cell.to_string(),
    })
}
