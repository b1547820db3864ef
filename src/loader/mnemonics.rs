//! Curve mnemonic alias table
//!
//! Historical tool vendors wrote the bond amplitude under several names. The
//! table below is consulted once at load time; the analysis core only ever
//! sees the canonical `DEPTH`, `CBL` and `CCL` columns.

/// Built-in depth aliases, in priority order.
const DEPTH_ALIASES: &[&str] = &["DEPT", "DEPTH", "MD", "TDEP"];

/// Built-in CBL aliases, in priority order. `CBL` itself wins over the others.
const CBL_ALIASES: &[&str] = &["CBL", "CBLF", "AMP3FT", "AMP"];

/// Built-in CCL aliases, in priority order.
const CCL_ALIASES: &[&str] = &["CCL", "CCLF", "CCLU"];

/// Column indices of the canonical curves within a source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub depth: usize,
    pub cbl: Option<usize>,
    pub ccl: Option<usize>,
}

/// Alias table: built-in names plus operator-supplied extras.
#[derive(Debug, Clone)]
pub struct CurveAliases {
    depth: Vec<String>,
    cbl: Vec<String>,
    ccl: Vec<String>,
}

impl Default for CurveAliases {
    fn default() -> Self {
        Self::with_extras(&[], &[])
    }
}

impl CurveAliases {
    /// Built-in aliases followed by `extra_cbl` / `extra_ccl` (lower priority).
    pub fn with_extras(extra_cbl: &[String], extra_ccl: &[String]) -> Self {
        let upper = |names: &[&str], extra: &[String]| -> Vec<String> {
            names
                .iter()
                .map(|s| (*s).to_string())
                .chain(extra.iter().map(|s| s.trim().to_uppercase()))
                .collect()
        };
        Self {
            depth: upper(DEPTH_ALIASES, &[]),
            cbl: upper(CBL_ALIASES, extra_cbl),
            ccl: upper(CCL_ALIASES, extra_ccl),
        }
    }

    /// Resolve the canonical columns of a table header.
    ///
    /// Within each curve the alias with the highest priority wins, regardless
    /// of column order. Depth falls back to the first column, which is the
    /// index curve by LAS convention.
    pub fn resolve(&self, mnemonics: &[String]) -> ColumnMap {
        let upper: Vec<String> = mnemonics.iter().map(|m| m.trim().to_uppercase()).collect();
        let find = |aliases: &[String]| -> Option<usize> {
            aliases
                .iter()
                .find_map(|alias| upper.iter().position(|m| m == alias))
        };

        ColumnMap {
            depth: find(&self.depth).unwrap_or(0),
            cbl: find(&self.cbl),
            ccl: find(&self.ccl),
        }
    }
}
