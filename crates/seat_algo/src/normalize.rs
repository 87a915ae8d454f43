//! Vote-table normalization: raw string cells → non-negative integer votes.
//!
//! Contract:
//! - Every header not listed as metadata (and not blank) is a party column.
//! - Party columns keep header order; that order is the canonical tie-break
//!   order for everything downstream.
//! - Malformed cells never fail: they become 0 and are counted in the report.
//! - Header problems (invalid party names, duplicates, a party named like the
//!   no-winner label) are errors.
//!
//! Cell syntax: optional surrounding whitespace, then an unsigned integer or a
//! finite decimal. Decimals are truncated toward zero. Negative numbers,
//! non-finite values, decimals at or above 2^53, thousands separators and text
//! all coerce to 0.
//!
//! The sum of every vote in a normalized table fits in `u64`: a cell that would
//! push the running table total past `u64::MAX` is coerced to 0 as well.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use log::{debug, warn};
use seat_core::{IdError, PartyId, RawTable, VoteRow, VoteTable};

/// Counters describing what normalization had to fix up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NormalizeReport {
    /// Non-blank cells that did not parse and were set to 0.
    /// Includes `overflow_cells`.
    pub coerced_cells: usize,
    /// Cells dropped because they would overflow the table's vote total.
    pub overflow_cells: usize,
    /// Blank cells (read as 0).
    pub blank_cells: usize,
    /// Decimal cells truncated toward zero.
    pub truncated_cells: usize,
    /// Header positions dropped because the header was blank.
    pub dropped_columns: Vec<usize>,
    /// Rows shorter than the header (padded).
    pub short_rows: usize,
}

impl NormalizeReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.coerced_cells == 0 && self.truncated_cells == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    InvalidPartyHeader { column: usize, header: String, reason: IdError },
    DuplicateParty(PartyId),
    ReservedPartyName(PartyId),
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::InvalidPartyHeader { column, header, reason } => {
                write!(f, "invalid party header {header:?} at column {column}: {reason}")
            }
            NormalizeError::DuplicateParty(p) => write!(f, "duplicate party column: {p}"),
            NormalizeError::ReservedPartyName(p) => {
                write!(f, "party column {p} collides with the no-winner label")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NormalizeError {}

/// Largest decimal cell accepted; `f64` stops representing every integer above it.
pub const MAX_DECIMAL_CELL: f64 = 9_007_199_254_740_992.0; // 2^53

/// Outcome of parsing one vote cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Exact(u64),
    Truncated(u64),
    Blank,
    Coerced,
}

impl Cell {
    #[inline]
    pub fn votes(self) -> u64 {
        match self {
            Cell::Exact(v) | Cell::Truncated(v) => v,
            Cell::Blank | Cell::Coerced => 0,
        }
    }
}

/// Parse a single vote cell.
pub fn parse_cell(raw: &str) -> Cell {
    let s = raw.trim();
    if s.is_empty() {
        return Cell::Blank;
    }
    if let Ok(v) = s.parse::<u64>() {
        return Cell::Exact(v);
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 && x < MAX_DECIMAL_CELL => {
            let v = x as u64;
            if (v as f64) == x { Cell::Exact(v) } else { Cell::Truncated(v) }
        }
        _ => Cell::Coerced,
    }
}

/// Normalize a raw table.
///
/// `reserved_label` is the configured no-winner label; no party column may use it.
pub fn normalize(
    raw: &RawTable,
    metadata_columns: &[String],
    reserved_label: &str,
) -> Result<(VoteTable, NormalizeReport), NormalizeError> {
    let meta_set: BTreeSet<&str> = metadata_columns.iter().map(|c| c.trim()).collect();
    let mut report = NormalizeReport::default();

    // Classify header positions.
    let mut meta_cols: Vec<(usize, String)> = Vec::new();
    let mut party_cols: Vec<usize> = Vec::new();
    let mut parties: Vec<PartyId> = Vec::new();
    let mut seen: BTreeSet<PartyId> = BTreeSet::new();

    for (i, h) in raw.headers.iter().enumerate() {
        let name = h.trim();
        if name.is_empty() {
            report.dropped_columns.push(i);
            continue;
        }
        if meta_set.contains(name) {
            meta_cols.push((i, name.to_string()));
            continue;
        }
        let party = name.parse::<PartyId>().map_err(|reason| NormalizeError::InvalidPartyHeader {
            column: i,
            header: h.clone(),
            reason,
        })?;
        if party.as_str() == reserved_label {
            return Err(NormalizeError::ReservedPartyName(party));
        }
        if !seen.insert(party.clone()) {
            return Err(NormalizeError::DuplicateParty(party));
        }
        party_cols.push(i);
        parties.push(party);
    }

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut table_total: u64 = 0;
    for cells in &raw.rows {
        if cells.len() < raw.headers.len() {
            report.short_rows += 1;
        }
        let cell_at = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");

        let mut meta = BTreeMap::new();
        for (i, name) in &meta_cols {
            meta.insert(name.clone(), cell_at(*i).trim().to_string());
        }

        let mut votes = Vec::with_capacity(party_cols.len());
        for &i in &party_cols {
            let mut c = parse_cell(cell_at(i));
            match table_total.checked_add(c.votes()) {
                Some(t) => table_total = t,
                None => {
                    report.overflow_cells += 1;
                    c = Cell::Coerced;
                }
            }
            match c {
                Cell::Blank => report.blank_cells += 1,
                Cell::Coerced => report.coerced_cells += 1,
                Cell::Truncated(_) => report.truncated_cells += 1,
                Cell::Exact(_) => {}
            }
            votes.push(c.votes());
        }
        rows.push(VoteRow { meta, votes });
    }

    if report.overflow_cells > 0 {
        warn!("normalize: {} vote cell(s) would overflow the table total; set to 0", report.overflow_cells);
    }
    if report.coerced_cells > 0 {
        warn!("normalize: {} malformed vote cell(s) coerced to 0", report.coerced_cells);
    }
    if report.truncated_cells > 0 {
        warn!("normalize: {} decimal vote cell(s) truncated", report.truncated_cells);
    }
    debug!(
        "normalize: {} rows, {} party columns, {} metadata columns, {} blank headers dropped",
        rows.len(),
        parties.len(),
        meta_cols.len(),
        report.dropped_columns.len()
    );

    Ok((VoteTable { parties, rows }, report))
}

// ----------------------------- Tests -----------------------------
