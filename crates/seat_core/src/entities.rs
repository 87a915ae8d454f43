//! crates/seat_core/src/entities.rs
//! Tables and per-district results shared across the engine.
//! Pure types + small accessors. No I/O.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::determinism::PartyOrder;
use crate::ids::{DistrictId, PartyId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A table exactly as read from disk: header cells + string rows.
/// Rows may be shorter or longer than the header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// One row of a normalized table: metadata cells by column name, plus votes
/// aligned with `VoteTable::parties`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoteRow {
    pub meta: BTreeMap<String, String>,
    pub votes: Vec<u64>,
}

impl VoteRow {
    /// Metadata cell, empty when the column is absent.
    #[inline]
    pub fn meta(&self, column: &str) -> &str {
        self.meta.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Normalized table: party columns in header order, every vote a `u64`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoteTable {
    pub parties: Vec<PartyId>,
    pub rows: Vec<VoteRow>,
}

impl VoteTable {
    /// Canonical tie-break order of this table (its party-column order).
    pub fn order(&self) -> PartyOrder {
        PartyOrder::new(self.parties.iter().cloned())
    }

    /// Per-column sums, aligned with `parties`. `None` if any sum overflows `u64`.
    pub fn column_totals(&self) -> Option<Vec<u64>> {
        let mut totals = alloc::vec![0u64; self.parties.len()];
        for row in &self.rows {
            for (t, v) in totals.iter_mut().zip(row.votes.iter()) {
                *t = t.checked_add(*v)?;
            }
        }
        Some(totals)
    }

    /// `(party, national total)` pairs in column order.
    pub fn party_totals(&self) -> Option<Vec<(PartyId, u64)>> {
        let totals = self.column_totals()?;
        Some(self.parties.iter().cloned().zip(totals).collect())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a single district race.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Winner {
    Party(PartyId),
    /// No party received any votes (nothing reported yet).
    Undetermined,
}

impl Winner {
    #[inline]
    pub fn party(&self) -> Option<&PartyId> {
        match self {
            Winner::Party(p) => Some(p),
            Winner::Undetermined => None,
        }
    }

    #[inline]
    pub fn is_undetermined(&self) -> bool {
        matches!(self, Winner::Undetermined)
    }

    /// Display label; `sentinel` is used for `Undetermined`.
    pub fn label<'a>(&'a self, sentinel: &'a str) -> &'a str {
        match self {
            Winner::Party(p) => p.as_str(),
            Winner::Undetermined => sentinel,
        }
    }
}

/// Per-district outcome row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistrictResult {
    pub district_id: DistrictId,
    pub province: String,
    pub region: String,
    pub name: String,
    pub winner: Winner,
    pub winning_votes: u64,
    /// The maximum was shared and resolved by column order.
    pub tied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    #[test]
    fn column_totals_align_with_parties() {
        let t = VoteTable {
            parties: vec![pid("A"), pid("B")],
            rows: vec![
                VoteRow { meta: BTreeMap::new(), votes: vec![10, 0] },
                VoteRow { meta: BTreeMap::new(), votes: vec![5, 7] },
            ],
        };
        assert_eq!(t.column_totals(), Some(vec![15, 7]));
        assert_eq!(t.party_totals(), Some(vec![(pid("A"), 15), (pid("B"), 7)]));
        assert_eq!(t.order().position(&pid("B")), Some(1));
    }

    #[test]
    fn column_totals_report_overflow() {
        let t = VoteTable {
            parties: vec![pid("A")],
            rows: vec![
                VoteRow { meta: BTreeMap::new(), votes: vec![u64::MAX] },
                VoteRow { meta: BTreeMap::new(), votes: vec![1] },
            ],
        };
        assert_eq!(t.column_totals(), None);
        assert_eq!(t.party_totals(), None);
    }

    #[test]
    fn winner_label_uses_sentinel_only_when_undetermined() {
        assert_eq!(Winner::Party(pid("A")).label("NO INFORMATION YET"), "A");
        assert_eq!(Winner::Undetermined.label("NO INFORMATION YET"), "NO INFORMATION YET");
        assert!(Winner::Undetermined.party().is_none());
    }

    #[test]
    fn missing_meta_reads_empty() {
        let r = VoteRow::default();
        assert_eq!(r.meta("Province"), "");
    }
}
