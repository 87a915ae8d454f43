//! Seat aggregation: constituency + party-list seats → final per-party summary.
//!
//! Contract:
//! - Outer join of both seat maps (missing → 0); only parties with `total > 0` are kept.
//! - Rows are sorted by total ↓, then party name ↑.
//! - Percentages use fixed bases: constituency seats, list seats, house size.
//! - The totals row sums the seat columns and recomputes its own percentages.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use seat_core::rounding::pct;
use seat_core::{PartyId, SeatConfig};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Fixed denominators for percentage columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SeatBases {
    pub constituency_seats: u32,
    pub list_seats: u32,
    pub house_size: u32,
}

impl From<&SeatConfig> for SeatBases {
    fn from(c: &SeatConfig) -> Self {
        Self {
            constituency_seats: c.constituency_seats,
            list_seats: c.list_seats,
            house_size: c.house_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SeatRow {
    pub party: PartyId,
    pub constituency_seats: u32,
    pub party_list_seats: u32,
    pub total_seats: u32,
    pub constituency_pct: f64,
    pub party_list_pct: f64,
    pub total_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SeatTotals {
    pub constituency_seats: u32,
    pub party_list_seats: u32,
    pub total_seats: u32,
    pub constituency_pct: f64,
    pub party_list_pct: f64,
    pub total_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SeatSummary {
    pub bases: SeatBases,
    pub rows: Vec<SeatRow>,
    pub totals: SeatTotals,
    /// Districts with no winner yet (rendered with the no-winner label).
    pub undetermined_districts: u32,
}

impl SeatSummary {
    pub fn row(&self, party: &PartyId) -> Option<&SeatRow> {
        self.rows.iter().find(|r| &r.party == party)
    }

    /// Total seats of a party; 0 when it holds none.
    pub fn total_of(&self, party: &PartyId) -> u32 {
        self.row(party).map(|r| r.total_seats).unwrap_or(0)
    }

    pub fn parties(&self) -> impl Iterator<Item = &PartyId> {
        self.rows.iter().map(|r| &r.party)
    }
}

/// Merge constituency and party-list seat maps into the final summary.
pub fn aggregate_seats(
    constituency: &BTreeMap<PartyId, u32>,
    party_list: &BTreeMap<PartyId, u32>,
    undetermined_districts: u32,
    bases: SeatBases,
) -> SeatSummary {
    let parties: BTreeSet<&PartyId> = constituency.keys().chain(party_list.keys()).collect();

    let mut rows: Vec<SeatRow> = parties
        .into_iter()
        .filter_map(|p| {
            let c = constituency.get(p).copied().unwrap_or(0);
            let l = party_list.get(p).copied().unwrap_or(0);
            let t = c + l;
            (t > 0).then(|| SeatRow {
                party: p.clone(),
                constituency_seats: c,
                party_list_seats: l,
                total_seats: t,
                constituency_pct: pct(c.into(), bases.constituency_seats.into()),
                party_list_pct: pct(l.into(), bases.list_seats.into()),
                total_pct: pct(t.into(), bases.house_size.into()),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_seats
            .cmp(&a.total_seats)
            .then_with(|| a.party.as_str().cmp(b.party.as_str()))
    });

    let c: u32 = rows.iter().map(|r| r.constituency_seats).sum();
    let l: u32 = rows.iter().map(|r| r.party_list_seats).sum();
    let t: u32 = rows.iter().map(|r| r.total_seats).sum();
    let totals = SeatTotals {
        constituency_seats: c,
        party_list_seats: l,
        total_seats: t,
        constituency_pct: pct(c.into(), bases.constituency_seats.into()),
        party_list_pct: pct(l.into(), bases.list_seats.into()),
        total_pct: pct(t.into(), bases.house_size.into()),
    };

    SeatSummary { bases, rows, totals, undetermined_districts }
}

// ----------------------------- Tests -----------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    fn map(v: &[(&str, u32)]) -> BTreeMap<PartyId, u32> {
        v.iter().map(|(p, n)| (pid(p), *n)).collect()
    }

    fn bases() -> SeatBases {
        SeatBases { constituency_seats: 400, list_seats: 100, house_size: 500 }
    }

    #[test]
    fn outer_join_sort_and_filter() {
        let s = aggregate_seats(
            &map(&[("A", 150), ("B", 150), ("C", 100)]),
            &map(&[("A", 40), ("B", 40), ("D", 20), ("E", 0)]),
            0,
            bases(),
        );
        let order: Vec<(&str, u32, u32, u32)> = s
            .rows
            .iter()
            .map(|r| (r.party.as_str(), r.constituency_seats, r.party_list_seats, r.total_seats))
            .collect();
        // A and B tie on 190: name order decides. E has 0 seats and is dropped.
        assert_eq!(
            order,
            vec![("A", 150, 40, 190), ("B", 150, 40, 190), ("C", 100, 0, 100), ("D", 0, 20, 20)]
        );
        assert_eq!(s.totals.total_seats, 500);
        assert_eq!(s.total_of(&pid("E")), 0);
    }

    #[test]
    fn percentages_use_fixed_bases() {
        let s = aggregate_seats(&map(&[("A", 150)]), &map(&[("A", 40)]), 0, bases());
        let a = &s.rows[0];
        assert!((a.constituency_pct - 37.5).abs() < 1e-9);
        assert!((a.party_list_pct - 40.0).abs() < 1e-9);
        assert!((a.total_pct - 38.0).abs() < 1e-9);
    }

    #[test]
    fn totals_row_matches_sum_of_row_percentages() {
        let s = aggregate_seats(
            &map(&[("A", 123), ("B", 77), ("C", 1)]),
            &map(&[("A", 33), ("B", 33), ("C", 34)]),
            199,
            bases(),
        );
        let sum_c: f64 = s.rows.iter().map(|r| r.constituency_pct).sum();
        let sum_l: f64 = s.rows.iter().map(|r| r.party_list_pct).sum();
        let sum_t: f64 = s.rows.iter().map(|r| r.total_pct).sum();
        assert!((s.totals.constituency_pct - sum_c).abs() < 1e-9);
        assert!((s.totals.party_list_pct - sum_l).abs() < 1e-9);
        assert!((s.totals.total_pct - sum_t).abs() < 1e-9);
        assert_eq!(s.undetermined_districts, 199);
        assert_eq!(s.totals.constituency_seats, 201);
    }

    #[test]
    fn empty_inputs_give_empty_summary() {
        let s = aggregate_seats(&BTreeMap::new(), &BTreeMap::new(), 400, bases());
        assert!(s.rows.is_empty());
        assert_eq!(s.totals.total_seats, 0);
        assert_eq!(s.totals.total_pct, 0.0);
    }
}
