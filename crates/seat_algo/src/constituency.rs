//! Constituency (first-past-the-post) resolution.
//!
//! Contract:
//! - Per district, the winner is the party column with the maximum votes.
//! - Ties go to the first column in canonical order; the district records `tied`.
//! - A district whose maximum is 0 is `Winner::Undetermined` and counts for no party.
//!
//! Determinism: pure scan in column order; no RNG.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::{debug, warn};
use seat_core::{ColumnRoles, DistrictId, DistrictResult, PartyId, VoteTable, Winner};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Seat counts from resolved districts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ConstituencyTally {
    pub seats: BTreeMap<PartyId, u32>,
    /// Districts with a winner.
    pub resolved: u32,
    /// Districts with no votes at all.
    pub undetermined: u32,
    /// Resolved districts whose top count was shared.
    pub tied: u32,
}

impl ConstituencyTally {
    #[inline]
    pub fn seats_of(&self, party: &PartyId) -> u32 {
        self.seats.get(party).copied().unwrap_or(0)
    }
}

/// Resolve one row. Returns `(winner, winning_votes, tied)`.
///
/// `parties` and `votes` are aligned; a shorter `votes` slice reads as zeros.
pub fn resolve_row(parties: &[PartyId], votes: &[u64]) -> (Winner, u64, bool) {
    let mut best: Option<(usize, u64)> = None;
    let mut tied = false;
    for (i, &v) in votes.iter().enumerate().take(parties.len()) {
        match best {
            None => best = Some((i, v)),
            Some((_, m)) if v > m => {
                best = Some((i, v));
                tied = false;
            }
            Some((_, m)) if v == m => tied = true,
            _ => {}
        }
    }
    match best {
        Some((i, m)) if m > 0 => (Winner::Party(parties[i].clone()), m, tied),
        _ => (Winner::Undetermined, 0, false),
    }
}

/// Resolve every district row of a normalized table, in input order.
///
/// The district id comes from the `district_id` role column; rows where it is
/// blank or not a valid id get `row-<n>` (1-based).
pub fn resolve_districts(table: &VoteTable, roles: &ColumnRoles) -> Vec<DistrictResult> {
    let mut out = Vec::with_capacity(table.rows.len());
    for (n, row) in table.rows.iter().enumerate() {
        let (winner, winning_votes, tied) = resolve_row(&table.parties, &row.votes);
        let district_id = row
            .meta(&roles.district_id)
            .parse::<DistrictId>()
            .unwrap_or_else(|_| DistrictId::for_row(n + 1));
        out.push(DistrictResult {
            district_id,
            province: row.meta(&roles.province).to_string(),
            region: row.meta(&roles.region).to_string(),
            name: row.meta(&roles.district_name).to_string(),
            winner,
            winning_votes,
            tied,
        });
    }
    out
}

/// Keep only districts whose region is in `regions`. An empty filter keeps all.
pub fn filter_regions(districts: &[DistrictResult], regions: &[String]) -> Vec<DistrictResult> {
    if regions.is_empty() {
        return districts.to_vec();
    }
    let keep: BTreeSet<&str> = regions.iter().map(|r| r.trim()).collect();
    districts
        .iter()
        .filter(|d| keep.contains(d.region.as_str()))
        .cloned()
        .collect()
}

/// Count constituency seats per party from resolved districts.
pub fn count_seats(districts: &[DistrictResult]) -> ConstituencyTally {
    let mut tally = ConstituencyTally::default();
    for d in districts {
        match &d.winner {
            Winner::Party(p) => {
                *tally.seats.entry(p.clone()).or_insert(0) += 1;
                tally.resolved += 1;
                if d.tied {
                    tally.tied += 1;
                }
            }
            Winner::Undetermined => tally.undetermined += 1,
        }
    }
    if tally.undetermined > 0 {
        warn!("constituency: {} district(s) have no votes yet", tally.undetermined);
    }
    debug!(
        "constituency: {} resolved, {} tied, {} parties seated",
        tally.resolved,
        tally.tied,
        tally.seats.len()
    );
    tally
}

// ----------------------------- Tests -----------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use seat_core::VoteRow;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    fn row(meta: &[(&str, &str)], votes: &[u64]) -> VoteRow {
        VoteRow {
            meta: meta.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            votes: votes.to_vec(),
        }
    }

    #[test]
    fn strict_max_wins() {
        let ps = vec![pid("A"), pid("B"), pid("C")];
        assert_eq!(resolve_row(&ps, &[3, 9, 4]), (Winner::Party(pid("B")), 9, false));
    }

    #[test]
    fn tie_goes_to_first_column_and_is_flagged() {
        let ps = vec![pid("A"), pid("B"), pid("C")];
        for _ in 0..3 {
            assert_eq!(resolve_row(&ps, &[1, 5, 5]), (Winner::Party(pid("B")), 5, true));
        }
        // A later strictly greater value clears an earlier tie.
        assert_eq!(resolve_row(&ps, &[4, 4, 6]), (Winner::Party(pid("C")), 6, false));
    }

    #[test]
    fn all_zero_is_undetermined() {
        let ps = vec![pid("A"), pid("B")];
        assert_eq!(resolve_row(&ps, &[0, 0]), (Winner::Undetermined, 0, false));
        assert_eq!(resolve_row(&ps, &[]), (Winner::Undetermined, 0, false));
        assert_eq!(resolve_row(&[], &[]), (Winner::Undetermined, 0, false));
    }

    #[test]
    fn sentinel_district_counts_for_nobody() {
        let t = VoteTable {
            parties: vec![pid("A"), pid("B")],
            rows: vec![
                row(&[("Constituency_ID", "1"), ("Region", "North")], &[10, 3]),
                row(&[("Constituency_ID", "2"), ("Region", "South")], &[0, 0]),
                row(&[("Constituency_ID", ""), ("Region", "South")], &[2, 8]),
            ],
        };
        let ds = resolve_districts(&t, &ColumnRoles::default());
        assert_eq!(ds.len(), 3);
        assert_eq!(ds[1].winner, Winner::Undetermined);
        assert_eq!(ds[2].district_id.as_str(), "row-3");

        let tally = count_seats(&ds);
        assert_eq!(tally.seats_of(&pid("A")), 1);
        assert_eq!(tally.seats_of(&pid("B")), 1);
        assert_eq!(tally.resolved, 2);
        assert_eq!(tally.undetermined, 1);
        assert_eq!(tally.seats.values().sum::<u32>(), tally.resolved);

        let south = filter_regions(&ds, &["South".to_string()]);
        assert_eq!(south.len(), 2);
        assert_eq!(count_seats(&south).seats_of(&pid("A")), 0);
    }
}
