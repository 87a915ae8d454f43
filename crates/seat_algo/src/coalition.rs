//! Coalition evaluation against the majority thresholds.
//!
//! Classification, evaluated in order:
//! - `total ≥ majority`         → `MajoritySecured`
//! - `total ≥ simple_majority`  → `HouseMajorityInsufficient`
//! - otherwise                  → `Minority`

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use seat_core::{PartyId, SeatConfig};

use crate::aggregate::SeatSummary;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Thresholds {
    pub majority: u32,
    pub simple_majority: u32,
}

impl From<&SeatConfig> for Thresholds {
    fn from(c: &SeatConfig) -> Self {
        Self { majority: c.majority_threshold, simple_majority: c.simple_majority_threshold }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CoalitionStatus {
    MajoritySecured,
    HouseMajorityInsufficient,
    Minority,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CoalitionMember {
    pub party: PartyId,
    pub seats: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CoalitionReport {
    /// Seated members, in selection order.
    pub members: Vec<CoalitionMember>,
    /// Selected parties holding no seats (or unknown).
    pub unseated: Vec<PartyId>,
    pub total_seats: u32,
    pub status: CoalitionStatus,
    pub thresholds: Thresholds,
    pub short_of_majority: u32,
    pub short_of_simple_majority: u32,
}

#[inline]
pub fn classify(total: u32, t: Thresholds) -> CoalitionStatus {
    if total >= t.majority {
        CoalitionStatus::MajoritySecured
    } else if total >= t.simple_majority {
        CoalitionStatus::HouseMajorityInsufficient
    } else {
        CoalitionStatus::Minority
    }
}

/// Sum the seats of the (deduplicated) selection and classify the result.
pub fn evaluate_coalition(
    summary: &SeatSummary,
    selection: &[PartyId],
    thresholds: Thresholds,
) -> CoalitionReport {
    let mut seen: BTreeSet<&PartyId> = BTreeSet::new();
    let mut members = Vec::new();
    let mut unseated = Vec::new();

    for p in selection {
        if !seen.insert(p) {
            continue;
        }
        match summary.total_of(p) {
            0 => unseated.push(p.clone()),
            seats => members.push(CoalitionMember { party: p.clone(), seats }),
        }
    }

    let total_seats: u32 = members.iter().map(|m| m.seats).sum();
    CoalitionReport {
        status: classify(total_seats, thresholds),
        short_of_majority: thresholds.majority.saturating_sub(total_seats),
        short_of_simple_majority: thresholds.simple_majority.saturating_sub(total_seats),
        members,
        unseated,
        total_seats,
        thresholds,
    }
}

// ----------------------------- Tests -----------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_seats, SeatBases};
    use alloc::collections::BTreeMap;
    use alloc::vec;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    fn t() -> Thresholds {
        Thresholds { majority: 376, simple_majority: 251 }
    }

    fn summary() -> SeatSummary {
        let c: BTreeMap<PartyId, u32> =
            [(pid("A"), 250), (pid("B"), 100), (pid("C"), 50)].into_iter().collect();
        let l: BTreeMap<PartyId, u32> =
            [(pid("A"), 50), (pid("B"), 40), (pid("C"), 10)].into_iter().collect();
        aggregate_seats(&c, &l, 0, SeatBases { constituency_seats: 400, list_seats: 100, house_size: 500 })
    }

    #[test]
    fn thresholds_of_a_500_seat_house() {
        assert_eq!(classify(400, t()), CoalitionStatus::MajoritySecured);
        assert_eq!(classify(376, t()), CoalitionStatus::MajoritySecured);
        assert_eq!(classify(375, t()), CoalitionStatus::HouseMajorityInsufficient);
        assert_eq!(classify(300, t()), CoalitionStatus::HouseMajorityInsufficient);
        assert_eq!(classify(251, t()), CoalitionStatus::HouseMajorityInsufficient);
        assert_eq!(classify(250, t()), CoalitionStatus::Minority);
        assert_eq!(classify(200, t()), CoalitionStatus::Minority);
    }

    #[test]
    fn evaluates_selection() {
        let s = summary();
        let r = evaluate_coalition(&s, &[pid("A"), pid("B"), pid("A")], t());
        assert_eq!(r.total_seats, 440);
        assert_eq!(r.status, CoalitionStatus::MajoritySecured);
        assert_eq!(r.members.len(), 2);
        assert_eq!(r.short_of_majority, 0);

        let r = evaluate_coalition(&s, &[pid("B"), pid("C"), pid("Nobody")], t());
        assert_eq!(r.total_seats, 200);
        assert_eq!(r.status, CoalitionStatus::Minority);
        assert_eq!(r.unseated, vec![pid("Nobody")]);
        assert_eq!(r.short_of_majority, 176);
        assert_eq!(r.short_of_simple_majority, 51);
    }

    #[test]
    fn empty_selection_is_minority() {
        let r = evaluate_coalition(&summary(), &[], t());
        assert_eq!(r.total_seats, 0);
        assert_eq!(r.status, CoalitionStatus::Minority);
    }
}
