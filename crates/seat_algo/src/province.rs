//! Per-province breakdown of constituency results.
//!
//! Each province lists the seats won per party (canonical party order) and its
//! dominant party: most districts won, ties by canonical order. A province with
//! no resolved district is dominated by `Winner::Undetermined`.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use seat_core::{DistrictResult, PartyId, PartyOrder, Winner};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PartySeats {
    pub party: PartyId,
    pub seats: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProvinceResult {
    pub province: String,
    pub districts: u32,
    pub undetermined: u32,
    /// Parties with at least one seat, canonical order.
    pub seats: Vec<PartySeats>,
    pub dominant: Winner,
}

/// Group districts by province (ascending name order).
pub fn province_breakdown(districts: &[DistrictResult], order: &PartyOrder) -> Vec<ProvinceResult> {
    #[derive(Default)]
    struct Acc {
        districts: u32,
        undetermined: u32,
        seats: BTreeMap<PartyId, u32>,
    }

    let mut by_province: BTreeMap<&str, Acc> = BTreeMap::new();
    for d in districts {
        let acc = by_province.entry(d.province.as_str()).or_default();
        acc.districts += 1;
        match &d.winner {
            Winner::Party(p) => *acc.seats.entry(p.clone()).or_insert(0) += 1,
            Winner::Undetermined => acc.undetermined += 1,
        }
    }

    by_province
        .into_iter()
        .map(|(name, acc)| {
            let mut seats: Vec<PartySeats> = acc
                .seats
                .into_iter()
                .map(|(party, seats)| PartySeats { party, seats })
                .collect();
            seats.sort_by(|a, b| order.cmp(&a.party, &b.party));

            // First maximum in canonical order.
            let mut dominant: Option<&PartySeats> = None;
            for s in &seats {
                if dominant.map_or(true, |d| s.seats > d.seats) {
                    dominant = Some(s);
                }
            }
            let dominant = match dominant {
                Some(s) => Winner::Party(s.party.clone()),
                None => Winner::Undetermined,
            };

            ProvinceResult {
                province: String::from(name),
                districts: acc.districts,
                undetermined: acc.undetermined,
                seats,
                dominant,
            }
        })
        .collect()
}

// ----------------------------- Tests -----------------------------
