//! Seat roster: one entry per allocated seat, parties in summary order.
//!
//! For each party: its constituency seats (`"<province>, <district>"`, input order),
//! then its party-list seats.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use seat_core::{DistrictResult, PartyId};

use crate::aggregate::SeatSummary;

#[cfg(feature = "serde")]
use serde::Serialize;

pub const PARTY_LIST_INFO: &str = "Party List";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeatKind {
    Constituency,
    PartyList,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SeatEntry {
    pub seat: u32,
    pub party: PartyId,
    pub kind: SeatKind,
    pub info: String,
}

pub fn build_roster(summary: &SeatSummary, districts: &[DistrictResult]) -> Vec<SeatEntry> {
    let mut out: Vec<SeatEntry> = Vec::with_capacity(summary.totals.total_seats as usize);
    let push = |out: &mut Vec<SeatEntry>, party: &PartyId, kind: SeatKind, info: String| {
        let seat = out.len() as u32;
        out.push(SeatEntry { seat, party: party.clone(), kind, info });
    };

    for row in &summary.rows {
        for d in districts.iter().filter(|d| d.winner.party() == Some(&row.party)) {
            push(&mut out, &row.party, SeatKind::Constituency, format!("{}, {}", d.province, d.name));
        }
        for _ in 0..row.party_list_seats {
            push(&mut out, &row.party, SeatKind::PartyList, String::from(PARTY_LIST_INFO));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_seats, SeatBases};
    use crate::constituency::count_seats;
    use alloc::collections::BTreeMap;
    use alloc::vec;
    use seat_core::{DistrictId, Winner};

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    fn d(id: &str, w: Option<&str>) -> DistrictResult {
        DistrictResult {
            district_id: id.parse::<DistrictId>().unwrap(),
            province: "Chiang Mai".into(),
            region: "North".into(),
            name: format!("District {id}"),
            winner: w.map_or(Winner::Undetermined, |p| Winner::Party(pid(p))),
            winning_votes: 1,
            tied: false,
        }
    }

    #[test]
    fn roster_follows_summary_order() {
        let ds = vec![d("1", Some("B")), d("2", Some("A")), d("3", None), d("4", Some("B"))];
        let tally = count_seats(&ds);
        let list: BTreeMap<PartyId, u32> = [(pid("A"), 1), (pid("B"), 0)].into_iter().collect();
        let s = aggregate_seats(
            &tally.seats,
            &list,
            tally.undetermined,
            SeatBases { constituency_seats: 4, list_seats: 1, house_size: 5 },
        );
        let r = build_roster(&s, &ds);
        assert_eq!(r.len() as u32, s.totals.total_seats);
        let got: Vec<(&str, SeatKind, &str)> =
            r.iter().map(|e| (e.party.as_str(), e.kind, e.info.as_str())).collect();
        assert_eq!(
            got,
            vec![
                ("A", SeatKind::Constituency, "Chiang Mai, District 2"),
                ("A", SeatKind::PartyList, "Party List"),
                ("B", SeatKind::Constituency, "Chiang Mai, District 1"),
                ("B", SeatKind::Constituency, "Chiang Mai, District 4"),
            ]
        );
        assert_eq!(r[3].seat, 3);
    }
}
