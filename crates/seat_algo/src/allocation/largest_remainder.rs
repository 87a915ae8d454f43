//! Largest Remainder (LR) allocation of party-list seats with a Hare quota.
//!
//! Contract:
//! - `T = Σ votes`, `S = seats`, Hare quota `q = T / S`.
//! - Floors and remainders are exact integers: `base_i = ⌊v_i·S / T⌋`,
//!   `rem_i = v_i·S mod T` (u128). Comparing `rem_i` is comparing `v_i/q − base_i`.
//! - Leftover seats `S − Σ base` go one each to the largest remainders;
//!   ties go to the party listed first (canonical column order).
//! - `T == 0` → every party gets 0 seats, status `NoVotes`.
//! - Postcondition when `T > 0`: `Σ final == S`.
//!
//! The real-valued quota, quotient and remainder are derived for the audit table
//! only; they never influence the allocation.
//!
//! Determinism:
//! - No RNG; ranking is a total order on `(rem ↓, column index ↑)`.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt;

use log::{debug, error};
use seat_core::PartyId;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// `seats == 0`.
    NoSeats,
    /// The same party appears twice in the input.
    DuplicateParty(PartyId),
    /// National total does not fit in `u64`.
    TotalOverflow,
    /// Seats handed out differ from the seats to fill.
    InvariantViolated { expected: u32, allocated: u64 },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::NoSeats => write!(f, "no seats to allocate"),
            AllocError::DuplicateParty(p) => write!(f, "duplicate party in allocation input: {p}"),
            AllocError::TotalOverflow => write!(f, "national vote total overflows u64"),
            AllocError::InvariantViolated { expected, allocated } => {
                write!(f, "allocated {allocated} seats, expected {expected}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AllocError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ListStatus {
    Allocated,
    NoVotes,
}

/// One line of the party-list calculation table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ListRow {
    pub party: PartyId,
    pub votes: u64,
    pub quotient: f64,
    pub base_seats: u32,
    pub remainder: f64,
    /// Exact remainder numerator `v·S mod T` (ranking key).
    pub remainder_num: u64,
    pub extra_seat: bool,
    pub final_seats: u32,
}

/// Full party-list outcome, rows in input (canonical) order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ListAllocation {
    pub seats: u32,
    pub national_total: u64,
    /// Votes per seat (`T / S`); 0 when `NoVotes`.
    pub quota: f64,
    pub extra_seats_needed: u32,
    pub status: ListStatus,
    pub rows: Vec<ListRow>,
}

impl ListAllocation {
    /// `party -> final seats`, including parties with zero seats.
    pub fn seats_by_party(&self) -> BTreeMap<PartyId, u32> {
        self.rows.iter().map(|r| (r.party.clone(), r.final_seats)).collect()
    }

    pub fn seats_of(&self, party: &PartyId) -> u32 {
        self.rows
            .iter()
            .find(|r| &r.party == party)
            .map(|r| r.final_seats)
            .unwrap_or(0)
    }

    pub fn allocated(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.final_seats)).sum()
    }
}

/// Allocate `seats` among `votes` (party, national votes), in canonical order.
pub fn allocate_largest_remainder(
    seats: u32,
    votes: &[(PartyId, u64)],
) -> Result<ListAllocation, AllocError> {
    if seats == 0 {
        return Err(AllocError::NoSeats);
    }
    let mut seen: BTreeSet<&PartyId> = BTreeSet::new();
    for (p, _) in votes {
        if !seen.insert(p) {
            return Err(AllocError::DuplicateParty(p.clone()));
        }
    }

    let total: u128 = votes.iter().map(|(_, v)| u128::from(*v)).sum();
    let national_total = u64::try_from(total).map_err(|_| AllocError::TotalOverflow)?;

    if total == 0 {
        debug!("largest_remainder: no list votes; {seats} seats unallocated");
        let rows = votes
            .iter()
            .map(|(p, v)| ListRow {
                party: p.clone(),
                votes: *v,
                quotient: 0.0,
                base_seats: 0,
                remainder: 0.0,
                remainder_num: 0,
                extra_seat: false,
                final_seats: 0,
            })
            .collect();
        return Ok(ListAllocation {
            seats,
            national_total: 0,
            quota: 0.0,
            extra_seats_needed: 0,
            status: ListStatus::NoVotes,
            rows,
        });
    }

    let s = u128::from(seats);
    let t = total;

    // Floors and exact remainders. base_i <= S since v_i <= T.
    let mut rows: Vec<ListRow> = Vec::with_capacity(votes.len());
    let mut sum_base: u128 = 0;
    for (p, v) in votes {
        let scaled = u128::from(*v) * s;
        let base = scaled / t;
        let rem = scaled % t;
        sum_base += base;
        rows.push(ListRow {
            party: p.clone(),
            votes: *v,
            quotient: scaled as f64 / t as f64,
            base_seats: base as u32,
            remainder: rem as f64 / t as f64,
            remainder_num: rem as u64,
            extra_seat: false,
            final_seats: base as u32,
        });
    }

    let extra_needed = s.saturating_sub(sum_base) as u32;
    distribute_leftovers(extra_needed, &mut rows);

    let allocated: u64 = rows.iter().map(|r| u64::from(r.final_seats)).sum();
    debug_assert_eq!(allocated, u64::from(seats));
    if allocated != u64::from(seats) {
        error!("largest_remainder: allocated {allocated} of {seats} seats");
        return Err(AllocError::InvariantViolated { expected: seats, allocated });
    }

    debug!(
        "largest_remainder: T={national_total} S={seats} base={sum_base} extra={extra_needed}"
    );

    Ok(ListAllocation {
        seats,
        national_total,
        quota: t as f64 / s as f64,
        extra_seats_needed: extra_needed,
        status: ListStatus::Allocated,
        rows,
    })
}

/// Give one extra seat to each of the `extra` largest remainders
/// (remainder ↓, then column index ↑). Zero remainders never qualify.
fn distribute_leftovers(extra: u32, rows: &mut [ListRow]) {
    if extra == 0 {
        return;
    }
    let mut ranking: Vec<(usize, u64)> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.remainder_num > 0)
        .map(|(i, r)| (i, r.remainder_num))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    for &(i, _) in ranking.iter().take(extra as usize) {
        rows[i].extra_seat = true;
        rows[i].final_seats += 1;
    }
}

// ----------------------------- Tests -----------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use proptest::prelude::*;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    fn input(v: &[(&str, u64)]) -> Vec<(PartyId, u64)> {
        v.iter().map(|(p, n)| (pid(p), *n)).collect()
    }

    fn finals(a: &ListAllocation) -> Vec<u32> {
        a.rows.iter().map(|r| r.final_seats).collect()
    }

    #[test]
    fn three_party_example() {
        // T=1000, S=100: quotients 45.0 / 35.5 / 19.5 → base 45/35/19, one seat left.
        let a = allocate_largest_remainder(100, &input(&[("A", 450), ("B", 355), ("C", 195)])).unwrap();
        assert_eq!(a.quota, 10.0);
        assert_eq!(a.extra_seats_needed, 1);
        // B and C both have remainder .5; B is listed first.
        assert_eq!(finals(&a), vec![45, 36, 19]);
        assert!(a.rows[1].extra_seat);
        assert!(!a.rows[2].extra_seat);
        assert_eq!(a.rows[1].remainder_num, a.rows[2].remainder_num);
    }

    fn bases(a: &ListAllocation) -> Vec<u32> {
        a.rows.iter().map(|r| r.base_seats).collect()
    }

    #[test]
    fn five_three_two_million_over_100() {
        let a = allocate_largest_remainder(
            100,
            &input(&[("A", 5_000_000), ("B", 3_000_000), ("C", 2_000_000)]),
        )
        .unwrap();
        assert_eq!(a.national_total, 10_000_000);
        assert_eq!(a.quota, 100_000.0);
        assert_eq!(bases(&a), vec![50, 30, 20]);
        assert_eq!(a.extra_seats_needed, 0);
        assert_eq!(finals(&a), vec![50, 30, 20]);
    }

    #[test]
    fn one_leftover_goes_to_largest_remainder() {
        // Quotients 3.4 / 3.3 / 3.3.
        let a = allocate_largest_remainder(10, &input(&[("A", 340), ("B", 330), ("C", 330)])).unwrap();
        assert_eq!(a.quota, 100.0);
        assert_eq!(bases(&a), vec![3, 3, 3]);
        assert_eq!(a.extra_seats_needed, 1);
        assert_eq!(finals(&a), vec![4, 3, 3]);
        let extras: Vec<bool> = a.rows.iter().map(|r| r.extra_seat).collect();
        assert_eq!(extras, vec![true, false, false]);
    }

    #[test]
    fn equal_parties_tie_to_first_column() {
        // Quotients 1.5 / 1.5; the single leftover seat goes to A on every run.
        let v = input(&[("A", 200), ("B", 200)]);
        let first = allocate_largest_remainder(3, &v).unwrap();
        assert!((first.quota - 400.0 / 3.0).abs() < 1e-9);
        assert_eq!(bases(&first), vec![1, 1]);
        assert_eq!(first.extra_seats_needed, 1);
        assert_eq!(finals(&first), vec![2, 1]);
        for _ in 0..10 {
            assert_eq!(allocate_largest_remainder(3, &v).unwrap(), first);
        }
    }

    #[test]
    fn exact_division_needs_no_extras() {
        let a = allocate_largest_remainder(100, &input(&[("A", 600), ("B", 400)])).unwrap();
        assert_eq!(a.extra_seats_needed, 0);
        assert_eq!(finals(&a), vec![60, 40]);
        assert!(a.rows.iter().all(|r| !r.extra_seat && r.remainder == 0.0));
    }

    #[test]
    fn small_parties_can_win_on_remainders() {
        // 3 seats, T=10: A 7 → 2.1, B 2 → 0.6, C 1 → 0.3
        let a = allocate_largest_remainder(3, &input(&[("A", 7), ("B", 2), ("C", 1)])).unwrap();
        assert_eq!(finals(&a), vec![2, 1, 0]);
        assert_eq!(a.seats_of(&pid("B")), 1);
    }

    #[test]
    fn zero_vote_party_gets_nothing() {
        let a = allocate_largest_remainder(100, &input(&[("A", 1), ("Z", 0), ("B", 2)])).unwrap();
        assert_eq!(a.seats_of(&pid("Z")), 0);
        assert_eq!(a.allocated(), 100);
    }

    #[test]
    fn all_zero_is_no_votes() {
        let a = allocate_largest_remainder(100, &input(&[("A", 0), ("B", 0)])).unwrap();
        assert_eq!(a.status, ListStatus::NoVotes);
        assert_eq!(a.allocated(), 0);
        assert_eq!(a.quota, 0.0);
        let empty = allocate_largest_remainder(100, &[]).unwrap();
        assert_eq!(empty.status, ListStatus::NoVotes);
    }

    #[test]
    fn errors() {
        assert_eq!(allocate_largest_remainder(0, &input(&[("A", 5)])), Err(AllocError::NoSeats));
        assert_eq!(
            allocate_largest_remainder(5, &input(&[("A", 5), ("A", 1)])),
            Err(AllocError::DuplicateParty(pid("A")))
        );
        assert_eq!(
            allocate_largest_remainder(5, &input(&[("A", u64::MAX), ("B", 1)])),
            Err(AllocError::TotalOverflow)
        );
    }

    #[test]
    fn tie_break_is_stable_across_runs() {
        let v = input(&[("A", 1), ("B", 1), ("C", 1)]);
        let first = allocate_largest_remainder(2, &v).unwrap();
        for _ in 0..10 {
            assert_eq!(allocate_largest_remainder(2, &v).unwrap(), first);
        }
        assert_eq!(finals(&first), vec![1, 1, 0]);
    }

    fn arb_votes() -> impl Strategy<Value = Vec<(PartyId, u64)>> {
        prop::collection::vec(0u64..5_000_000, 1..12).prop_map(|vs| {
            vs.into_iter()
                .enumerate()
                .map(|(i, v)| (("P".to_string() + &i.to_string()).parse().unwrap(), v))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn sum_equals_seats(votes in arb_votes(), seats in 1u32..600) {
            let a = allocate_largest_remainder(seats, &votes).unwrap();
            if a.national_total > 0 {
                prop_assert_eq!(a.allocated(), u64::from(seats));
            } else {
                prop_assert_eq!(a.allocated(), 0);
            }
            for r in &a.rows {
                prop_assert!(r.final_seats == r.base_seats || r.final_seats == r.base_seats + 1);
                if r.votes == 0 { prop_assert_eq!(r.final_seats, 0); }
            }
        }

        #[test]
        fn more_votes_never_fewer_seats(votes in arb_votes(), seats in 1u32..200, bump in 1u64..100_000, which in 0usize..12) {
            let i = which % votes.len();
            let before = allocate_largest_remainder(seats, &votes).unwrap();
            let mut grown = votes.clone();
            grown[i].1 += bump;
            let after = allocate_largest_remainder(seats, &grown).unwrap();
            prop_assert!(after.rows[i].final_seats >= before.rows[i].final_seats);
        }

        #[test]
        fn idempotent(votes in arb_votes(), seats in 1u32..200) {
            prop_assert_eq!(
                allocate_largest_remainder(seats, &votes).unwrap(),
                allocate_largest_remainder(seats, &votes).unwrap()
            );
        }
    }
}
