// crates/seat_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Core IDs and entities used across the algorithm surface
pub use seat_core::{DistrictResult, PartyId, PartyOrder, VoteTable, Winner};

// ----------------------------- Tabulation (public surface) ---------------------------

pub mod normalize;
pub mod constituency;

pub use normalize::{normalize, parse_cell, Cell, NormalizeError, NormalizeReport};
pub use constituency::{
    count_seats, filter_regions, resolve_districts, resolve_row, ConstituencyTally,
};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod largest_remainder;

    pub use largest_remainder::{
        allocate_largest_remainder, AllocError, ListAllocation, ListRow, ListStatus,
    };
}

pub use allocation::{allocate_largest_remainder, AllocError, ListAllocation, ListRow, ListStatus};

// ----------------------------- Summaries ---------------------------------------------

pub mod aggregate;
pub mod coalition;
pub mod province;
pub mod roster;

pub use aggregate::{aggregate_seats, SeatBases, SeatRow, SeatSummary, SeatTotals};
pub use coalition::{
    classify, evaluate_coalition, CoalitionMember, CoalitionReport, CoalitionStatus, Thresholds,
};
pub use province::{province_breakdown, PartySeats, ProvinceResult};
pub use roster::{build_roster, SeatEntry, SeatKind};
