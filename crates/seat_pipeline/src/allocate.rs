//! ALLOCATE stage: national party-list totals → Largest Remainder seats.
//!
//! The party-list table has one row per district; columns are summed to national
//! totals in the table's own column order, which is the tie-break order here.
//! Its party set may differ from the district table's.

use log::debug;

use seat_algo::{allocate_largest_remainder, ListAllocation, NormalizeReport};
use seat_core::{RawTable, SeatConfig};

use crate::tabulate::normalize_table;
use crate::PipelineError;

#[derive(Clone, Debug)]
pub struct ListOutcome {
    pub allocation: ListAllocation,
    pub report: NormalizeReport,
}

pub fn allocate_party_list(raw: &RawTable, cfg: &SeatConfig) -> Result<ListOutcome, PipelineError> {
    let (table, report) = normalize_table("party_list", raw, cfg)?;
    // Normalization keeps every table total within u64.
    let totals = table
        .party_totals()
        .ok_or_else(|| PipelineError::Invariant("party_list: vote totals overflow u64".into()))?;
    debug!("allocate: {} parties over {} rows", totals.len(), table.rows.len());
    let allocation = allocate_largest_remainder(cfg.list_seats, &totals)?;
    Ok(ListOutcome { allocation, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_algo::ListStatus;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn sums_rows_before_allocating() {
        let raw = RawTable::new(
            s(&["Province", "A", "B", "C"]),
            vec![s(&["x", "300", "200", "0"]), s(&["y", "150", "250", "100"])],
        );
        let out = allocate_party_list(&raw, &SeatConfig::default()).unwrap();
        let a = &out.allocation;
        assert_eq!(a.national_total, 1000);
        assert_eq!(a.seats_of(&"A".parse().unwrap()), 45);
        assert_eq!(a.seats_of(&"B".parse().unwrap()), 45);
        assert_eq!(a.seats_of(&"C".parse().unwrap()), 10);
        assert_eq!(a.allocated(), 100);
    }

    #[test]
    fn empty_table_has_no_votes() {
        let raw = RawTable::new(s(&["Province", "A"]), vec![]);
        let out = allocate_party_list(&raw, &SeatConfig::default()).unwrap();
        assert_eq!(out.allocation.status, ListStatus::NoVotes);
        assert_eq!(out.allocation.allocated(), 0);
    }
}
