//! TABULATE stage: normalize the district table, resolve each district's winner,
//! apply the region filter and count constituency seats. Integer-only; no RNG.

use log::{debug, warn};

use seat_algo::{count_seats, filter_regions, normalize, resolve_districts, ConstituencyTally, NormalizeReport};
use seat_core::{DistrictResult, RawTable, SeatConfig, VoteTable};

use crate::PipelineError;

/// Output of the district side of the pipeline.
#[derive(Clone, Debug)]
pub struct Tabulated {
    pub table: VoteTable,
    pub report: NormalizeReport,
    /// Districts kept by the region filter, input order.
    pub districts: Vec<DistrictResult>,
    pub tally: ConstituencyTally,
}

/// Normalize one raw table with the configured metadata columns.
/// Coerced cells are logged, never fatal.
pub fn normalize_table(
    which: &'static str,
    raw: &RawTable,
    cfg: &SeatConfig,
) -> Result<(VoteTable, NormalizeReport), PipelineError> {
    let (table, report) = normalize(raw, &cfg.metadata_columns, &cfg.no_winner_label)
        .map_err(|source| PipelineError::Normalize { table: which, source })?;
    if !report.is_clean() {
        warn!(
            "{which}: {} cell(s) coerced to 0, {} decimal cell(s) truncated",
            report.coerced_cells, report.truncated_cells
        );
    }
    if table.parties.is_empty() {
        warn!("{which}: no party columns found");
    }
    Ok((table, report))
}

pub fn tabulate_districts(
    raw: &RawTable,
    cfg: &SeatConfig,
    regions: &[String],
) -> Result<Tabulated, PipelineError> {
    let (table, report) = normalize_table("districts", raw, cfg)?;
    let all = resolve_districts(&table, &cfg.columns);
    let districts = filter_regions(&all, regions);
    if districts.len() != all.len() {
        debug!("tabulate: region filter kept {} of {} districts", districts.len(), all.len());
    }
    let tally = count_seats(&districts);
    Ok(Tabulated { table, report, districts, tally })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_core::Winner;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    fn raw() -> RawTable {
        RawTable::new(
            s(&["Constituency_ID", "Province (English)", "Region", "District", "A", "B"]),
            vec![
                s(&["1", "Bangkok", "Central", "Phra Nakhon", "10", "20"]),
                s(&["2", "Nan", "North", "Mueang", "5", "abc"]),
                s(&["3", "Nan", "North", "Pua", "", ""]),
            ],
        )
    }

    #[test]
    fn resolves_and_counts() {
        let t = tabulate_districts(&raw(), &SeatConfig::default(), &[]).unwrap();
        assert_eq!(t.districts.len(), 3);
        assert_eq!(t.report.coerced_cells, 1);
        assert_eq!(t.tally.resolved, 2);
        assert_eq!(t.tally.undetermined, 1);
        assert_eq!(t.districts[2].winner, Winner::Undetermined);
        assert_eq!(t.districts[0].province, "Bangkok");
    }

    #[test]
    fn region_filter_limits_counting() {
        let t = tabulate_districts(&raw(), &SeatConfig::default(), &s(&["North"])).unwrap();
        assert_eq!(t.districts.len(), 2);
        assert_eq!(t.tally.resolved, 1);
        assert_eq!(t.tally.seats.len(), 1);
    }

    #[test]
    fn sentinel_named_column_is_rejected() {
        let mut r = raw();
        r.headers[5] = "NO INFORMATION YET".into();
        let err = tabulate_districts(&r, &SeatConfig::default(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Normalize { table: "districts", .. }));
    }
}
