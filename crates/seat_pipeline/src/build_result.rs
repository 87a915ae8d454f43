//! BUILD_RESULT: content-addressed identifiers for a run.
//!
//! - `input_digest` = sha256 of the canonical JSON of inputs + run options.
//! - `result_id` = `RES:` + sha256 of the canonical JSON of the computed outputs
//!   (status, summary, districts, party-list table, provinces, roster).
//!
//! Both are stable across runs, platforms and field declaration order.

use serde::Serialize;

use seat_algo::{ListAllocation, ProvinceResult, SeatEntry, SeatSummary};
use seat_core::{DistrictResult, ResultId, Sha256};
use seat_io::hasher;

use crate::{DataStatus, PipelineError, PipelineInputs, RunOptions};

/// Hashed view of the computed outputs.
#[derive(Serialize)]
pub struct ResultContent<'a> {
    pub status: DataStatus,
    pub summary: &'a SeatSummary,
    pub districts: &'a [DistrictResult],
    pub party_list: &'a ListAllocation,
    pub provinces: &'a [ProvinceResult],
    pub roster: &'a [SeatEntry],
}

pub fn result_id(content: &ResultContent<'_>) -> Result<ResultId, PipelineError> {
    Ok(hasher::res_id_from_canonical(content)?)
}

pub fn input_digest(inputs: &PipelineInputs, opts: &RunOptions) -> Result<Sha256, PipelineError> {
    #[derive(Serialize)]
    struct Keyed<'a> {
        inputs: &'a PipelineInputs,
        options: &'a RunOptions,
    }
    let hex = hasher::sha256_canonical(&Keyed { inputs, options: opts })?;
    hex.parse::<Sha256>()
        .map_err(|e| PipelineError::Build(format!("bad input digest: {e}")))
}
