//! seat_pipeline: deterministic pipeline surface
//! (normalize → resolve districts → allocate list seats → aggregate → provinces → roster → validate → id).
//!
//! This crate performs no file I/O of its own; loading goes through `seat_io`,
//! seat math through `seat_algo`. Every stage is a pure function of the inputs.

use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use seat_algo::{
    aggregate_seats, build_roster, province_breakdown, AllocError, CoalitionReport,
    ConstituencyTally, ListAllocation, ListStatus, NormalizeError, NormalizeReport,
    ProvinceResult, SeatBases, SeatEntry, SeatSummary, Thresholds,
};
use seat_core::{ConfigError, DistrictResult, PartyId, RawTable, ResultId, SeatConfig, Sha256};
use seat_io::loader::{self, LoadedInputs};
use seat_io::IoError;

pub mod allocate;
pub mod build_result;
pub mod memo;
pub mod tabulate;
pub mod validate;

pub use memo::{Memo, DEFAULT_MEMO_CAPACITY};
pub use validate::{Severity, ValidationIssue, ValidationReport};

/// In-memory inputs of one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineInputs {
    pub districts: RawTable,
    pub party_list: RawTable,
    pub config: SeatConfig,
}

impl From<LoadedInputs> for PipelineInputs {
    fn from(l: LoadedInputs) -> Self {
        Self { districts: l.districts, party_list: l.party_list, config: l.config }
    }
}

/// Caller choices that change what is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOptions {
    /// Count only districts in these regions. Empty keeps all.
    pub regions: Vec<String>,
}

/// How complete the underlying data is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    /// Every district resolved and list seats allocated.
    Complete,
    /// Some districts still undetermined or no list votes yet.
    Partial,
    /// Nothing resolved and no list votes.
    NoData,
}

/// Everything one run produces. Either complete and consistent, or not returned at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutputs {
    pub result_id: ResultId,
    /// sha256 of the canonical inputs + options.
    pub input_digest: Sha256,
    pub status: DataStatus,
    pub summary: SeatSummary,
    pub constituency: ConstituencyTally,
    pub districts: Vec<DistrictResult>,
    pub party_list: ListAllocation,
    pub provinces: Vec<ProvinceResult>,
    pub roster: Vec<SeatEntry>,
    pub district_report: NormalizeReport,
    pub party_list_report: NormalizeReport,
    pub validation: ValidationReport,
    pub config: SeatConfig,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{table} table: {source}")]
    Normalize {
        table: &'static str,
        #[source]
        source: NormalizeError,
    },
    #[error("party-list allocation: {0}")]
    Allocate(#[from] AllocError),
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("build: {0}")]
    Build(String),
}

impl PipelineError {
    /// Configuration or input-shape problem (as opposed to an engine fault or I/O).
    pub fn is_validation(&self) -> bool {
        match self {
            PipelineError::Config(_) | PipelineError::Normalize { .. } => true,
            PipelineError::Allocate(e) => !matches!(e, AllocError::InvariantViolated { .. }),
            PipelineError::Io(e) => matches!(
                e,
                IoError::Json { .. } | IoError::Csv(_) | IoError::Manifest(_) | IoError::Config(_) | IoError::Invalid(_)
            ),
            PipelineError::Invariant(_) | PipelineError::Build(_) => false,
        }
    }
}

// -------------------------------------- Public API --------------------------------------

/// Run every stage over preloaded inputs.
pub fn run(inputs: &PipelineInputs, opts: &RunOptions) -> Result<PipelineOutputs, PipelineError> {
    let cfg = &inputs.config;
    cfg.validate()?;
    let input_digest = build_result::input_digest(inputs, opts)?;

    // --- TABULATE ---
    let tab = tabulate::tabulate_districts(&inputs.districts, cfg, &opts.regions)?;

    // --- ALLOCATE ---
    let list = allocate::allocate_party_list(&inputs.party_list, cfg)?;

    // --- AGGREGATE ---
    let summary = aggregate_seats(
        &tab.tally.seats,
        &list.allocation.seats_by_party(),
        tab.tally.undetermined,
        SeatBases::from(cfg),
    );

    // --- PROVINCES / ROSTER ---
    let provinces = province_breakdown(&tab.districts, &tab.table.order());
    let roster = build_roster(&summary, &tab.districts);

    // --- VALIDATE ---
    let validation = validate::check_outputs(&validate::OutputsView {
        config: cfg,
        district_parties: &tab.table.parties,
        tally: &tab.tally,
        list: &list.allocation,
        summary: &summary,
        roster: &roster,
    });
    validation.ensure_pass()?;

    let status = data_status(&tab.tally, list.allocation.status);

    // --- BUILD_RESULT ---
    let result_id = build_result::result_id(&build_result::ResultContent {
        status,
        summary: &summary,
        districts: &tab.districts,
        party_list: &list.allocation,
        provinces: &provinces,
        roster: &roster,
    })?;

    info!(
        "pipeline: {} seats ({} constituency, {} list), {} undetermined district(s), {result_id}",
        summary.totals.total_seats,
        summary.totals.constituency_seats,
        summary.totals.party_list_seats,
        summary.undetermined_districts
    );

    Ok(PipelineOutputs {
        result_id,
        input_digest,
        status,
        summary,
        constituency: tab.tally,
        districts: tab.districts,
        party_list: list.allocation,
        provinces,
        roster,
        district_report: tab.report,
        party_list_report: list.report,
        validation,
        config: cfg.clone(),
    })
}

/// Convenience entry: load a manifest via `seat_io`, then run.
pub fn run_from_manifest_path<P: AsRef<Path>>(
    path: P,
    opts: &RunOptions,
) -> Result<PipelineOutputs, PipelineError> {
    let loaded = loader::load_inputs_from_manifest(path.as_ref())?;
    debug!("pipeline: inputs {:?}", loaded.digests);
    run(&PipelineInputs::from(loaded), opts)
}

/// Run twice and require identical result ids.
pub fn run_verified(inputs: &PipelineInputs, opts: &RunOptions) -> Result<PipelineOutputs, PipelineError> {
    let first = run(inputs, opts)?;
    let second = run(inputs, opts)?;
    if first.result_id != second.result_id {
        return Err(PipelineError::Invariant(format!(
            "non-deterministic result: {} vs {}",
            first.result_id, second.result_id
        )));
    }
    Ok(first)
}

/// Evaluate a coalition against the thresholds of the run's config.
pub fn evaluate_coalition(outputs: &PipelineOutputs, selection: &[PartyId]) -> CoalitionReport {
    seat_algo::evaluate_coalition(&outputs.summary, selection, Thresholds::from(&outputs.config))
}

fn data_status(tally: &ConstituencyTally, list: ListStatus) -> DataStatus {
    match (tally.resolved, tally.undetermined, list) {
        (0, _, ListStatus::NoVotes) => DataStatus::NoData,
        (_, 0, ListStatus::Allocated) => DataStatus::Complete,
        _ => DataStatus::Partial,
    }
}
