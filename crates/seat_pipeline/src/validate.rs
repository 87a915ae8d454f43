//! crates/seat_pipeline/src/validate.rs
//! Seat-count invariants checked after computation, before a result id is issued.
//! Deterministic outputs; pure integer reasoning.
//!
//! Errors abort the run (`PipelineError::Invariant`); warnings travel with the outputs.

use std::collections::BTreeSet;

use log::{error, warn};
use serde::Serialize;

use seat_algo::{ConstituencyTally, ListAllocation, ListStatus, SeatEntry, SeatSummary};
use seat_core::{PartyId, SeatConfig};

use crate::PipelineError;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    Root,
    Config(&'static str),
    Party(PartyId),
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// Deterministic report: pass = (no Error); ordering of issues is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// `Err` carrying every error message when the report did not pass.
    pub fn ensure_pass(&self) -> Result<(), PipelineError> {
        if self.pass {
            return Ok(());
        }
        let msg = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| format!("{}: {}", i.code, i.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(PipelineError::Invariant(msg))
    }
}

/// Borrowed view of what the checks need.
pub struct OutputsView<'a> {
    pub config: &'a SeatConfig,
    pub district_parties: &'a [PartyId],
    pub tally: &'a ConstituencyTally,
    pub list: &'a ListAllocation,
    pub summary: &'a SeatSummary,
    pub roster: &'a [SeatEntry],
}

/// Top-level entry point.
pub fn check_outputs(v: &OutputsView) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    issues.extend(check_constituency(v));
    issues.extend(check_party_list(v));
    issues.extend(check_rows(v.summary));
    issues.extend(check_roster(v.summary, v.roster));
    issues.extend(check_party_sets(v.district_parties, v.list));

    sort_issues_stably(&mut issues);

    for i in &issues {
        match i.severity {
            Severity::Error => error!("validate: {}: {}", i.code, i.message),
            Severity::Warning => warn!("validate: {}: {}", i.code, i.message),
        }
    }

    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn issue(severity: Severity, code: &'static str, message: String, where_: EntityRef) -> ValidationIssue {
    ValidationIssue { severity, code, message, where_ }
}

/// Σ constituency seats = resolved districts ≤ configured constituency seats.
fn check_constituency(v: &OutputsView) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    let seated = v.summary.totals.constituency_seats;
    if seated != v.tally.resolved {
        out.push(issue(
            Severity::Error,
            "Constituency.SumMismatch",
            format!("{seated} constituency seats for {} resolved districts", v.tally.resolved),
            EntityRef::Root,
        ));
    }
    let districts = v.tally.resolved + v.tally.undetermined;
    if v.tally.resolved > v.config.constituency_seats {
        out.push(issue(
            Severity::Error,
            "Constituency.OverCapacity",
            format!("{} resolved districts exceed {} constituency seats", v.tally.resolved, v.config.constituency_seats),
            EntityRef::Config("constituency_seats"),
        ));
    } else if districts > v.config.constituency_seats {
        out.push(issue(
            Severity::Warning,
            "Constituency.TooManyRows",
            format!("{districts} district rows for {} constituency seats", v.config.constituency_seats),
            EntityRef::Config("constituency_seats"),
        ));
    }
    if v.tally.tied > 0 {
        out.push(issue(
            Severity::Warning,
            "Constituency.TiesByColumnOrder",
            format!("{} district(s) tied, resolved by column order", v.tally.tied),
            EntityRef::Root,
        ));
    }
    out
}

/// Σ list seats = configured list seats whenever there are list votes.
fn check_party_list(v: &OutputsView) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    let seated = u64::from(v.summary.totals.party_list_seats);
    let expected = match v.list.status {
        ListStatus::Allocated => u64::from(v.config.list_seats),
        ListStatus::NoVotes => 0,
    };
    if seated != expected || v.list.allocated() != expected {
        out.push(issue(
            Severity::Error,
            "PartyList.SumMismatch",
            format!("{seated} list seats in summary, {} allocated, {expected} expected", v.list.allocated()),
            EntityRef::Config("list_seats"),
        ));
    }
    out
}

fn check_rows(summary: &SeatSummary) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    for r in &summary.rows {
        if r.total_seats != r.constituency_seats + r.party_list_seats {
            out.push(issue(
                Severity::Error,
                "Summary.RowTotal",
                format!("{} + {} != {}", r.constituency_seats, r.party_list_seats, r.total_seats),
                EntityRef::Party(r.party.clone()),
            ));
        }
        if r.total_seats == 0 {
            out.push(issue(
                Severity::Error,
                "Summary.EmptyRow",
                "party listed with no seats".to_string(),
                EntityRef::Party(r.party.clone()),
            ));
        }
    }
    let t = &summary.totals;
    if t.total_seats != t.constituency_seats + t.party_list_seats {
        out.push(issue(
            Severity::Error,
            "Summary.TotalsRow",
            format!("{} + {} != {}", t.constituency_seats, t.party_list_seats, t.total_seats),
            EntityRef::Root,
        ));
    }
    out
}

fn check_roster(summary: &SeatSummary, roster: &[SeatEntry]) -> Vec<ValidationIssue> {
    if roster.len() as u64 == u64::from(summary.totals.total_seats) {
        return Vec::new();
    }
    vec![issue(
        Severity::Error,
        "Roster.Length",
        format!("{} roster seats for {} total seats", roster.len(), summary.totals.total_seats),
        EntityRef::Root,
    )]
}

/// Parties present in only one of the two tables. Allowed, but worth a note.
fn check_party_sets(district_parties: &[PartyId], list: &ListAllocation) -> Vec<ValidationIssue> {
    let d: BTreeSet<&PartyId> = district_parties.iter().collect();
    let l: BTreeSet<&PartyId> = list.rows.iter().map(|r| &r.party).collect();
    let mut out = Vec::new();
    for p in d.difference(&l) {
        out.push(issue(
            Severity::Warning,
            "Party.NotInPartyList",
            "party has district votes but no party-list column".to_string(),
            EntityRef::Party((*p).clone()),
        ));
    }
    for p in l.difference(&d) {
        out.push(issue(
            Severity::Warning,
            "Party.NotInDistricts",
            "party has a party-list column but no district column".to_string(),
            EntityRef::Party((*p).clone()),
        ));
    }
    out
}

// ------------------------------------------------------------------------------------------------
// Utilities
// ------------------------------------------------------------------------------------------------

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| cmp_where(&a.where_, &b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

fn cmp_where(a: &EntityRef, b: &EntityRef) -> core::cmp::Ordering {
    use core::cmp::Ordering::*;
    use EntityRef::*;
    match (a, b) {
        (Root, Root) => Equal,
        (Root, _) => Less,
        (_, Root) => Greater,
        (Config(ca), Config(cb)) => ca.cmp(cb),
        (Config(_), _) => Less,
        (_, Config(_)) => Greater,
        (Party(pa), Party(pb)) => pa.as_str().cmp(pb.as_str()),
    }
}
