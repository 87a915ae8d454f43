//! crates/seat_report/src/model.rs
//! Pure report data model + mapper from pipeline outputs.
//! No I/O, no recomputation. Numbers that need decimals are formatted from
//! integers (`percent_one_decimal`, `fixed_decimal`) so renderers never touch floats.

use serde::Serialize;

use seat_algo::{CoalitionReport, CoalitionStatus, ListStatus, SeatKind};
use seat_core::rounding::percent_one_decimal;
use seat_core::{PartyId, PartyRegistry, Winner};
use seat_pipeline::{DataStatus, PipelineOutputs};

use crate::ReportError;

// -------------------- Model root & sections --------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub cover: Cover,
    pub seats: SeatTable,
    pub districts: Vec<DistrictLine>,
    pub party_list: ListTable,
    pub provinces: Vec<ProvinceLine>,
    pub roster: Vec<RosterLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coalition: Option<CoalitionBlock>,
    pub data_quality: DataQuality,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cover {
    pub title: String,
    pub status: DataStatus,
    pub result_id: String,
    pub input_digest: String,
    pub constituency_seats: u32,
    pub list_seats: u32,
    pub house_size: u32,
    pub majority_threshold: u32,
    pub simple_majority_threshold: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartyDisplay {
    pub id: String,
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatLine {
    pub party: PartyDisplay,
    pub constituency_seats: u32,
    pub party_list_seats: u32,
    pub total_seats: u32,
    pub constituency_pct: String,
    pub party_list_pct: String,
    pub total_pct: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TotalsLine {
    pub constituency_seats: u32,
    pub party_list_seats: u32,
    pub total_seats: u32,
    pub constituency_pct: String,
    pub party_list_pct: String,
    pub total_pct: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatTable {
    pub rows: Vec<SeatLine>,
    pub totals: TotalsLine,
    pub undetermined_districts: u32,
    pub undetermined_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictLine {
    pub district_id: String,
    pub province: String,
    pub region: String,
    pub name: String,
    pub winner: PartyDisplay,
    pub winning_votes: u64,
    pub tied: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListLine {
    pub party: PartyDisplay,
    pub total_votes: u64,
    pub vote_share: String,
    pub quotient: String,
    pub base_seats: u32,
    pub remainder: String,
    pub extra_seat: bool,
    pub final_seats: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListTable {
    pub status: ListStatus,
    pub seats: u32,
    pub national_total: u64,
    /// Votes per seat, four decimals; empty when there are no votes.
    pub quota: String,
    pub extra_seats_needed: u32,
    pub rows: Vec<ListLine>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProvinceLine {
    pub province: String,
    pub districts: u32,
    pub undetermined: u32,
    pub dominant: PartyDisplay,
    /// `"<label>: <seats>"` pairs, canonical party order.
    pub seats: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RosterLine {
    pub seat: u32,
    pub party: PartyDisplay,
    pub kind: SeatKind,
    pub info: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberLine {
    pub party: PartyDisplay,
    pub seats: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoalitionBlock {
    pub members: Vec<MemberLine>,
    pub unseated: Vec<String>,
    pub total_seats: u32,
    pub status: CoalitionStatus,
    pub status_text: String,
    pub short_of_majority: u32,
    pub short_of_simple_majority: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub district_cells_coerced: usize,
    pub party_list_cells_coerced: usize,
    pub tied_districts: u32,
    pub warnings: Vec<String>,
}

// -------------------- Mapping (pure) --------------------

pub fn build_model(
    out: &PipelineOutputs,
    coalition: Option<&CoalitionReport>,
) -> Result<ReportModel, ReportError> {
    let reg = PartyRegistry::from_config(&out.config)?;
    let cfg = &out.config;
    let party = |p: &PartyId| display(&reg, &Winner::Party(p.clone()), p.as_str());
    let winner = |w: &Winner| display(&reg, w, w.label(&cfg.no_winner_label));

    let cover = Cover {
        title: "Parliamentary seat allocation".to_string(),
        status: out.status,
        result_id: out.result_id.to_string(),
        input_digest: out.input_digest.to_string(),
        constituency_seats: cfg.constituency_seats,
        list_seats: cfg.list_seats,
        house_size: cfg.house_size,
        majority_threshold: cfg.majority_threshold,
        simple_majority_threshold: cfg.simple_majority_threshold,
    };

    let b = out.summary.bases;
    let rows = out
        .summary
        .rows
        .iter()
        .map(|r| SeatLine {
            party: party(&r.party),
            constituency_seats: r.constituency_seats,
            party_list_seats: r.party_list_seats,
            total_seats: r.total_seats,
            constituency_pct: pct(r.constituency_seats, b.constituency_seats),
            party_list_pct: pct(r.party_list_seats, b.list_seats),
            total_pct: pct(r.total_seats, b.house_size),
        })
        .collect();
    let t = &out.summary.totals;
    let seats = SeatTable {
        rows,
        totals: TotalsLine {
            constituency_seats: t.constituency_seats,
            party_list_seats: t.party_list_seats,
            total_seats: t.total_seats,
            constituency_pct: pct(t.constituency_seats, b.constituency_seats),
            party_list_pct: pct(t.party_list_seats, b.list_seats),
            total_pct: pct(t.total_seats, b.house_size),
        },
        undetermined_districts: out.summary.undetermined_districts,
        undetermined_label: cfg.no_winner_label.clone(),
    };

    let districts = out
        .districts
        .iter()
        .map(|d| DistrictLine {
            district_id: d.district_id.to_string(),
            province: d.province.clone(),
            region: d.region.clone(),
            name: d.name.clone(),
            winner: winner(&d.winner),
            winning_votes: d.winning_votes,
            tied: d.tied,
        })
        .collect();

    let l = &out.party_list;
    let total = u128::from(l.national_total);
    let party_list = ListTable {
        status: l.status,
        seats: l.seats,
        national_total: l.national_total,
        quota: match l.status {
            ListStatus::Allocated => fixed_decimal(total, u128::from(l.seats), 4).unwrap_or_default(),
            ListStatus::NoVotes => String::new(),
        },
        extra_seats_needed: l.extra_seats_needed,
        rows: l
            .rows
            .iter()
            .map(|r| ListLine {
                party: party(&r.party),
                total_votes: r.votes,
                vote_share: percent_one_decimal(r.votes, l.national_total),
                quotient: fixed_decimal(u128::from(r.votes) * u128::from(l.seats), total, 4)
                    .unwrap_or_else(|| "0.0000".into()),
                base_seats: r.base_seats,
                remainder: fixed_decimal_trunc(u128::from(r.remainder_num), total, 4)
                    .unwrap_or_else(|| "0.0000".into()),
                extra_seat: r.extra_seat,
                final_seats: r.final_seats,
            })
            .collect(),
    };

    let provinces = out
        .provinces
        .iter()
        .map(|p| ProvinceLine {
            province: p.province.clone(),
            districts: p.districts,
            undetermined: p.undetermined,
            dominant: winner(&p.dominant),
            seats: p
                .seats
                .iter()
                .map(|s| format!("{}: {}", party(&s.party).label, s.seats))
                .collect(),
        })
        .collect();

    let roster = out
        .roster
        .iter()
        .map(|s| RosterLine { seat: s.seat, party: party(&s.party), kind: s.kind, info: s.info.clone() })
        .collect();

    let coalition = coalition.map(|c| CoalitionBlock {
        members: c.members.iter().map(|m| MemberLine { party: party(&m.party), seats: m.seats }).collect(),
        unseated: c.unseated.iter().map(|p| p.to_string()).collect(),
        total_seats: c.total_seats,
        status: c.status,
        status_text: status_text(c.status).to_string(),
        short_of_majority: c.short_of_majority,
        short_of_simple_majority: c.short_of_simple_majority,
    });

    let data_quality = DataQuality {
        district_cells_coerced: out.district_report.coerced_cells,
        party_list_cells_coerced: out.party_list_report.coerced_cells,
        tied_districts: out.constituency.tied,
        warnings: out
            .validation
            .warnings()
            .map(|i| format!("{}: {}", i.code, i.message))
            .collect(),
    };

    Ok(ReportModel { cover, seats, districts, party_list, provinces, roster, coalition, data_quality })
}

pub fn status_text(s: CoalitionStatus) -> &'static str {
    match s {
        CoalitionStatus::MajoritySecured => "Majority secured",
        CoalitionStatus::HouseMajorityInsufficient => "House majority, insufficient",
        CoalitionStatus::Minority => "Minority",
    }
}

// -------------------- Helpers (pure; integer formatting) --------------------

fn display(reg: &PartyRegistry, w: &Winner, raw_label: &str) -> PartyDisplay {
    let meta = reg.display(w);
    let label = match w {
        // Unknown parties keep their own name; only the color falls back to Others.
        Winner::Party(p) if !reg.is_known(p) => raw_label.to_string(),
        _ => meta.label.clone(),
    };
    PartyDisplay { id: raw_label.to_string(), label, color: meta.color.clone() }
}

fn pct(num: u32, den: u32) -> String {
    percent_one_decimal(u64::from(num), u64::from(den))
}

/// `num / den` with `places` decimals, rounded half up. `None` when `den == 0`.
pub fn fixed_decimal(num: u128, den: u128, places: u32) -> Option<String> {
    scaled_decimal(num, den, places, true)
}

/// Like [`fixed_decimal`] but truncated toward zero, so a value in `[0, 1)`
/// never renders as `1.0000`.
pub fn fixed_decimal_trunc(num: u128, den: u128, places: u32) -> Option<String> {
    scaled_decimal(num, den, places, false)
}

fn scaled_decimal(num: u128, den: u128, places: u32, half_up: bool) -> Option<String> {
    if den == 0 {
        return None;
    }
    let scale = 10u128.checked_pow(places)?;
    let bias = if half_up { den / 2 } else { 0 };
    let scaled = num.checked_mul(scale)?.checked_add(bias)? / den;
    let int = scaled / scale;
    let frac = scaled % scale;
    if places == 0 {
        return Some(int.to_string());
    }
    Some(format!("{int}.{frac:0width$}", width = places as usize))
}
