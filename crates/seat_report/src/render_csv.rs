//! CSV tables from the report model.
//!
//! Headers are fixed. Seat shares and list decimals are copied from the model
//! strings; nothing is recomputed here.

use crate::{ReportError, ReportModel};

type Table = (&'static str, String);

/// `seats.csv`, `districts.csv`, `party_list.csv`, `provinces.csv`, in that order.
pub fn render_csv_tables(m: &ReportModel) -> Result<Vec<Table>, ReportError> {
    Ok(vec![
        ("seats.csv", seats_csv(m)?),
        ("districts.csv", districts_csv(m)?),
        ("party_list.csv", party_list_csv(m)?),
        ("provinces.csv", provinces_csv(m)?),
    ])
}

/// Seat allocation table, a sentinel line when districts are unresolved, then TOTAL.
///
/// The sentinel line leaves every seat column empty; its district count sits in
/// the trailing `Undetermined Districts` column so seat columns always sum to TOTAL.
pub fn seats_csv(m: &ReportModel) -> Result<String, ReportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "Party",
        "Label",
        "Color",
        "Constituency Seats",
        "Party-List Seats",
        "Total Seats",
        "Constituency %",
        "Party-List %",
        "Total %",
        "Undetermined Districts",
    ])?;
    for r in &m.seats.rows {
        w.write_record([
            r.party.id.clone(),
            r.party.label.clone(),
            r.party.color.clone(),
            r.constituency_seats.to_string(),
            r.party_list_seats.to_string(),
            r.total_seats.to_string(),
            r.constituency_pct.clone(),
            r.party_list_pct.clone(),
            r.total_pct.clone(),
            String::new(),
        ])?;
    }
    if m.seats.undetermined_districts > 0 {
        w.write_record([
            m.seats.undetermined_label.clone(),
            m.seats.undetermined_label.clone(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            m.seats.undetermined_districts.to_string(),
        ])?;
    }
    let t = &m.seats.totals;
    w.write_record([
        "TOTAL".to_string(),
        "TOTAL".to_string(),
        String::new(),
        t.constituency_seats.to_string(),
        t.party_list_seats.to_string(),
        t.total_seats.to_string(),
        t.constituency_pct.clone(),
        t.party_list_pct.clone(),
        t.total_pct.clone(),
        String::new(),
    ])?;
    finish(w)
}

pub fn districts_csv(m: &ReportModel) -> Result<String, ReportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["District ID", "Province", "Region", "District", "Winner", "Winning Votes", "Tied"])?;
    for d in &m.districts {
        w.write_record([
            d.district_id.clone(),
            d.province.clone(),
            d.region.clone(),
            d.name.clone(),
            d.winner.label.clone(),
            d.winning_votes.to_string(),
            yes_no(d.tied),
        ])?;
    }
    finish(w)
}

/// Party-list calculation detail.
pub fn party_list_csv(m: &ReportModel) -> Result<String, ReportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "Party",
        "Total Votes",
        "Vote Share",
        "Quotient",
        "Base Seats",
        "Remainder",
        "Extra Seat",
        "Final Seats",
    ])?;
    for r in &m.party_list.rows {
        w.write_record([
            r.party.id.clone(),
            r.total_votes.to_string(),
            r.vote_share.clone(),
            r.quotient.clone(),
            r.base_seats.to_string(),
            r.remainder.clone(),
            u8::from(r.extra_seat).to_string(),
            r.final_seats.to_string(),
        ])?;
    }
    finish(w)
}

pub fn provinces_csv(m: &ReportModel) -> Result<String, ReportError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(["Province", "Districts", "Undetermined", "Dominant", "Seats"])?;
    for p in &m.provinces {
        w.write_record([
            p.province.clone(),
            p.districts.to_string(),
            p.undetermined.to_string(),
            p.dominant.label.clone(),
            p.seats.join("; "),
        ])?;
    }
    finish(w)
}

fn yes_no(b: bool) -> String {
    if b { "yes" } else { "no" }.to_string()
}

fn finish(w: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = w.into_inner().map_err(|e| ReportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Csv(e.to_string()))
}
