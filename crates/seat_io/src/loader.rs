//! Loader: read local inputs (manifest → config → district table → party-list table)
//! and return a `LoadedInputs` for the pipeline. No network I/O.
//!
//! Tables are CSV. Spreadsheet exports often carry title rows above the header;
//! `SeatConfig::header_row` says how many leading records to skip. Cells stay
//! strings here; numeric coercion belongs to the normalizer.

#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use seat_core::{RawTable, SeatConfig};

use crate::{hasher, looks_like_url_strict, manifest, IoError};

/// sha256 (lowercase hex) of the raw input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDigests {
    pub districts_sha256: String,
    pub party_list_sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_sha256: Option<String>,
}

/// Loaded, validated context for the pipeline.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub districts: RawTable,
    pub party_list: RawTable,
    pub config: SeatConfig,
    pub digests: InputDigests,
}

// ----------------------------- CSV -----------------------------

/// Parse CSV from a reader: skip `skip_rows` leading records, then header, then rows.
///
/// Records may have any length (short rows are padded by the normalizer).
pub fn parse_csv_table<R: Read>(reader: R, skip_rows: usize) -> Result<RawTable, IoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    for _ in 0..skip_rows {
        match records.next() {
            Some(r) => {
                r?;
            }
            None => return Err(IoError::Csv(format!("table ends before header row {skip_rows}"))),
        }
    }
    let headers: Vec<String> = match records.next() {
        Some(r) => r?.iter().map(str::to_string).collect(),
        None => return Err(IoError::Csv("missing header row".into())),
    };
    let headers = strip_bom(headers);

    let mut rows = Vec::new();
    for r in records {
        rows.push(r?.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

fn strip_bom(mut headers: Vec<String>) -> Vec<String> {
    if let Some(first) = headers.first_mut() {
        if let Some(rest) = first.strip_prefix('\u{feff}') {
            *first = rest.to_string();
        }
    }
    headers
}

/// Read a CSV table from disk.
pub fn read_csv_table(path: &Path, skip_rows: usize) -> Result<RawTable, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let t = parse_csv_table(f, skip_rows).map_err(|e| match e {
        IoError::Csv(m) => IoError::Csv(format!("{}: {m}", path.display())),
        other => other,
    })?;
    debug!(
        "loader: {} → {} columns, {} rows",
        path.display(),
        t.headers.len(),
        t.rows.len()
    );
    Ok(t)
}

// ----------------------------- Config -----------------------------

/// Load and validate a `SeatConfig` JSON file.
pub fn load_config(path: &Path) -> Result<SeatConfig, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let cfg: SeatConfig = serde_json::from_str(&text).map_err(|e| IoError::Json {
        pointer: path.display().to_string(),
        msg: e.to_string(),
    })?;
    cfg.validate()?;
    Ok(cfg)
}

// ----------------------------- Orchestration -----------------------------

/// Load everything from explicit paths. `config` falls back to defaults.
pub fn load_inputs(districts: &Path, party_list: &Path, config: Option<&Path>) -> Result<LoadedInputs, IoError> {
    for p in [Some(districts), Some(party_list), config].into_iter().flatten() {
        if looks_like_url_strict(&p.to_string_lossy()) {
            return Err(IoError::Invalid(format!("remote inputs are not supported: {}", p.display())));
        }
    }

    let cfg = match config {
        Some(p) => load_config(p)?,
        None => {
            let c = SeatConfig::default();
            c.validate()?;
            c
        }
    };

    let d = read_csv_table(districts, cfg.header_row)?;
    let l = read_csv_table(party_list, cfg.header_row)?;

    let digests = InputDigests {
        districts_sha256: hasher::sha256_file(districts)?,
        party_list_sha256: hasher::sha256_file(party_list)?,
        config_sha256: config.map(hasher::sha256_file).transpose()?,
    };

    Ok(LoadedInputs { districts: d, party_list: l, config: cfg, digests })
}

/// Load everything from a **manifest file path**.
pub fn load_inputs_from_manifest(path: &Path) -> Result<LoadedInputs, IoError> {
    let (_man, resolved) = manifest::load_manifest(path)?;
    let config: Option<PathBuf> = resolved.config.clone();
    load_inputs(&resolved.districts, &resolved.party_list, config.as_deref())
}

// ----------------------------- Tests -----------------------------
