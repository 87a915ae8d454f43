// crates/seat_cli/src/main.rs
//
// load → (validate-only | pipeline [→ verify]) → result.json → coalition.json? → reports.
// Exit codes map typed errors; nothing here computes seats.

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    pub const VALIDATION: u8 = 2;
    pub const SELF_VERIFY: u8 = 3;
    pub const IO: u8 = 4;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use log::{error, info};

use args::{parse_and_validate as parse_cli, Args};
use seat_io::canonical_json::{to_canonical_bytes, write_atomic};
use seat_io::loader::{self, LoadedInputs};
use seat_io::IoError;
use seat_pipeline::tabulate::normalize_table;
use seat_pipeline::{evaluate_coalition, PipelineError, PipelineInputs, PipelineOutputs, RunOptions};
use seat_report::{build_model, render, Format, ReportError};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Config / table shape / manifest / digest expectation failures
    Validation(String),
    /// Seat invariants or the two-run determinism check failed
    SelfVerify(String),
    /// Read/write/path errors, report rendering
    Io(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::SelfVerify(m) => write!(f, "self-verify: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seats: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION);
        }
    };

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let result = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    match result {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            error!("{e}");
            ExitCode::from(map_error(&e))
        }
    }
}

fn load(args: &Args) -> Result<LoadedInputs, MainError> {
    let loaded = match (&args.manifest, &args.districts, &args.party_list) {
        (Some(m), _, _) => loader::load_inputs_from_manifest(m),
        (None, Some(d), Some(l)) => loader::load_inputs(d, l, args.config.as_deref()),
        _ => return Err(MainError::Validation("no inputs given".into())),
    };
    loaded.map_err(map_io_err)
}

/// Validate-only path: load and normalize both tables, no seat math, no artifacts.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let loaded = load(args)?;
    normalize_table("districts", &loaded.districts, &loaded.config).map_err(map_pipeline_err)?;
    normalize_table("party_list", &loaded.party_list, &loaded.config).map_err(map_pipeline_err)?;
    info!(
        "validate-only: inputs OK ({} district rows, {} party-list rows)",
        loaded.districts.rows.len(),
        loaded.party_list.rows.len()
    );
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let loaded = load(args)?;
    let inputs = PipelineInputs::from(loaded);
    let opts = RunOptions { regions: args.regions.clone() };

    let outs = if args.verify {
        seat_pipeline::run_verified(&inputs, &opts)
    } else {
        seat_pipeline::run(&inputs, &opts)
    }
    .map_err(map_pipeline_err)?;

    fs::create_dir_all(&args.out)
        .map_err(|e| MainError::Io(format!("mkdir {}: {e}", args.out.display())))?;
    write_json(&args.out, "result.json", &outs)?;

    let coalition = if args.coalition.is_empty() {
        None
    } else {
        let c = evaluate_coalition(&outs, &args.coalition);
        info!("coalition: {} seats, {:?}", c.total_seats, c.status);
        write_json(&args.out, "coalition.json", &c)?;
        Some(c)
    };

    maybe_render_reports(args, &outs, coalition.as_ref())?;

    info!("run: artifacts written to {}", args.out.display());
    println!("{}", outs.result_id);
    Ok(())
}

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> Result<(), MainError> {
    let bytes = to_canonical_bytes(value).map_err(|e| MainError::Io(format!("{name}: {e}")))?;
    write_atomic(&dir.join(name), &bytes).map_err(|e| MainError::Io(format!("write {name}: {e}")))
}

fn maybe_render_reports(
    args: &Args,
    outs: &PipelineOutputs,
    coalition: Option<&seat_algo::CoalitionReport>,
) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let model = build_model(outs, coalition).map_err(map_report_err)?;
    for fmt in &args.render {
        let format = match fmt.as_str() {
            "json" => Format::Json,
            "csv" => Format::Csv,
            "text" => Format::Text,
            other => return Err(MainError::Validation(format!("unknown renderer: {other}"))),
        };
        for (name, body) in render(&model, format).map_err(map_report_err)? {
            write_atomic(&args.out.join(name), body.as_bytes())
                .map_err(|e| MainError::Io(format!("write {name}: {e}")))?;
        }
    }
    Ok(())
}

fn map_error(e: &MainError) -> u8 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::SelfVerify(_) => SELF_VERIFY,
        MainError::Io(_) => IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Path(_) | IoError::Hash(_) => MainError::Io(e.to_string()),
        _ => MainError::Validation(e.to_string()),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    if e.is_validation() {
        return MainError::Validation(e.to_string());
    }
    match e {
        PipelineError::Invariant(_) | PipelineError::Build(_) | PipelineError::Allocate(_) => {
            MainError::SelfVerify(e.to_string())
        }
        other => MainError::Io(other.to_string()),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    match e {
        ReportError::Config(_) => MainError::Validation(e.to_string()),
        _ => MainError::Io(format!("render: {e}")),
    }
}
