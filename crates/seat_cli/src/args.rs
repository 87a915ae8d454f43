// crates/seat_cli/src/args.rs
//
// Offline CLI argument surface (types + validation).
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - Exactly one of: --manifest  XOR  (--districts + --party-list [+ --config])
// - Output: --out dir, --render [json|csv|text]*
// - --validate-only loads and checks inputs without running the engine

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use seat_core::PartyId;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "seats",
    disable_help_subcommand = true,
    about = "Offline, deterministic parliamentary seat allocation"
)]
pub struct Args {
    // --- Mode selection ---
    /// Path to a manifest JSON naming the inputs (mutually exclusive with explicit file flags).
    #[arg(long, conflicts_with_all = ["districts", "party_list", "config"])]
    pub manifest: Option<PathBuf>,

    // --- Explicit mode ---
    /// District results CSV.
    #[arg(long)]
    pub districts: Option<PathBuf>,
    /// Party-list votes CSV.
    #[arg(long)]
    pub party_list: Option<PathBuf>,
    /// SeatConfig JSON (defaults apply when omitted).
    #[arg(long)]
    pub config: Option<PathBuf>,

    // --- Selection ---
    /// Count constituency seats only for districts in this region (repeatable).
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,
    /// Evaluate a coalition of these parties (repeatable).
    #[arg(long = "coalition", value_name = "PARTY", value_parser = parse_party)]
    pub coalition: Vec<PartyId>,

    // --- Output & rendering ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Report format(s) to emit. Omit to write only result.json.
    #[arg(long, value_parser = ["json", "csv", "text"], num_args = 0..=3)]
    pub render: Vec<String>,

    // --- Control ---
    /// Load and validate inputs only; do not run the engine.
    #[arg(long)]
    pub validate_only: bool,
    /// Run twice and fail unless both runs produce the same result id.
    #[arg(long)]
    pub verify: bool,
    /// Only errors on stderr.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log level implied by `-v` / `--quiet`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

fn parse_party(s: &str) -> Result<PartyId, String> {
    s.parse::<PartyId>().map_err(|e| e.to_string())
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

/// Ensure a provided path string is local (no scheme); existence is checked later.
#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        args.manifest.as_deref(),
        args.districts.as_deref(),
        args.party_list.as_deref(),
        args.config.as_deref(),
        Some(args.out.as_path()),
    ]
    .into_iter()
    .flatten()
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Mode + path checks on already-parsed arguments; paths come back absolute.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }

    if let Some(m) = &args.manifest {
        ensure_local_exists(m, "--manifest")?;
        args.manifest = args.manifest.take().map(|p| normalize_path(&p));
    } else {
        let d = args.districts.as_ref().ok_or(CliError::Missing("--districts (or --manifest)"))?;
        let l = args.party_list.as_ref().ok_or(CliError::Missing("--party-list"))?;
        ensure_local_exists(d, "--districts")?;
        ensure_local_exists(l, "--party-list")?;
        if let Some(c) = &args.config {
            ensure_local_exists(c, "--config")?;
        }
        args.districts = args.districts.take().map(|p| normalize_path(&p));
        args.party_list = args.party_list.take().map(|p| normalize_path(&p));
        args.config = args.config.take().map(|p| normalize_path(&p));
    }

    args.out = normalize_path(&args.out);
    Ok(args)
}

/// Ensure a path is local (no scheme) and exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort normalization to an absolute path.
/// If canonicalize fails (e.g., path doesn't exist yet), produce an absolute path relative to CWD.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("seats").chain(argv.iter().copied()))
    }

    #[test]
    fn manifest_conflicts_with_explicit_inputs() {
        assert!(parse(&["--manifest", "m.json", "--districts", "d.csv"]).is_err());
        assert!(parse(&["--manifest", "m.json"]).is_ok());
    }

    #[test]
    fn repeatable_selection_flags() {
        let a = parse(&["--manifest", "m.json", "--coalition", "A", "--coalition", "B", "--region", "North"]).unwrap();
        assert_eq!(a.coalition.len(), 2);
        assert_eq!(a.regions, vec!["North"]);
    }

    #[test]
    fn render_formats_are_closed() {
        assert!(parse(&["--manifest", "m.json", "--render", "json", "csv"]).is_ok());
        assert!(parse(&["--manifest", "m.json", "--render", "html"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(parse(&["-vv"]).unwrap().log_level(), log::LevelFilter::Trace);
        assert_eq!(parse(&["--quiet"]).unwrap().log_level(), log::LevelFilter::Error);
        assert!(parse(&["-q", "-v"]).is_err());
    }

    #[test]
    fn explicit_mode_requires_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let d = dir.path().join("d.csv");
        fs::write(&d, "A\n1\n").unwrap();
        let a = parse(&["--districts", d.to_str().unwrap()]).unwrap();
        assert!(matches!(validate(a), Err(CliError::Missing("--party-list"))));
        let a = parse(&["--districts", d.to_str().unwrap(), "--party-list", "missing.csv"]).unwrap();
        assert!(matches!(validate(a), Err(CliError::NotFound(_))));
    }

    #[test]
    fn ensure_local_path_rejects_schemes() {
        assert!(ensure_local_path(Path::new("http://x")).is_err());
        assert!(ensure_local_path(Path::new("file://C:/x.csv")).is_err());
        assert!(ensure_local_path(Path::new("https://docs.google.com/d.csv")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/file.csv")).is_ok());
    }

    #[test]
    fn normalize_path_returns_absolute() {
        assert!(normalize_path(&PathBuf::from("does/not/exist.csv")).is_absolute());
    }
}
