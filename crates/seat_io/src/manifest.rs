// crates/seat_io/src/manifest.rs
//
// Manifest: a small JSON file naming the run inputs.
//
//   { "districts": "districts.csv",
//     "party_list": "party_list.csv",
//     "config": "config.json",                      // optional
//     "inputs_sha256": { "districts": "<64-hex>" }  // optional, raw file bytes
//   }
//
// • Paths are resolved relative to the manifest's directory.
// • Offline-only: any path with a scheme ("://", "http:", "https:") is rejected.
// • Digests (if provided) must be 64-lower-hex and only for present inputs.
// • Inputs must exist and be files (not dirs).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hasher::sha256_file;
use crate::looks_like_url_strict;

/// External manifest accepted by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// District (constituency) results table.
    pub districts: String,
    /// Party-list vote table.
    pub party_list: String,
    /// Optional `SeatConfig` JSON; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs_sha256: Option<ManifestDigests>,
}

/// Optional expected sha256 (lowercase hex) of the raw input files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDigests {
    #[serde(default)]
    pub districts: Option<String>,
    #[serde(default)]
    pub party_list: Option<String>,
    #[serde(default)]
    pub config: Option<String>,
}

/// Paths resolved against a base directory (usually the manifest's dir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub districts: PathBuf,
    pub party_list: PathBuf,
    pub config: Option<PathBuf>,
    pub digests: Option<ManifestDigests>,
}

/// Loader/validation errors.
#[derive(Debug)]
pub enum ManifestError {
    Empty(&'static str),
    UrlPath(&'static str, String),
    Io(&'static str, String),
    Parse(String),
    NotAFile(&'static str, String),
    /// Bad hex format / shape.
    DigestShape(&'static str, String),
    /// Provided digest doesn't match the file.
    DigestMismatch(&'static str, String),
    /// Digest provided for an input that is not present in the manifest.
    DigestForMissing(&'static str),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ManifestError::*;
        match self {
            Empty(k) => write!(f, "field must not be empty: {k}"),
            UrlPath(k, v) => write!(f, "path must be offline (no scheme) for {k}: {v}"),
            Io(k, v) => write!(f, "cannot access {k}: {v}"),
            Parse(v) => write!(f, "cannot parse manifest: {v}"),
            NotAFile(k, v) => write!(f, "path is not a file for {k}: {v}"),
            DigestShape(k, v) => write!(f, "invalid sha256 format for {k}: {v}"),
            DigestMismatch(k, v) => write!(f, "sha256 mismatch for {k}: {v}"),
            DigestForMissing(k) => write!(f, "digest supplied for missing input: {k}"),
        }
    }
}
impl std::error::Error for ManifestError {}

// ---------- helpers (pure) ----------

#[inline]
fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn check_path(label: &'static str, path: &str) -> Result<(), ManifestError> {
    if path.trim().is_empty() {
        return Err(ManifestError::Empty(label));
    }
    if looks_like_url_strict(path) {
        return Err(ManifestError::UrlPath(label, path.to_string()));
    }
    Ok(())
}

fn check_digest(label: &'static str, h: &Option<String>) -> Result<(), ManifestError> {
    match h {
        Some(h) if !seat_core::ids::is_valid_sha256(h) => {
            Err(ManifestError::DigestShape(label, h.clone()))
        }
        _ => Ok(()),
    }
}

// ---------- validation ----------

/// Validate manifest *shape* and offline path policy. Does not perform I/O.
pub fn validate_manifest(man: &Manifest) -> Result<(), ManifestError> {
    check_path("districts", &man.districts)?;
    check_path("party_list", &man.party_list)?;
    if let Some(c) = &man.config {
        check_path("config", c)?;
    }
    if let Some(d) = &man.inputs_sha256 {
        check_digest("districts", &d.districts)?;
        check_digest("party_list", &d.party_list)?;
        check_digest("config", &d.config)?;
        if d.config.is_some() && man.config.is_none() {
            return Err(ManifestError::DigestForMissing("config"));
        }
    }
    Ok(())
}

// ---------- resolution ----------

/// Resolve manifest paths under `base_dir` and ensure every input is an existing file.
pub fn resolve_paths(base_dir: &Path, man: &Manifest) -> Result<ResolvedManifest, ManifestError> {
    let districts = join_under(base_dir, &man.districts);
    let party_list = join_under(base_dir, &man.party_list);
    let config = man.config.as_ref().map(|s| join_under(base_dir, s));

    must_exist_file("districts", &districts)?;
    must_exist_file("party_list", &party_list)?;
    if let Some(p) = &config {
        must_exist_file("config", p)?;
    }

    Ok(ResolvedManifest { districts, party_list, config, digests: man.inputs_sha256.clone() })
}

fn must_exist_file(label: &'static str, p: &Path) -> Result<(), ManifestError> {
    let md = fs::metadata(p).map_err(|e| ManifestError::Io(label, format!("{} ({e})", p.display())))?;
    if !md.is_file() {
        return Err(ManifestError::NotAFile(label, p.display().to_string()));
    }
    Ok(())
}

// ---------- digests ----------

/// Verify provided digests over the raw file bytes. `Ok` when none were given.
pub fn verify_digests(resolved: &ResolvedManifest) -> Result<(), ManifestError> {
    let Some(d) = &resolved.digests else { return Ok(()) };

    fn check_one(path: &Path, expect: &str, label: &'static str) -> Result<(), ManifestError> {
        let got = sha256_file(path).map_err(|e| ManifestError::Io(label, e.to_string()))?;
        if got != expect {
            return Err(ManifestError::DigestMismatch(label, format!("expected={expect} got={got}")));
        }
        Ok(())
    }

    if let Some(h) = &d.districts {
        check_one(&resolved.districts, h, "districts")?;
    }
    if let Some(h) = &d.party_list {
        check_one(&resolved.party_list, h, "party_list")?;
    }
    match (&resolved.config, &d.config) {
        (Some(p), Some(h)) => check_one(p, h, "config")?,
        (None, Some(_)) => return Err(ManifestError::DigestForMissing("config")),
        _ => {}
    }
    Ok(())
}

// ---------- entrypoint ----------

/// Read → validate → resolve (relative to the manifest's directory) → verify digests.
pub fn load_manifest(path: &Path) -> Result<(Manifest, ResolvedManifest), ManifestError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ManifestError::Io("manifest", format!("{} ({e})", path.display())))?;
    let man: Manifest = serde_json::from_str(&text).map_err(|e| ManifestError::Parse(e.to_string()))?;
    validate_manifest(&man)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let resolved = resolve_paths(base, &man)?;
    verify_digests(&resolved)?;
    Ok((man, resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn man(d: &str, p: &str) -> Manifest {
        Manifest { districts: d.into(), party_list: p.into(), config: None, inputs_sha256: None }
    }

    #[test]
    fn rejects_urls_and_blanks() {
        assert!(matches!(
            validate_manifest(&man("https://docs.google.com/x.csv", "p.csv")),
            Err(ManifestError::UrlPath("districts", _))
        ));
        assert!(matches!(
            validate_manifest(&man("d.csv", "file:///tmp/p.csv")),
            Err(ManifestError::UrlPath("party_list", _))
        ));
        assert!(matches!(validate_manifest(&man(" ", "p.csv")), Err(ManifestError::Empty("districts"))));
    }

    #[test]
    fn digest_rules() {
        let mut m = man("d.csv", "p.csv");
        m.inputs_sha256 = Some(ManifestDigests { districts: Some("ABC".into()), ..Default::default() });
        assert!(matches!(validate_manifest(&m), Err(ManifestError::DigestShape("districts", _))));

        m.inputs_sha256 = Some(ManifestDigests { config: Some("0".repeat(64)), ..Default::default() });
        assert!(matches!(validate_manifest(&m), Err(ManifestError::DigestForMissing("config"))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let r: Result<Manifest, _> =
            serde_json::from_str(r#"{"districts":"d.csv","party_list":"p.csv","extra":1}"#);
        assert!(r.is_err());
    }

    #[test]
    fn resolves_relative_to_manifest_and_verifies() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("d.csv"), "A\n1\n").unwrap();
        fs::write(dir.path().join("p.csv"), "A\n2\n").unwrap();
        let good = crate::hasher::sha256_hex(b"A\n1\n");
        let mp = dir.path().join("manifest.json");
        fs::write(
            &mp,
            format!(r#"{{"districts":"d.csv","party_list":"p.csv","inputs_sha256":{{"districts":"{good}"}}}}"#),
        )
        .unwrap();
        let (_, r) = load_manifest(&mp).unwrap();
        assert_eq!(r.districts, dir.path().join("d.csv"));

        fs::write(
            &mp,
            format!(r#"{{"districts":"d.csv","party_list":"p.csv","inputs_sha256":{{"party_list":"{good}"}}}}"#),
        )
        .unwrap();
        assert!(matches!(load_manifest(&mp), Err(ManifestError::DigestMismatch("party_list", _))));

        fs::write(&mp, r#"{"districts":"missing.csv","party_list":"p.csv"}"#).unwrap();
        assert!(matches!(load_manifest(&mp), Err(ManifestError::Io("districts", _))));
    }
}
