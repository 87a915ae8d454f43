//! crates/seat_io/src/lib.rs
//! Local-file I/O for the seat engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - File modules: `canonical_json`, `hasher`, `manifest`, `loader`.
//! - Offline only: no network access; URL-like paths are rejected.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for seat_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, ...).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// CSV read/write errors.
    #[error("csv error: {0}")]
    Csv(String),

    /// Manifest shape / offline policy / digest verification.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Configuration failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column, not a pointer; report the root.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv(e.to_string())
    }
}

impl From<manifest::ManifestError> for IoError {
    fn from(e: manifest::ManifestError) -> Self {
        IoError::Manifest(e.to_string())
    }
}

impl From<seat_core::ConfigError> for IoError {
    fn from(e: seat_core::ConfigError) -> Self {
        IoError::Config(e.to_string())
    }
}

/// Returns true if `s` looks like a URL (any `<scheme>://`, or bare http(s):).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    let t = s.trim();
    t.contains("://") || t.starts_with("http:") || t.starts_with("https:")
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod manifest;
