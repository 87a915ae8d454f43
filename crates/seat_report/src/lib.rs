//! seat_report/src/lib.rs: Pure offline report model + renderers (JSON/CSV/text).
//!
//! Determinism rules:
//! - No network, no file I/O here. Callers hand in `PipelineOutputs` already in memory
//!   and decide where the rendered strings go.
//! - Percent and decimal strings are built from integers; renderers never format floats.
//! - Stable section order and field names (struct layout order).

#![deny(unsafe_code)]

use thiserror::Error;

use seat_core::ConfigError;

pub mod model;
pub mod render_csv;
#[cfg(feature = "render_json")]
pub mod render_json;
#[cfg(feature = "render_text")]
pub mod render_text;

pub use model::{build_model, ReportModel};
pub use render_csv::render_csv_tables;
#[cfg(feature = "render_json")]
pub use render_json::{render_json, render_json_pretty};
#[cfg(feature = "render_text")]
pub use render_text::render_text;

// ===== Errors =====
#[derive(Debug, Error)]
pub enum ReportError {
    /// The party registry in the run's config is unusable for display.
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("csv: {0}")]
    Csv(String),
    #[error("json: {0}")]
    Json(String),
    #[error("template {stage}: {msg}")]
    Template { stage: &'static str, msg: String },
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        ReportError::Csv(e.to_string())
    }
}

/// Output formats a caller can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
    Text,
}

/// Render `model` as named documents (`file name`, contents).
///
/// JSON and text produce one document; CSV produces one per table.
pub fn render(model: &ReportModel, format: Format) -> Result<Vec<(&'static str, String)>, ReportError> {
    match format {
        #[cfg(feature = "render_json")]
        Format::Json => Ok(vec![("report.json", render_json_pretty(model)?)]),
        #[cfg(not(feature = "render_json"))]
        Format::Json => Err(ReportError::Json("built without the render_json feature".into())),
        Format::Csv => render_csv_tables(model),
        #[cfg(feature = "render_text")]
        Format::Text => Ok(vec![("report.txt", render_text(model)?)]),
        #[cfg(not(feature = "render_text"))]
        Format::Text => Err(ReportError::Template {
            stage: "render",
            msg: "built without the render_text feature".into(),
        }),
    }
}
