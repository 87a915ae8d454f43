//! render_json.rs: report model as JSON.
//!
//! Object key order follows struct layout (cover → seats → districts → party_list →
//! provinces → roster → coalition? → data_quality), so no `preserve_order` feature is needed.

use crate::{ReportError, ReportModel};

/// Compact JSON, single line.
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string(model).map_err(|e| ReportError::Json(e.to_string()))
}

/// Indented JSON with a trailing newline, for files meant to be read by people.
pub fn render_json_pretty(model: &ReportModel) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(model).map_err(|e| ReportError::Json(e.to_string()))?;
    s.push('\n');
    Ok(s)
}
