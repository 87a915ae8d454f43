//! crates/seat_core/src/config.rs
//! Seat configuration with safe defaults, validation, and the party display registry.
//!
//! Defaults describe a 500-seat house: 400 constituency seats + 100 party-list
//! seats, majority at 376, simple majority at 251.

use alloc::borrow::ToOwned;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::entities::Winner;
use crate::errors::CoreError;
use crate::ids::PartyId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_NO_WINNER_LABEL: &str = "NO INFORMATION YET";
pub const DEFAULT_OTHERS_LABEL: &str = "Others";
pub const DEFAULT_OTHERS_COLOR: &str = "#808080";
pub const DEFAULT_UNDETERMINED_COLOR: &str = "#D3D3D3";

/// `#RRGGBB`, either case.
pub fn is_hex_color(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 7 && b[0] == b'#' && b[1..].iter().all(u8::is_ascii_hexdigit)
}

// ----- Shapes -----

/// Which metadata columns carry the district id, province, region and name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColumnRoles {
    pub district_id: String,
    pub province: String,
    pub region: String,
    pub district_name: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            district_id: "Constituency_ID".to_owned(),
            province: "Province (English)".to_owned(),
            region: "Region".to_owned(),
            district_name: "District".to_owned(),
        }
    }
}

impl ColumnRoles {
    fn names(&self) -> [(&'static str, &str); 4] {
        [
            ("district_id", self.district_id.as_str()),
            ("province", self.province.as_str()),
            ("region", self.region.as_str()),
            ("district_name", self.district_name.as_str()),
        ]
    }
}

/// Label + color used when rendering a party (or a bucket).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayMeta {
    pub label: String,
    pub color: String,
}

impl DisplayMeta {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Result<Self, CoreError> {
        let (label, color) = (label.into(), color.into());
        if label.trim().is_empty() {
            return Err(CoreError::EmptyLabel);
        }
        if !is_hex_color(&color) {
            return Err(CoreError::InvalidColor);
        }
        Ok(Self { label, color })
    }
}

/// Registry entry as written in config. `label` defaults to the party id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartyMeta {
    pub id: PartyId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub label: Option<String>,
    pub color: String,
}

/// Engine configuration. Every field has a default; JSON may override any subset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeatConfig {
    pub constituency_seats: u32,
    pub list_seats: u32,
    pub house_size: u32,
    pub majority_threshold: u32,
    pub simple_majority_threshold: u32,
    /// Rendered for districts with no votes yet.
    pub no_winner_label: String,
    /// Leading rows to skip before the header row of each CSV table.
    pub header_row: usize,
    /// Non-party columns; everything else is a party vote column.
    pub metadata_columns: Vec<String>,
    pub columns: ColumnRoles,
    pub parties: Vec<PartyMeta>,
    pub others: DisplayMeta,
    pub undetermined_color: String,
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            constituency_seats: 400,
            list_seats: 100,
            house_size: 500,
            majority_threshold: 376,
            simple_majority_threshold: 251,
            no_winner_label: DEFAULT_NO_WINNER_LABEL.to_owned(),
            header_row: 0,
            metadata_columns: vec![
                "Province".to_owned(),
                "Region".to_owned(),
                "Constituency_ID".to_owned(),
                "Province (English)".to_owned(),
                "District".to_owned(),
            ],
            columns: ColumnRoles::default(),
            parties: Vec::new(),
            others: DisplayMeta {
                label: DEFAULT_OTHERS_LABEL.to_owned(),
                color: DEFAULT_OTHERS_COLOR.to_owned(),
            },
            undetermined_color: DEFAULT_UNDETERMINED_COLOR.to_owned(),
        }
    }
}

// ----- Validation -----

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Domain(String),
    Consistency(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Domain(m) => write!(f, "config domain: {m}"),
            ConfigError::Consistency(m) => write!(f, "config consistency: {m}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl SeatConfig {
    /// Validate numeric domains and cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.list_seats == 0 {
            return Err(ConfigError::Domain("list_seats must be > 0".into()));
        }
        let seats = u64::from(self.constituency_seats) + u64::from(self.list_seats);
        if seats != u64::from(self.house_size) {
            return Err(ConfigError::Consistency(format!(
                "house_size {} != constituency_seats {} + list_seats {}",
                self.house_size, self.constituency_seats, self.list_seats
            )));
        }
        if self.simple_majority_threshold == 0 {
            return Err(ConfigError::Domain("simple_majority_threshold must be > 0".into()));
        }
        if self.simple_majority_threshold > self.majority_threshold {
            return Err(ConfigError::Consistency(format!(
                "simple_majority_threshold {} > majority_threshold {}",
                self.simple_majority_threshold, self.majority_threshold
            )));
        }
        if self.majority_threshold > self.house_size {
            return Err(ConfigError::Domain(format!(
                "majority_threshold {} exceeds house_size {}",
                self.majority_threshold, self.house_size
            )));
        }
        if self.no_winner_label.trim().is_empty() {
            return Err(ConfigError::Domain("no_winner_label must not be blank".into()));
        }

        let mut seen = BTreeSet::new();
        for c in &self.metadata_columns {
            if !seen.insert(c.as_str()) {
                return Err(ConfigError::Consistency(format!("duplicate metadata column: {c}")));
            }
        }
        for (role, name) in self.columns.names() {
            if !seen.contains(name) {
                return Err(ConfigError::Consistency(format!(
                    "column role {role}={name:?} is not a metadata column"
                )));
            }
        }

        PartyRegistry::from_config(self).map(|_| ())
    }
}

// ----- Party display registry -----

/// Closed set `party -> display`, with explicit fallbacks for unknown parties
/// (`Others`) and undetermined districts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyRegistry {
    known: BTreeMap<PartyId, DisplayMeta>,
    others: DisplayMeta,
    undetermined: DisplayMeta,
}

impl PartyRegistry {
    pub fn from_config(cfg: &SeatConfig) -> Result<Self, ConfigError> {
        let bad = |what: String, e: CoreError| ConfigError::Domain(format!("{what}: {e}"));

        let mut known = BTreeMap::new();
        for p in &cfg.parties {
            if p.id.as_str() == cfg.no_winner_label {
                return Err(ConfigError::Consistency(format!(
                    "party {:?} collides with no_winner_label",
                    p.id.as_str()
                )));
            }
            let label = p.label.clone().unwrap_or_else(|| p.id.as_str().to_owned());
            let meta = DisplayMeta::new(label, p.color.clone())
                .map_err(|e| bad(format!("party {}", p.id), e))?;
            if known.insert(p.id.clone(), meta).is_some() {
                return Err(ConfigError::Consistency(format!("duplicate party in registry: {}", p.id)));
            }
        }
        let others = DisplayMeta::new(cfg.others.label.clone(), cfg.others.color.clone())
            .map_err(|e| bad("others".into(), e))?;
        let undetermined = DisplayMeta::new(cfg.no_winner_label.clone(), cfg.undetermined_color.clone())
            .map_err(|e| bad("undetermined_color".into(), e))?;
        if undetermined.color.eq_ignore_ascii_case(&others.color) {
            return Err(ConfigError::Consistency(
                "undetermined_color must differ from the others color".into(),
            ));
        }
        Ok(Self { known, others, undetermined })
    }

    /// Display for a party; parties outside the registry get the `Others` bucket.
    pub fn party(&self, id: &PartyId) -> &DisplayMeta {
        self.known.get(id).unwrap_or(&self.others)
    }

    pub fn display(&self, w: &Winner) -> &DisplayMeta {
        match w {
            Winner::Party(p) => self.party(p),
            Winner::Undetermined => &self.undetermined,
        }
    }

    #[inline]
    pub fn is_known(&self, id: &PartyId) -> bool {
        self.known.contains_key(id)
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PartyId { s.parse().unwrap() }

    fn with_parties() -> SeatConfig {
        SeatConfig {
            parties: vec![
                PartyMeta { id: pid("เพื่อไทย"), label: None, color: "#DF0000".into() },
                PartyMeta { id: pid("ประชาชน"), label: Some("People's Party".into()), color: "#FF6600".into() },
            ],
            ..SeatConfig::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        let c = SeatConfig::default();
        assert_eq!((c.constituency_seats, c.list_seats, c.house_size), (400, 100, 500));
        assert_eq!((c.majority_threshold, c.simple_majority_threshold), (376, 251));
        assert_eq!(c.no_winner_label, "NO INFORMATION YET");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn house_size_must_match_seat_split() {
        let c = SeatConfig { house_size: 450, majority_threshold: 300, ..SeatConfig::default() };
        assert!(matches!(c.validate(), Err(ConfigError::Consistency(_))));
    }

    #[test]
    fn thresholds_ordered() {
        let c = SeatConfig { simple_majority_threshold: 400, ..SeatConfig::default() };
        assert!(matches!(c.validate(), Err(ConfigError::Consistency(_))));
        let c = SeatConfig { list_seats: 0, constituency_seats: 500, ..SeatConfig::default() };
        assert!(matches!(c.validate(), Err(ConfigError::Domain(_))));
    }

    #[test]
    fn column_roles_must_be_metadata() {
        let mut c = SeatConfig::default();
        c.columns.region = "Zone".into();
        assert!(matches!(c.validate(), Err(ConfigError::Consistency(_))));
    }

    #[test]
    fn registry_lookup_and_fallbacks() {
        let cfg = with_parties();
        let reg = PartyRegistry::from_config(&cfg).unwrap();
        assert_eq!(reg.party(&pid("เพื่อไทย")).color, "#DF0000");
        assert_eq!(reg.party(&pid("เพื่อไทย")).label, "เพื่อไทย");
        assert_eq!(reg.party(&pid("ประชาชน")).label, "People's Party");
        let other = reg.display(&Winner::Party(pid("Tiny Party")));
        assert_eq!((other.label.as_str(), other.color.as_str()), ("Others", "#808080"));
        let und = reg.display(&Winner::Undetermined);
        assert_eq!((und.label.as_str(), und.color.as_str()), ("NO INFORMATION YET", "#D3D3D3"));
    }

    #[test]
    fn registry_rejects_bad_entries() {
        let mut cfg = with_parties();
        cfg.parties[0].color = "red".into();
        assert!(matches!(PartyRegistry::from_config(&cfg), Err(ConfigError::Domain(_))));

        let mut cfg = with_parties();
        cfg.parties[1].id = pid("เพื่อไทย");
        assert!(matches!(PartyRegistry::from_config(&cfg), Err(ConfigError::Consistency(_))));

        let mut cfg = with_parties();
        cfg.parties[0].id = pid("NO INFORMATION YET");
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let c: SeatConfig = serde_json::from_str(r#"{"header_row":1,"list_seats":100}"#).unwrap();
        assert_eq!(c.header_row, 1);
        assert_eq!(c.house_size, 500);
        assert_eq!(c.columns, ColumnRoles::default());
    }
}
