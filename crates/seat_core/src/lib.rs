//! seat_core: Core types, configuration, ordering helpers and rounding.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`seat_io`, `seat_algo`, `seat_pipeline`, `seat_report`, `seat_cli`).
//!
//! - Identifier tokens: `PartyId`, `DistrictId`; output ids `ResultId`, `Sha256`
//! - Input/output entities: `RawTable`, `VoteTable`, `Winner`, `DistrictResult`
//! - Configuration: `SeatConfig` (seat counts, thresholds, sentinel label, party registry)
//! - Deterministic ordering helpers (`PartyOrder`)
//! - Integer-first percentage helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod determinism;
pub mod entities;
pub mod ids;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidColor,
        EmptyLabel,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidColor => write!(f, "invalid color (expected #RRGGBB)"),
                CoreError::EmptyLabel => write!(f, "empty label"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod rounding {
    //! Integer-first percentage helpers.
    //!
    //! Seat shares are always `count / fixed_base * 100`. Display strings are
    //! produced from integer tenths (round half up) so that no float formatting
    //! enters the reports.

    use alloc::format;
    use alloc::string::String;

    /// Percentage as `f64`; a zero base yields `0.0`.
    #[inline]
    pub fn pct(num: u64, den: u64) -> f64 {
        if den == 0 {
            return 0.0;
        }
        (num as f64) * 100.0 / (den as f64)
    }

    /// Percentage in tenths of a percent, rounded half up. `None` if `den == 0`.
    pub fn percent_tenths(num: u64, den: u64) -> Option<u64> {
        if den == 0 {
            return None;
        }
        let n = num as u128 * 1000;
        let d = den as u128;
        let t = (n + d / 2) / d;
        Some(if t > u64::MAX as u128 { u64::MAX } else { t as u64 })
    }

    /// One-decimal percent string, e.g. `"42.5%"`. A zero base renders `"0.0%"`.
    pub fn percent_one_decimal(num: u64, den: u64) -> String {
        let t = percent_tenths(num, den).unwrap_or(0);
        format!("{}.{}%", t / 10, t % 10)
    }

}

// Convenience re-exports (downstream crates import these from the crate root).
pub use config::{ColumnRoles, ConfigError, DisplayMeta, PartyMeta, PartyRegistry, SeatConfig};
pub use determinism::PartyOrder;
pub use entities::{DistrictResult, RawTable, VoteRow, VoteTable, Winner};
pub use ids::{DistrictId, IdError, PartyId, ResultId, Sha256};
