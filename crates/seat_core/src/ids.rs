//! crates/seat_core/src/ids.rs
//! Party/district label tokens and output digests.
//! Labels accept any Unicode text (party names are often non-Latin); digests are
//! strict lowercase hex.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned when validating or parsing IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    BadShape,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => write!(f, "empty identifier"),
            IdError::TooLong => write!(f, "identifier too long"),
            IdError::BadShape => write!(f, "malformed identifier"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdError {}

/// Max length of a label token, in chars.
pub const LABEL_MAX_CHARS: usize = 128;
const HEX64_LEN: usize = 64;

/// Lowercase hex (length must be exactly 64).
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    s.len() == HEX64_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Label token: 1..=128 chars, no surrounding whitespace, no control chars.
fn check_label(s: &str) -> Result<(), IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if s.chars().count() > LABEL_MAX_CHARS {
        return Err(IdError::TooLong);
    }
    if s.trim() != s || s.chars().any(char::is_control) {
        return Err(IdError::BadShape);
    }
    Ok(())
}

macro_rules! simple_string_newtype {
    ($(#[$m:meta])* $name:ident, $check:expr) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ($check)(s)?;
                Ok($name(s.to_owned()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                ($check)(value.as_str())?;
                Ok($name(value))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl From<$name> for String {
            #[inline]
            fn from(v: $name) -> String { v.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

// === Label tokens ===

simple_string_newtype!(
    /// Party identifier: the party column header as it appears in the input tables.
    PartyId,
    check_label
);
simple_string_newtype!(
    /// District (constituency) identifier.
    DistrictId,
    check_label
);

// === Digests ===

fn check_sha256(s: &str) -> Result<(), IdError> {
    if is_valid_sha256(s) { Ok(()) } else { Err(IdError::BadShape) }
}

fn check_res(s: &str) -> Result<(), IdError> {
    match s.strip_prefix("RES:") {
        Some(hex) if is_valid_sha256(hex) => Ok(()),
        _ => Err(IdError::BadShape),
    }
}

simple_string_newtype!(
    /// Generic 64-hex lowercase SHA-256 digest newtype.
    Sha256,
    check_sha256
);
simple_string_newtype!(
    /// "RES:" + 64-hex lowercase
    ResultId,
    check_res
);

impl DistrictId {
    /// Fallback id for a row without a usable district id: `row-<n>`.
    /// Always a valid label, so no check is needed.
    pub fn for_row(n: usize) -> Self {
        DistrictId(alloc::format!("row-{n}"))
    }
}

impl Sha256 {
    #[inline] pub fn as_hex(&self) -> &str { &self.0 }
}

impl ResultId {
    #[inline] pub fn as_hex(&self) -> &str { &self.0[4..] }
}

// === Tests ===

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    const HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn party_labels_accept_unicode() {
        for ok in ["A", "Pheu Thai", "เพื่อไทย", "People's Party", "ประชาชน"] {
            let p: PartyId = ok.parse().unwrap();
            assert_eq!(p.as_str(), ok);
        }
    }

    #[test]
    fn party_labels_reject_bad_shapes() {
        assert_eq!("".parse::<PartyId>(), Err(IdError::Empty));
        assert_eq!(" A".parse::<PartyId>(), Err(IdError::BadShape));
        assert_eq!("A\tB".parse::<PartyId>(), Err(IdError::BadShape));
        let long: String = core::iter::repeat('x').take(LABEL_MAX_CHARS + 1).collect();
        assert_eq!(long.parse::<DistrictId>(), Err(IdError::TooLong));
    }

    #[test]
    fn row_fallback_ids_are_valid_labels() {
        for n in [0usize, 1, 42, usize::MAX] {
            let id = DistrictId::for_row(n);
            assert_eq!(id.as_str().parse::<DistrictId>(), Ok(id.clone()));
        }
        assert_eq!(DistrictId::for_row(3).as_str(), "row-3");
    }

    #[test]
    fn digests() {
        let d: Sha256 = HEX.parse().unwrap();
        assert_eq!(d.as_hex(), HEX);
        let res: ResultId = format!("RES:{HEX}").parse().unwrap();
        assert_eq!(res.as_hex(), HEX);
        assert!("RES:DEADBEEF".parse::<ResultId>().is_err());
        assert!(HEX.to_uppercase().parse::<Sha256>().is_err());
    }
}
