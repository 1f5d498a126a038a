//! 64-bit permission bitmask algebra.
//!
//! Permission values are exact unsigned 64-bit integers. They cross
//! interchange boundaries (JSON, client payloads) as decimal strings,
//! since not every peer can represent a 64-bit integer natively.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors from parsing a serialized permission value.
///
/// A corrupted bitmask is security-relevant, so malformed input is
/// surfaced to the caller rather than coerced to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input is not a non-negative decimal integer.
    #[error("invalid permission value: {0:?}")]
    Invalid(String),

    /// Input is a decimal integer but exceeds the 64-bit unsigned range.
    #[error("permission value out of 64-bit range: {0:?}")]
    Overflow(String),
}

/// An exact 64-bit unsigned permission bitmask.
///
/// Unlike the named flag registry, this type never drops unknown bits:
/// a value round-trips bit-for-bit over the full `[0, 2^64 - 1]` range.
///
/// # Examples
///
/// ```
/// use vc_permissions::bits::PermissionSet;
///
/// let bits: PermissionSet = "2251799813685248".parse().unwrap();
/// assert_eq!(bits, PermissionSet::from_bits(1 << 51));
/// assert_eq!(bits.to_string(), "2251799813685248");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u64);

impl PermissionSet {
    /// No permissions.
    pub const EMPTY: Self = Self(0);

    /// Every permission, including bits with no assigned meaning yet.
    pub const ALL: Self = Self(u64::MAX);

    /// Wrap a raw bit pattern. Lossless; no bits are masked off.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// The raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` iff every bit set in `required` is also set in `self`.
    #[must_use]
    pub const fn has_all(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// `true` iff at least one bit set in `required` is set in `self`.
    #[must_use]
    pub const fn has_any(self, required: Self) -> bool {
        self.0 & required.0 != 0
    }
}

impl FromStr for PermissionSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Reject signs, whitespace, and anything non-decimal up front so
        // the only remaining failure mode is overflow.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::Invalid(s.to_owned()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseError::Overflow(s.to_owned()))
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PermissionSet {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<PermissionSet> for u64 {
    fn from(set: PermissionSet) -> Self {
        set.0
    }
}

impl BitOr for PermissionSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PermissionSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PermissionSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for PermissionSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for PermissionSet {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BitsVisitor;

        impl de::Visitor<'_> for BitsVisitor {
            type Value = PermissionSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 64-bit unsigned integer or its decimal-string form")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(PermissionSet(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(PermissionSet)
                    .map_err(|_| E::custom(ParseError::Invalid(v.to_string())))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(BitsVisitor)
    }
}
