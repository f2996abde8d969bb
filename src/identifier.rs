//! Identifier value model.
//!
//! [`Identifier`] wraps a [`uuid::Uuid`] and adds the two constructors the
//! substitution engine needs: parsing a textual UUID and building one from a
//! raw 128-bit integer with a version tag stamped in.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::FreezeError;

/// Mask clearing the two variant bits (octet 8, high bits).
const VARIANT_MASK: u128 = 0xc000 << 48;
/// RFC 4122 variant bits (`10xx`).
const VARIANT_RFC4122: u128 = 0x8000 << 48;
/// Mask clearing the version nibble (octet 6, high nibble).
const VERSION_MASK: u128 = 0xf000 << 64;
/// Bit offset of the version nibble.
const VERSION_SHIFT: u32 = 76;

/// An immutable 128-bit UUID value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Uuid);

impl Identifier {
    /// The all-zero UUID.
    pub const NIL: Self = Self(Uuid::nil());

    /// Parses any textual form accepted for UUIDs (hyphenated, simple, braced,
    /// or `urn:uuid:` prefixed). Surrounding whitespace is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::Format`] when `input` is not a valid UUID.
    pub fn parse(input: &str) -> Result<Self, FreezeError> {
        Uuid::parse_str(input).map(Self).map_err(|e| FreezeError::Format {
            input: input.to_string(),
            reason: e.to_string(),
        })
    }

    /// Builds an identifier from a raw integer, stamping in the RFC 4122
    /// variant and the given version nibble.
    ///
    /// # Errors
    ///
    /// Returns [`FreezeError::InvalidVersion`] unless `version` is in 1..=5.
    pub fn from_u128_versioned(value: u128, version: u8) -> Result<Self, FreezeError> {
        if !(1..=5).contains(&version) {
            return Err(FreezeError::InvalidVersion(version));
        }
        let mut bits = value;
        bits &= !VARIANT_MASK;
        bits |= VARIANT_RFC4122;
        bits &= !VERSION_MASK;
        bits |= u128::from(version) << VERSION_SHIFT;
        Ok(Self(Uuid::from_u128(bits)))
    }

    /// Builds an identifier from a raw integer without touching any bits.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Returns the raw 128-bit value.
    #[must_use]
    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    /// Returns the version nibble as stored, without validating it.
    #[must_use]
    pub fn version_nibble(&self) -> u8 {
        u8::try_from(self.0.get_version_num()).unwrap_or(u8::MAX)
    }

    /// Returns the wrapped [`Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Identifier {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<Identifier> for Uuid {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl FromStr for Identifier {
    type Err = FreezeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}
