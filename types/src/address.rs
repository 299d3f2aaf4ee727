//! Validator identity: a `0x`-prefixed, 32-byte hex address.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validator address, always `0x` followed by 64 lowercase hex digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatorAddress(String);

impl ValidatorAddress {
    /// The standard prefix for all validator addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of raw bytes behind an address.
    pub const LENGTH: usize = 32;

    /// Create an address from a string known to be well-formed.
    ///
    /// # Panics
    /// Panics if the string is not a valid address. Use [`ValidatorAddress::parse`]
    /// for untrusted input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        match Self::parse(raw.as_ref()) {
            Ok(addr) => addr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse an address, normalising hex digits to lowercase.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let digits = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypesError::InvalidAddress(raw.to_string()))?;
        let bytes = hex::decode(digits).map_err(|_| TypesError::InvalidAddress(raw.to_string()))?;
        if bytes.len() != Self::LENGTH {
            return Err(TypesError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(format!("{}{}", Self::PREFIX, hex::encode(bytes))))
    }

    /// Build an address from its raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
    }

    /// Return the canonical address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ValidatorAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ValidatorAddress {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ValidatorAddress> for String {
    fn from(addr: ValidatorAddress) -> Self {
        addr.0
    }
}
