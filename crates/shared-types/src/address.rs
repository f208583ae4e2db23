//! # Ledger Addresses
//!
//! An address is a workchain identifier plus the 256-bit account id. The raw
//! textual form is `<workchain>:<64 lowercase hex chars>`, which is the only
//! form accepted from configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AddressParseError;

/// Basechain identifier.
pub const BASECHAIN: i32 = 0;

/// Masterchain identifier.
pub const MASTERCHAIN: i32 = -1;

/// Fixed-width identifier of an account or program on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    /// Workchain the account lives in.
    pub workchain: i32,
    /// Account id (representation hash of the program's StateInit).
    pub hash: [u8; 32],
}

impl Address {
    pub const fn new(workchain: i32, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    /// Raw form, e.g. `0:5f2a...`.
    pub fn to_raw_string(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (workchain, hash_hex) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| AddressParseError::MissingSeparator(s.to_string()))?;

        let workchain: i32 = workchain
            .parse()
            .map_err(|_| AddressParseError::InvalidWorkchain(workchain.to_string()))?;

        if hash_hex.len() != 64 {
            return Err(AddressParseError::InvalidLength {
                expected: 64,
                actual: hash_hex.len(),
            });
        }

        let mut hash = [0u8; 32];
        hex::decode_to_slice(hash_hex, &mut hash)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;

        Ok(Self { workchain, hash })
    }
}
