//! # Core Domain Entities
//!
//! Values exchanged between the encoding, derivation, distribution, dispatch
//! and deployment components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::address::Address;
use crate::cell::Cell;
use crate::ports::Signer;

/// A 32-byte representation hash.
pub type Hash = [u8; 32];

/// Token or native currency amount in the smallest unit.
pub type Amount = u128;

/// One whole native coin in nano units.
pub const NANO_PER_COIN: Amount = 1_000_000_000;

/// Per-sender monotonic transaction counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct SequenceNumber(pub u32);

impl SequenceNumber {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The value the ledger reports once a submission with `self` landed.
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable initialization payload of a program: code plus initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitPayload {
    /// Program code.
    pub code: Cell,
    /// Initial persistent state.
    pub data: Cell,
}

impl InitPayload {
    pub fn new(code: Cell, data: Cell) -> Self {
        Self { code, data }
    }
}

/// Account state as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountState {
    /// Whether code and data are installed.
    pub initialized: bool,
    /// Native balance.
    pub balance: Amount,
    /// Serialized program state, empty for uninitialized accounts.
    pub custom_state: Vec<u8>,
}

/// An externally controlled account able to sign transfers.
#[derive(Clone)]
pub struct WalletAccount {
    /// On-ledger address of the wallet program.
    pub address: Address,
    /// Sub-wallet identifier committed into every signed body.
    pub wallet_id: u32,
    /// Credential-backed signer.
    pub signer: Arc<dyn Signer>,
}

impl WalletAccount {
    pub fn new(address: Address, wallet_id: u32, signer: Arc<dyn Signer>) -> Self {
        Self {
            address,
            wallet_id,
            signer,
        }
    }
}

impl fmt::Debug for WalletAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAccount")
            .field("address", &self.address)
            .field("wallet_id", &self.wallet_id)
            .finish_non_exhaustive()
    }
}
