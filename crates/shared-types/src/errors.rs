//! # Error Types
//!
//! Errors shared by every component that touches cells or the ledger ports.

use thiserror::Error;

use crate::entities::{Amount, SequenceNumber};

/// Errors raised while building or reading cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Write would exceed the cell's data capacity.
    #[error("Cell overflow: {requested} bits requested, {available} available")]
    BitOverflow { requested: usize, available: usize },

    /// Read past the end of the cell data.
    #[error("Cell underflow: {requested} bits requested, {remaining} remaining")]
    BitUnderflow { requested: usize, remaining: usize },

    /// More than four child references.
    #[error("Cell reference overflow: at most 4 references")]
    RefOverflow,

    /// No reference left to read.
    #[error("Cell reference underflow")]
    RefUnderflow,

    /// Tree deeper than the ledger accepts.
    #[error("Cell depth exceeded: {depth} > {max}")]
    DepthExceeded { depth: u16, max: u16 },

    /// Integer does not fit the requested width.
    #[error("Value does not fit in {bits} bits")]
    ValueOutOfRange { bits: usize },

    /// Amount exceeds the `Coins` encoding range.
    #[error("Amount {0} exceeds the coins range")]
    CoinsOutOfRange(Amount),

    /// Workchain does not fit the 8-bit standard address encoding.
    #[error("Workchain {0} does not fit in a standard address")]
    WorkchainOutOfRange(i32),

    /// Address form other than `addr_none` / `addr_std`.
    #[error("Unsupported address form: {0}")]
    UnsupportedAddress(&'static str),

    /// Bits or refs left over after a complete decode.
    #[error("Trailing data: {bits} bits and {refs} refs unread")]
    TrailingData { bits: usize, refs: usize },

    /// Wallet transaction over the per-transaction message ceiling.
    #[error("Too many messages in one transfer: {count} > {max}")]
    TooManyMessages { count: usize, max: usize },
}

/// Errors parsing a raw `<workchain>:<hex>` address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("Missing ':' separator in address '{0}'")]
    MissingSeparator(String),

    #[error("Invalid workchain '{0}'")]
    InvalidWorkchain(String),

    #[error("Invalid hash length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Errors reported by a [`LedgerClient`](crate::ports::LedgerClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The endpoint could not be reached or returned garbage.
    #[error("Ledger transport error: {0}")]
    Transport(String),

    /// The ledger refused the transaction at the protocol layer.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// The transaction's sequence number is not the sender's current one.
    #[error("Sequence number mismatch: expected {expected}, got {got}")]
    SequenceMismatch { expected: u32, got: u32 },

    /// The sender cannot cover the attached value and fees.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    /// Upstream throttled the request.
    #[error("Rate limited by ledger endpoint")]
    RateLimited,
}

/// Failure while waiting for a sender's sequence number to move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqnoWaitError {
    #[error("Failed to read sequence number: {0}")]
    Read(#[source] LedgerError),

    /// The last accepted submission never showed up in the sender's seqno.
    #[error("Sequence number stuck at {observed} (last used {last_used})")]
    Stalled {
        last_used: SequenceNumber,
        observed: SequenceNumber,
    },
}

/// Errors reported by a [`Signer`](crate::ports::Signer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("Signing key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
