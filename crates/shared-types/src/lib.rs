//! # Shared Types Crate
//!
//! Ledger primitives used by every component of the distributor.
//!
//! ## Contents
//!
//! - **Addresses**: [`Address`] with the raw `<workchain>:<hex>` form
//! - **Cells**: [`Cell`], [`CellBuilder`], [`CellSlice`] with representation hashes
//! - **Messages**: [`OutboundMessage`], [`TransferRequest`], [`SignedTransfer`]
//! - **Ports**: [`LedgerClient`] and [`Signer`], the only way out of the engine
//! - **Locks**: [`SenderLocks`] serializing submissions per sender and
//!   remembering the last sequence number each sender used

pub mod address;
pub mod cell;
pub mod entities;
pub mod errors;
pub mod messages;
pub mod ports;
pub mod sender_locks;

pub use address::{Address, BASECHAIN, MASTERCHAIN};
pub use cell::{Cell, CellBuilder, CellSlice, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};
pub use entities::*;
pub use errors::*;
pub use messages::{
    OutboundMessage, SendMode, SignedTransfer, TransferRequest, MAX_MESSAGES_PER_TRANSFER,
};
pub use ports::{LedgerClient, Signer};
pub use sender_locks::{await_seqno_after, SenderGuard, SenderLocks, SeqnoPolling};

// Re-export U256 for wide intermediate arithmetic
pub use primitive_types::U256;
