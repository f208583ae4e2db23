//! # Batch Dispatch Subsystem
//!
//! Moves value to many recipients while respecting the ledger's ceiling of
//! 255 messages per wallet transaction.
//!
//! ## Guarantees
//!
//! - Batches are contiguous slices of the input, at most `batch_size` long,
//!   and together contain every entry exactly once
//! - One transaction per batch, each with its own sequence number
//! - A sequence number is never reused: before each batch the dispatcher
//!   waits until the previous one is reflected on the ledger
//! - Submissions for one sender never overlap (see [`SenderLocks`])
//! - Failures are reported with batch index, sequence number and sender and
//!   are never retried silently
//!
//! [`SenderLocks`]: shared_types::SenderLocks

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use adapters::{JettonTransferEncoder, NativeTransferEncoder};
pub use algorithms::{batch_count, partition};
pub use application::{BatchDispatch, BatchDispatcher};
pub use config::{DispatchConfig, DEFAULT_GAS_PER_TRANSFER};
pub use domain::*;
pub use ports::TransferEncoder;
