//! Error types for batch dispatch

use shared_types::{Address, CellError, LedgerError, SignerError};
use thiserror::Error;

/// Dispatch errors. Every submission-time variant names the batch and the
/// sender so the operator can resume from the right place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Batch size outside 1..=255
    #[error("Invalid batch size: {size} (must be 1..={max})")]
    InvalidBatchSize { size: usize, max: usize },

    /// A transfer could not be turned into a message
    #[error("Failed to build batch {batch_index}: {source}")]
    Build {
        batch_index: usize,
        #[source]
        source: CellError,
    },

    /// Reading the sender's sequence number failed
    #[error("Failed to read sequence number of {sender} before batch {batch_index}: {source}")]
    SequenceRead {
        batch_index: usize,
        sender: Address,
        #[source]
        source: LedgerError,
    },

    /// The previous submission never advanced the sequence number
    #[error("Sequence number of {sender} stuck at {observed} (last used {last_used}) before batch {batch_index}")]
    SequenceStalled {
        batch_index: usize,
        sender: Address,
        last_used: u32,
        observed: u32,
    },

    /// The signer refused or failed
    #[error("Signing failed for batch {batch_index} (seqno {seqno}, sender {sender}): {source}")]
    Signing {
        batch_index: usize,
        seqno: u32,
        sender: Address,
        #[source]
        source: SignerError,
    },

    /// The ledger rejected the submission
    #[error("Submission failed for batch {batch_index} (seqno {seqno}, sender {sender}): {source}")]
    Submission {
        batch_index: usize,
        seqno: u32,
        sender: Address,
        #[source]
        source: LedgerError,
    },
}

impl DispatchError {
    /// Batch the error refers to, if any.
    pub fn batch_index(&self) -> Option<usize> {
        match self {
            Self::InvalidBatchSize { .. } => None,
            Self::Build { batch_index, .. }
            | Self::SequenceRead { batch_index, .. }
            | Self::SequenceStalled { batch_index, .. }
            | Self::Signing { batch_index, .. }
            | Self::Submission { batch_index, .. } => Some(*batch_index),
        }
    }
}
