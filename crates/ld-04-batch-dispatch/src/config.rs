//! Configuration for batch dispatch

use serde::{Deserialize, Serialize};
use shared_types::{Amount, SeqnoPolling, MAX_MESSAGES_PER_TRANSFER};
use std::time::Duration;

use crate::domain::{BatchMode, DispatchError};

/// Native value attached to each message to pay for its execution (0.035).
pub const DEFAULT_GAS_PER_TRANSFER: Amount = 35_000_000;

/// Dispatch configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Messages per transaction (1..=255)
    pub batch_size: usize,
    /// Native value attached to every message
    pub gas_per_transfer: Amount,
    /// Strict or best-effort delivery within a batch
    pub mode: BatchMode,
    /// Pause before every batch after the first
    pub inter_batch_delay: Duration,
    /// Lifetime of a signed transaction
    pub valid_for: Duration,
    /// Pause between sequence number reads while waiting for progress
    pub seqno_poll_interval: Duration,
    /// Sequence number reads before declaring the sender stalled
    pub seqno_poll_attempts: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_MESSAGES_PER_TRANSFER,
            gas_per_transfer: DEFAULT_GAS_PER_TRANSFER,
            mode: BatchMode::BestEffort,
            inter_batch_delay: Duration::from_secs(1),
            valid_for: Duration::from_secs(60),
            seqno_poll_interval: Duration::from_secs(1),
            seqno_poll_attempts: 30,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), DispatchError> {
        check_batch_size(self.batch_size)
    }

    pub fn seqno_polling(&self) -> SeqnoPolling {
        SeqnoPolling {
            attempts: self.seqno_poll_attempts,
            interval: self.seqno_poll_interval,
        }
    }
}

pub(crate) fn check_batch_size(size: usize) -> Result<(), DispatchError> {
    if size == 0 || size > MAX_MESSAGES_PER_TRANSFER {
        return Err(DispatchError::InvalidBatchSize {
            size,
            max: MAX_MESSAGES_PER_TRANSFER,
        });
    }
    Ok(())
}
