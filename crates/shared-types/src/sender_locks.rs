//! # Per-Sender Submission Locks
//!
//! The ledger accepts exactly one transaction per sequence number, so two
//! submissions from the same sender must never be in flight together.
//! Different senders own independent sequence streams and never contend.
//!
//! A lock outlives its holders: it remembers the seqno of the last accepted
//! submission, and the next holder waits until the ledger shows the sender's
//! seqno past it before reading a number to use.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

use crate::address::Address;
use crate::entities::SequenceNumber;
use crate::errors::SeqnoWaitError;
use crate::ports::LedgerClient;

/// Bounded polling of a sender's sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqnoPolling {
    /// Reads before giving up, at least one
    pub attempts: u32,
    /// Pause between reads
    pub interval: Duration,
}

impl Default for SeqnoPolling {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Default)]
struct SenderSlot {
    last_used: Option<SequenceNumber>,
}

/// Exclusive ownership of one sender's sequence stream.
pub struct SenderGuard {
    sender: Address,
    slot: OwnedMutexGuard<SenderSlot>,
}

impl SenderGuard {
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// Seqno of the last accepted submission by any holder of this lock.
    pub fn last_used(&self) -> Option<SequenceNumber> {
        self.slot.last_used
    }

    /// Remember an accepted submission.
    pub fn record(&mut self, seqno: SequenceNumber) {
        self.slot.last_used = Some(seqno);
    }

    /// Seqno to use for the next submission.
    pub async fn fresh_seqno(
        &self,
        ledger: &dyn LedgerClient,
        polling: SeqnoPolling,
    ) -> Result<SequenceNumber, SeqnoWaitError> {
        await_seqno_after(ledger, &self.sender, self.last_used(), polling).await
    }
}

/// Read `sender`'s seqno, polling until it is greater than `last_used`.
///
/// With no `last_used` the first read is returned as-is.
pub async fn await_seqno_after(
    ledger: &dyn LedgerClient,
    sender: &Address,
    last_used: Option<SequenceNumber>,
    polling: SeqnoPolling,
) -> Result<SequenceNumber, SeqnoWaitError> {
    let mut observed = ledger
        .get_sequence_number(sender)
        .await
        .map_err(SeqnoWaitError::Read)?;
    let Some(last_used) = last_used else {
        return Ok(observed);
    };

    for attempt in 1..polling.attempts.max(1) {
        if observed > last_used {
            return Ok(observed);
        }
        debug!(
            sender = %sender,
            attempt,
            seqno = observed.value(),
            last_used = last_used.value(),
            "Waiting for previous submission to land"
        );
        tokio::time::sleep(polling.interval).await;
        observed = ledger
            .get_sequence_number(sender)
            .await
            .map_err(SeqnoWaitError::Read)?;
    }

    if observed > last_used {
        return Ok(observed);
    }
    Err(SeqnoWaitError::Stalled {
        last_used,
        observed,
    })
}

/// Registry of async locks keyed by sender address.
#[derive(Default)]
pub struct SenderLocks {
    locks: Mutex<HashMap<Address, Arc<AsyncMutex<SenderSlot>>>>,
}

impl SenderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, sender: &Address) -> Arc<AsyncMutex<SenderSlot>> {
        self.locks
            .lock()
            .entry(*sender)
            .or_insert_with(|| Arc::new(AsyncMutex::new(SenderSlot::default())))
            .clone()
    }

    /// Wait until `sender` is free and take exclusive ownership of it.
    pub async fn acquire(&self, sender: &Address) -> SenderGuard {
        let lock = self.lock_for(sender);
        if lock.try_lock().is_err() {
            debug!(sender = %sender, "Waiting for in-flight submission of sender");
        }
        SenderGuard {
            sender: *sender,
            slot: lock.lock_owned().await,
        }
    }

    /// Take ownership of `sender` only if nobody holds it.
    pub fn try_acquire(&self, sender: &Address) -> Option<SenderGuard> {
        let slot = self.lock_for(sender).try_lock_owned().ok()?;
        Some(SenderGuard {
            sender: *sender,
            slot,
        })
    }

    /// Number of senders seen so far.
    pub fn tracked_senders(&self) -> usize {
        self.locks.lock().len()
    }
}
