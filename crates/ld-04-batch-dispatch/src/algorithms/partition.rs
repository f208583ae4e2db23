//! Splits a transfer list into contiguous ledger-legal batches.

use crate::config::check_batch_size;
use crate::domain::{DispatchError, TransferBatch, TransferEntry};

/// Number of batches `len` entries occupy.
#[must_use]
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    len.div_ceil(batch_size)
}

/// Cut `entries` into batches of at most `batch_size`, preserving order.
pub fn partition(
    entries: Vec<TransferEntry>,
    batch_size: usize,
) -> Result<Vec<TransferBatch>, DispatchError> {
    check_batch_size(batch_size)?;

    let mut batches = Vec::with_capacity(batch_count(entries.len(), batch_size));
    let mut rest = entries.into_iter().peekable();
    while rest.peek().is_some() {
        let chunk: Vec<_> = rest.by_ref().take(batch_size).collect();
        batches.push(TransferBatch {
            index: batches.len(),
            entries: chunk,
        });
    }
    Ok(batches)
}
