//! Error types for the distribution subsystem

use shared_types::{Amount, LedgerError};
use thiserror::Error;

/// Distribution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// Snapshot has holders but they hold nothing
    #[error("Empty pool: snapshot holds zero units")]
    EmptyPool,

    /// Snapshot has no holders at all
    #[error("Snapshot has no holders")]
    ZeroHolders,

    /// Allocation fraction is not in [0, 1]
    #[error("Invalid allocation: {numerator}/{denominator}")]
    InvalidAllocation { numerator: u64, denominator: u64 },

    /// A payout would not fit the amount type
    #[error("Arithmetic overflow computing payout for {units} units at {per_unit}")]
    Overflow { units: u64, per_unit: Amount },

    /// Holder index failed while capturing a snapshot
    #[error("Holder index error at offset {offset}: {source}")]
    Index {
        offset: usize,
        #[source]
        source: LedgerError,
    },
}
