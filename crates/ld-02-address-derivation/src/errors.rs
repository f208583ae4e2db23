//! Error types for address derivation

use shared_types::{Address, CellError};
use thiserror::Error;

/// Address derivation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Derived address differs from the one the caller expected
    #[error("Address mismatch: expected {expected}, computed {computed}")]
    Mismatch { expected: Address, computed: Address },

    /// Workchain does not fit the standard address form
    #[error("Workchain {0} out of range")]
    WorkchainOutOfRange(i32),

    /// Split depth must fit in 5 bits and be non-zero
    #[error("Invalid split depth: {0}")]
    InvalidSplitDepth(u8),

    /// Malformed or oversized initialization cell
    #[error("Cell error: {0}")]
    Cell(#[from] CellError),
}
