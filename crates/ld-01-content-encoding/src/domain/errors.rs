//! Error types for content encoding

use shared_types::CellError;
use thiserror::Error;

/// All errors that can occur while encoding or decoding content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Chunk capacity outside what a single cell can carry after the tag
    #[error("Invalid chunk capacity: {capacity} (must be 1..={max})")]
    InvalidCapacity { capacity: usize, max: usize },

    /// Value needs more chunks than the linked structure allows
    #[error("Value too large: {len} bytes > {max} bytes")]
    ValueTooLarge { len: usize, max: usize },

    /// Leading format tag is not the expected one
    #[error("Unexpected format tag: 0x{found:02x} (expected 0x{expected:02x})")]
    UnexpectedTag { expected: u8, found: u8 },

    /// Chunk data is not byte aligned or the chain is malformed
    #[error("Malformed chunk chain: {0}")]
    MalformedChunk(String),

    /// Dictionary structure is malformed
    #[error("Malformed dictionary: {0}")]
    MalformedDictionary(String),

    /// No dictionary entry for the requested key
    #[error("Field not found: {0}")]
    NotFound(String),

    /// Underlying cell error
    #[error("Cell error: {0}")]
    Cell(#[from] CellError),
}
