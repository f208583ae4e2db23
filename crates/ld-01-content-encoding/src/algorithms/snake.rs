//! # Snake Chunking
//!
//! A byte string too large for one cell is cut into pieces of at most
//! `capacity` bytes. The first cell carries the `0x00` tag followed by the
//! first piece; every cell references the cell holding the next piece.
//!
//! ```text
//! [0x00 | piece0] -> [piece1] -> [piece2] -> ... -> [pieceN]
//! ```
//!
//! The chain is built as a right fold: the last piece becomes the innermost
//! cell and each earlier piece wraps it.

use shared_types::{Cell, CellBuilder, CellSlice};

use crate::domain::{EncodingError, CHUNK_CAPACITY, MAX_SNAKE_CHUNKS, SNAKE_PREFIX};

/// Encode `value` with the standard chunk capacity.
pub fn encode_snake(value: &[u8]) -> Result<Cell, EncodingError> {
    encode_snake_with_capacity(value, CHUNK_CAPACITY)
}

/// Encode `value` into a tagged chunk chain of at most `capacity` bytes per
/// chunk.
///
/// An empty value yields a single cell holding only the tag.
pub fn encode_snake_with_capacity(value: &[u8], capacity: usize) -> Result<Cell, EncodingError> {
    check_capacity(capacity)?;

    let max_len = capacity * MAX_SNAKE_CHUNKS;
    if value.len() > max_len {
        return Err(EncodingError::ValueTooLarge {
            len: value.len(),
            max: max_len,
        });
    }

    let pieces: Vec<&[u8]> = if value.is_empty() {
        vec![value]
    } else {
        value.chunks(capacity).collect()
    };

    let mut tail: Option<Cell> = None;
    for (index, piece) in pieces.iter().enumerate().rev() {
        let mut builder = CellBuilder::new();
        if index == 0 {
            builder.store_uint(u128::from(SNAKE_PREFIX), 8)?;
        }
        builder.store_bytes(piece)?;
        if let Some(next) = tail.take() {
            builder.store_ref(next)?;
        }
        tail = Some(builder.build()?);
    }

    // `pieces` always has at least one element
    tail.ok_or_else(|| EncodingError::MalformedChunk("no chunks produced".into()))
}

/// Decode a tagged chunk chain back into its bytes.
pub fn decode_snake(cell: &Cell) -> Result<Vec<u8>, EncodingError> {
    let mut slice = cell.as_slice();
    let tag = slice.load_uint(8).map_err(|_| {
        EncodingError::MalformedChunk("chunk chain shorter than its tag".into())
    })? as u8;
    if tag != SNAKE_PREFIX {
        return Err(EncodingError::UnexpectedTag {
            expected: SNAKE_PREFIX,
            found: tag,
        });
    }
    decode_untagged(slice)
}

/// Decode a chunk chain that starts right after the tag.
pub fn decode_untagged(mut slice: CellSlice<'_>) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::new();
    let mut chunks = 0usize;

    loop {
        chunks += 1;
        if chunks > MAX_SNAKE_CHUNKS {
            return Err(EncodingError::MalformedChunk(format!(
                "chain longer than {MAX_SNAKE_CHUNKS} chunks"
            )));
        }

        let bits = slice.remaining_bits();
        if bits % 8 != 0 {
            return Err(EncodingError::MalformedChunk(format!(
                "chunk {} holds {bits} bits, not a whole number of bytes",
                chunks - 1
            )));
        }
        out.extend(slice.load_bytes(bits / 8)?);

        match slice.remaining_refs() {
            0 => return Ok(out),
            1 => {
                let next = slice.load_ref()?;
                slice = next.as_slice();
            }
            n => {
                return Err(EncodingError::MalformedChunk(format!(
                    "chunk {} has {n} references",
                    chunks - 1
                )))
            }
        }
    }
}

/// Number of chunks a value of `len` bytes occupies.
#[must_use]
pub fn chunk_count(len: usize, capacity: usize) -> usize {
    if len == 0 || capacity == 0 {
        1
    } else {
        len.div_ceil(capacity)
    }
}

pub(crate) fn check_capacity(capacity: usize) -> Result<(), EncodingError> {
    if capacity == 0 || capacity > CHUNK_CAPACITY {
        return Err(EncodingError::InvalidCapacity {
            capacity,
            max: CHUNK_CAPACITY,
        });
    }
    Ok(())
}
