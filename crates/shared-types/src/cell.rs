//! # Cell Model
//!
//! Bit-exact rendition of the ledger's storage cell: up to 1023 data bits
//! and up to 4 references to child cells, forming a DAG. Every cell has a
//! representation hash (SHA-256 over descriptors, padded data, child depths
//! and child hashes) which is what addresses and signatures commit to.
//!
//! ## Components
//!
//! - [`Cell`]: immutable, cheaply clonable finished cell
//! - [`CellBuilder`]: append-only writer producing a [`Cell`]
//! - [`CellSlice`]: sequential reader over a [`Cell`]

use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

use crate::address::Address;
use crate::entities::{Amount, Hash};
use crate::errors::CellError;

/// Maximum data bits in one cell.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum child references in one cell.
pub const MAX_CELL_REFS: usize = 4;

/// Maximum depth of a cell tree.
pub const MAX_CELL_DEPTH: u16 = 1024;

/// Largest value representable as `Coins` (VarUInteger 16 has at most 15 bytes).
pub const MAX_COINS: Amount = (1u128 << 120) - 1;

// =============================================================================
// CELL
// =============================================================================

struct CellInner {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Cell>,
    depth: u16,
    hash: Hash,
}

/// A finished, immutable cell.
#[derive(Clone)]
pub struct Cell(Arc<CellInner>);

impl Cell {
    /// The empty cell (no bits, no refs).
    pub fn empty() -> Self {
        Self::finalize(Vec::new(), 0, Vec::new())
    }

    fn finalize(data: Vec<u8>, bit_len: usize, refs: Vec<Cell>) -> Self {
        let depth = refs.iter().map(|r| r.depth() + 1).max().unwrap_or(0);
        let hash = representation_hash(&data, bit_len, &refs);
        Self(Arc::new(CellInner {
            data,
            bit_len,
            refs,
            depth,
            hash,
        }))
    }

    /// Number of data bits.
    pub fn bit_len(&self) -> usize {
        self.0.bit_len
    }

    /// Raw data bytes, MSB-first, zero padded to a whole byte.
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    pub fn refs(&self) -> &[Cell] {
        &self.0.refs
    }

    /// Tree depth: 0 for a leaf, otherwise 1 + deepest child.
    pub fn depth(&self) -> u16 {
        self.0.depth
    }

    /// Representation hash.
    pub fn hash(&self) -> Hash {
        self.0.hash
    }

    /// Start reading this cell from its first bit and first ref.
    pub fn as_slice(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    fn bit(&self, index: usize) -> bool {
        (self.0.data[index / 8] >> (7 - index % 8)) & 1 == 1
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.0.hash == other.0.hash
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.0.bit_len)
            .field("refs", &self.0.refs.len())
            .field("hash", &hex::encode(self.0.hash))
            .finish()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// SHA-256 over the standard representation of an ordinary level-0 cell.
fn representation_hash(data: &[u8], bit_len: usize, refs: &[Cell]) -> Hash {
    let full_bytes = bit_len / 8;
    let partial = bit_len % 8 != 0;

    let d1 = refs.len() as u8;
    let d2 = (full_bytes * 2 + usize::from(partial)) as u8;

    let mut hasher = Sha256::new();
    hasher.update([d1, d2]);

    if partial {
        // Completion tag: a single 1 bit right after the data, then zeros.
        let mut padded = data[..=full_bytes].to_vec();
        padded[full_bytes] |= 1 << (7 - bit_len % 8);
        hasher.update(&padded);
    } else {
        hasher.update(&data[..full_bytes]);
    }

    for r in refs {
        hasher.update(r.depth().to_be_bytes());
    }
    for r in refs {
        hasher.update(r.hash());
    }

    hasher.finalize().into()
}

// =============================================================================
// BUILDER
// =============================================================================

/// Append-only cell writer.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Cell>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits still available in this cell.
    pub fn available_bits(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    /// References still available in this cell.
    pub fn available_refs(&self) -> usize {
        MAX_CELL_REFS - self.refs.len()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        if requested > self.available_bits() {
            return Err(CellError::BitOverflow {
                requested,
                available: self.available_bits(),
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 1 << (7 - self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store `bits` low bits of `value`, big-endian.
    pub fn store_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self, CellError> {
        if bits > 128 || (bits < 128 && value >> bits != 0) {
            return Err(CellError::ValueOutOfRange { bits });
        }
        self.ensure_bits(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Store a two's complement signed integer of `bits` width (1..=64).
    pub fn store_int(&mut self, value: i64, bits: usize) -> Result<&mut Self, CellError> {
        if bits == 0 || bits > 64 {
            return Err(CellError::ValueOutOfRange { bits });
        }
        if bits < 64 {
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            if value < min || value > max {
                return Err(CellError::ValueOutOfRange { bits });
            }
        }
        let mask: u64 = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        self.store_uint(u128::from(value as u64 & mask), bits)
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bytes.len() * 8)?;
        if self.bit_len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for byte in bytes {
                for i in (0..8).rev() {
                    self.push_bit((byte >> i) & 1 == 1);
                }
            }
        }
        Ok(self)
    }

    /// Store a sequence of individual bits.
    pub fn store_bits(&mut self, bits: &[bool]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bits.len())?;
        for &bit in bits {
            self.push_bit(bit);
        }
        Ok(self)
    }

    /// Store a `Coins` value (VarUInteger 16: 4-bit byte length, then bytes).
    pub fn store_coins(&mut self, amount: Amount) -> Result<&mut Self, CellError> {
        if amount > MAX_COINS {
            return Err(CellError::CoinsOutOfRange(amount));
        }
        let len = (128 - amount.leading_zeros() as usize).div_ceil(8);
        self.store_uint(len as u128, 4)?;
        self.store_uint(amount, len * 8)
    }

    /// Store `addr_std$10 anycast:0 workchain_id:int8 address:bits256`.
    pub fn store_address(&mut self, address: &Address) -> Result<&mut Self, CellError> {
        if address.workchain < i32::from(i8::MIN) || address.workchain > i32::from(i8::MAX) {
            return Err(CellError::WorkchainOutOfRange(address.workchain));
        }
        self.ensure_bits(267)?;
        self.store_uint(0b10, 2)?;
        self.store_bit(false)?;
        self.store_int(i64::from(address.workchain), 8)?;
        self.store_bytes(&address.hash)
    }

    /// Store `addr_none$00`.
    pub fn store_address_none(&mut self) -> Result<&mut Self, CellError> {
        self.store_uint(0, 2)
    }

    pub fn store_ref(&mut self, cell: Cell) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(CellError::RefOverflow);
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Store `Maybe ^Cell`.
    pub fn store_maybe_ref(&mut self, cell: Option<Cell>) -> Result<&mut Self, CellError> {
        match cell {
            Some(cell) => {
                self.store_bit(true)?;
                self.store_ref(cell)
            }
            None => self.store_bit(false),
        }
    }

    /// Append all bits and refs of `cell` into this builder.
    pub fn store_cell_contents(&mut self, cell: &Cell) -> Result<&mut Self, CellError> {
        if cell.refs().len() > self.available_refs() {
            return Err(CellError::RefOverflow);
        }
        self.ensure_bits(cell.bit_len())?;
        for i in 0..cell.bit_len() {
            self.push_bit(cell.bit(i));
        }
        for r in cell.refs() {
            self.refs.push(r.clone());
        }
        Ok(self)
    }

    /// Finish the cell, enforcing the depth limit.
    pub fn build(&self) -> Result<Cell, CellError> {
        let depth = self.refs.iter().map(|r| r.depth() + 1).max().unwrap_or(0);
        if depth > MAX_CELL_DEPTH {
            return Err(CellError::DepthExceeded {
                depth,
                max: MAX_CELL_DEPTH,
            });
        }
        Ok(Cell::finalize(
            self.data.clone(),
            self.bit_len,
            self.refs.clone(),
        ))
    }
}

// =============================================================================
// SLICE
// =============================================================================

/// Sequential reader over a cell's bits and refs.
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        if requested > self.remaining_bits() {
            return Err(CellError::BitUnderflow {
                requested,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        let bit = self.cell.bit(self.bit_pos);
        self.bit_pos += 1;
        Ok(bit)
    }

    pub fn load_uint(&mut self, bits: usize) -> Result<u128, CellError> {
        if bits > 128 {
            return Err(CellError::ValueOutOfRange { bits });
        }
        self.ensure_bits(bits)?;
        let mut value: u128 = 0;
        for _ in 0..bits {
            value = (value << 1) | u128::from(self.cell.bit(self.bit_pos));
            self.bit_pos += 1;
        }
        Ok(value)
    }

    /// Load a two's complement signed integer of `bits` width (1..=64).
    pub fn load_int(&mut self, bits: usize) -> Result<i64, CellError> {
        if bits == 0 || bits > 64 {
            return Err(CellError::ValueOutOfRange { bits });
        }
        let raw = self.load_uint(bits)? as u64;
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    pub fn load_bytes(&mut self, len: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(len * 8)?;
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push(self.load_uint(8)? as u8);
        }
        Ok(out)
    }

    pub fn load_bits(&mut self, len: usize) -> Result<Vec<bool>, CellError> {
        self.ensure_bits(len)?;
        (0..len).map(|_| self.load_bit()).collect()
    }

    pub fn load_coins(&mut self) -> Result<Amount, CellError> {
        let len = self.load_uint(4)? as usize;
        self.load_uint(len * 8)
    }

    /// Load a `MsgAddress`: `None` for `addr_none`, `Some` for `addr_std`.
    pub fn load_address(&mut self) -> Result<Option<Address>, CellError> {
        match self.load_uint(2)? {
            0b00 => Ok(None),
            0b10 => {
                if self.load_bit()? {
                    return Err(CellError::UnsupportedAddress("anycast"));
                }
                let workchain = self.load_int(8)? as i32;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&self.load_bytes(32)?);
                Ok(Some(Address::new(workchain, hash)))
            }
            0b01 => Err(CellError::UnsupportedAddress("addr_extern")),
            _ => Err(CellError::UnsupportedAddress("addr_var")),
        }
    }

    pub fn load_ref(&mut self) -> Result<&'a Cell, CellError> {
        let cell = self
            .cell
            .refs()
            .get(self.ref_pos)
            .ok_or(CellError::RefUnderflow)?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Load `Maybe ^Cell`.
    pub fn load_maybe_ref(&mut self) -> Result<Option<&'a Cell>, CellError> {
        if self.load_bit()? {
            Ok(Some(self.load_ref()?))
        } else {
            Ok(None)
        }
    }

    /// Fail unless every bit and ref has been consumed.
    pub fn ensure_empty(&self) -> Result<(), CellError> {
        if self.remaining_bits() != 0 || self.remaining_refs() != 0 {
            return Err(CellError::TrailingData {
                bits: self.remaining_bits(),
                refs: self.remaining_refs(),
            });
        }
        Ok(())
    }
}
