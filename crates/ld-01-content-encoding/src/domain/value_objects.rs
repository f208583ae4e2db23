//! Value objects for content encoding

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Tag byte opening the first chunk of a snake-encoded value.
pub const SNAKE_PREFIX: u8 = 0x00;

/// Tag byte opening an on-chain content cell.
pub const ONCHAIN_CONTENT_PREFIX: u8 = 0x00;

/// Payload bytes per chunk: `(1023 - 8) / 8`.
pub const CHUNK_CAPACITY: usize = (shared_types::MAX_CELL_BITS - 8) / 8;

/// Longest chunk chain for one field. Together with a 256-level dictionary
/// this stays under the cell depth limit.
pub const MAX_SNAKE_CHUNKS: usize = 512;

/// Width of dictionary keys in bits.
pub const DICT_KEY_BITS: usize = 256;

/// Well-known on-chain metadata field names.
pub const KNOWN_FIELDS: &[&str] = &[
    "uri",
    "name",
    "description",
    "image",
    "image_data",
    "symbol",
    "decimals",
    "amount_style",
    "render_type",
];

/// Dictionary key: SHA-256 of the field name, read as a 256-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DictKey(pub [u8; 32]);

impl DictKey {
    pub fn from_name(name: &str) -> Self {
        Self(Sha256::digest(name.as_bytes()).into())
    }

    /// Key bits, most significant first.
    pub fn bits(&self) -> Vec<bool> {
        self.0
            .iter()
            .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
            .collect()
    }

    /// Rebuild a key from exactly 256 bits.
    pub fn from_bits(bits: &[bool]) -> Option<Self> {
        if bits.len() != DICT_KEY_BITS {
            return None;
        }
        let mut out = [0u8; 32];
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                out[i / 8] |= 1 << (7 - i % 8);
            }
        }
        Some(Self(out))
    }
}

impl fmt::Debug for DictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DictKey({})", hex::encode(self.0))
    }
}

/// A single named metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentField {
    pub name: String,
    pub value: Vec<u8>,
}

impl ContentField {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> DictKey {
        DictKey::from_name(&self.name)
    }
}

/// Flat key/value metadata map. Ordering of insertion is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPayload {
    fields: BTreeMap<String, Vec<u8>>,
}

impl MetadataPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = ContentField> + '_ {
        self.fields
            .iter()
            .map(|(name, value)| ContentField::new(name.clone(), value.clone()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FromIterator<ContentField> for MetadataPayload {
    fn from_iter<T: IntoIterator<Item = ContentField>>(iter: T) -> Self {
        let mut payload = Self::new();
        for field in iter {
            payload.insert(field.name, field.value);
        }
        payload
    }
}
