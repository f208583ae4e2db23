//! # Metadata Encoder
//!
//! Implements [`ContentEncodingApi`] on top of the snake and dictionary
//! algorithms.

use shared_types::{Cell, CellBuilder};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::algorithms::{
    build_dictionary, decode_snake, dictionary_get, encode_snake_with_capacity, parse_dictionary,
};
use crate::domain::{
    DictKey, EncodingError, MetadataPayload, CHUNK_CAPACITY, KNOWN_FIELDS, ONCHAIN_CONTENT_PREFIX,
};
use crate::ports::ContentEncodingApi;

/// Encoder for on-chain metadata content.
#[derive(Debug, Clone)]
pub struct MetadataEncoder {
    capacity: usize,
    field_names: Vec<String>,
}

impl Default for MetadataEncoder {
    fn default() -> Self {
        Self {
            capacity: CHUNK_CAPACITY,
            field_names: KNOWN_FIELDS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl MetadataEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a smaller chunk capacity (1..=126 bytes).
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self, EncodingError> {
        crate::algorithms::snake::check_capacity(capacity)?;
        self.capacity = capacity;
        Ok(self)
    }

    /// Register extra field names so `decode_metadata` can resolve them.
    pub fn with_field_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.field_names.contains(&name) {
                self.field_names.push(name);
            }
        }
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn dictionary_root(content: &Cell) -> Result<Option<Cell>, EncodingError> {
        let mut slice = content.as_slice();
        let tag = slice.load_uint(8)? as u8;
        if tag != ONCHAIN_CONTENT_PREFIX {
            return Err(EncodingError::UnexpectedTag {
                expected: ONCHAIN_CONTENT_PREFIX,
                found: tag,
            });
        }
        let root = slice.load_maybe_ref()?.cloned();
        slice.ensure_empty()?;
        Ok(root)
    }
}

impl ContentEncodingApi for MetadataEncoder {
    fn encode_metadata(&self, payload: &MetadataPayload) -> Result<Cell, EncodingError> {
        let mut entries = BTreeMap::new();
        for field in payload.fields() {
            let chunks = encode_snake_with_capacity(&field.value, self.capacity).map_err(|e| {
                warn!(field = %field.name, len = field.value.len(), error = %e, "Field rejected");
                e
            })?;
            entries.insert(field.key(), chunks);
        }

        let root = build_dictionary(&entries)?;
        let mut builder = CellBuilder::new();
        builder.store_uint(u128::from(ONCHAIN_CONTENT_PREFIX), 8)?;
        builder.store_maybe_ref(root)?;
        let cell = builder.build()?;

        debug!(
            fields = payload.len(),
            depth = cell.depth(),
            hash = %hex::encode(cell.hash()),
            "Encoded metadata content"
        );
        Ok(cell)
    }

    fn decode_raw(&self, content: &Cell) -> Result<BTreeMap<DictKey, Vec<u8>>, EncodingError> {
        let Some(root) = Self::dictionary_root(content)? else {
            return Ok(BTreeMap::new());
        };
        parse_dictionary(&root)?
            .into_iter()
            .map(|(key, cell)| decode_snake(&cell).map(|value| (key, value)))
            .collect()
    }

    fn decode_metadata(&self, content: &Cell) -> Result<MetadataPayload, EncodingError> {
        let mut raw = self.decode_raw(content)?;
        let mut payload = MetadataPayload::new();
        for name in &self.field_names {
            if let Some(value) = raw.remove(&DictKey::from_name(name)) {
                payload.insert(name.clone(), value);
            }
        }
        if !raw.is_empty() {
            warn!(
                unresolved = raw.len(),
                "Metadata holds fields with unknown names"
            );
        }
        Ok(payload)
    }

    fn lookup(&self, content: &Cell, name: &str) -> Result<Vec<u8>, EncodingError> {
        let root = Self::dictionary_root(content)?
            .ok_or_else(|| EncodingError::NotFound(name.to_string()))?;
        let chunks = dictionary_get(&root, &DictKey::from_name(name))?
            .ok_or_else(|| EncodingError::NotFound(name.to_string()))?;
        decode_snake(&chunks)
    }
}
