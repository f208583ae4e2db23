//! Inbound port: the API other components use to encode content

use shared_types::Cell;
use std::collections::BTreeMap;

use crate::domain::{DictKey, EncodingError, MetadataPayload};

/// Metadata encoding API.
///
/// All operations are pure: the same payload always produces a cell with
/// the same representation hash.
pub trait ContentEncodingApi: Send + Sync {
    /// Encode a payload as `0x00 ++ HashmapE 256 ^Cell`.
    fn encode_metadata(&self, payload: &MetadataPayload) -> Result<Cell, EncodingError>;

    /// Decode every entry, keyed by hashed field name.
    fn decode_raw(&self, content: &Cell) -> Result<BTreeMap<DictKey, Vec<u8>>, EncodingError>;

    /// Decode every entry whose key matches a field name known to the
    /// encoder.
    fn decode_metadata(&self, content: &Cell) -> Result<MetadataPayload, EncodingError>;

    /// Decode a single field. Fails with `NotFound` if it is absent.
    fn lookup(&self, content: &Cell, name: &str) -> Result<Vec<u8>, EncodingError>;
}
