//! # Content Encoding Subsystem
//!
//! Encodes flat key/value metadata into bounded-size cells.
//!
//! ## Layout
//!
//! ```text
//! content = 0x00 ++ HashmapE 256 ^Cell
//!                     key   = sha256(field name)
//!                     value = 0x00 ++ piece0 -> piece1 -> ... (snake chain)
//! ```
//!
//! Every piece holds at most 126 bytes so the first cell still fits its tag.
//! Decoding reconstructs each value byte for byte, and the content hash does
//! not depend on the order fields were inserted.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let encoder = MetadataEncoder::new();
//! let payload = MetadataPayload::new()
//!     .with_field("name", "Orb")
//!     .with_field("image", "ipfs://bafy/orb.png");
//! let content = encoder.encode_metadata(&payload)?;
//! assert_eq!(encoder.lookup(&content, "name")?, b"Orb");
//! ```

pub mod algorithms;
pub mod application;
pub mod domain;
pub mod ports;

pub use algorithms::{decode_snake, encode_snake, encode_snake_with_capacity};
pub use application::MetadataEncoder;
pub use domain::*;
pub use ports::ContentEncodingApi;
