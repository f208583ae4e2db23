//! Application layer for content encoding

pub mod encoder;

pub use encoder::MetadataEncoder;
