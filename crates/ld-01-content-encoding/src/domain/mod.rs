//! Domain layer for content encoding

pub mod errors;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
