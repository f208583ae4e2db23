//! Domain layer for distribution

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
