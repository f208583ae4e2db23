//! Ports for the distribution subsystem

pub mod outbound;

pub use outbound::{HolderIndex, IndexedItem};

#[cfg(test)]
pub use outbound::mocks;
