//! Batch dispatch algorithms

pub mod partition;

pub use partition::{batch_count, partition};
